//! The OpenFlow 1.3 async-config body, carried by get-async-reply and
//! set-async messages: six consecutive 32-bit reason bitmaps, a
//! (master-role, slave-role) pair for each asynchronous message type.

use byteorder::{ByteOrder, NetworkEndian};

use crate::bitmap::{emit_flags, parse_flags};
use crate::of13::flow_removed;
use crate::of13::packet_in;
use crate::port_status::PortReason;
use crate::{Error, Repr, Result};

mod field {
    use crate::field::*;

    pub const PACKET_IN_MASTER: Field = 0..4;
    pub const PACKET_IN_SLAVE: Field = 4..8;
    pub const PORT_STATUS_MASTER: Field = 8..12;
    pub const PORT_STATUS_SLAVE: Field = 12..16;
    pub const FLOW_REMOVED_MASTER: Field = 16..20;
    pub const FLOW_REMOVED_SLAVE: Field = 20..24;
}

/// A high-level representation of an async-config body. Each mask pair
/// holds the master-role filter first and the slave-role filter second.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AsyncConfigRepr {
    pub packet_in_mask: [Vec<packet_in::Reason>; 2],
    pub port_status_mask: [Vec<PortReason>; 2],
    pub flow_removed_mask: [Vec<flow_removed::Reason>; 2],
}

impl Repr for AsyncConfigRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::FLOW_REMOVED_SLAVE.end {
            return Err(Error::Truncated);
        }
        Ok(AsyncConfigRepr {
            packet_in_mask: [
                parse_flags(NetworkEndian::read_u32(&buffer[field::PACKET_IN_MASTER]))?,
                parse_flags(NetworkEndian::read_u32(&buffer[field::PACKET_IN_SLAVE]))?,
            ],
            port_status_mask: [
                parse_flags(NetworkEndian::read_u32(&buffer[field::PORT_STATUS_MASTER]))?,
                parse_flags(NetworkEndian::read_u32(&buffer[field::PORT_STATUS_SLAVE]))?,
            ],
            flow_removed_mask: [
                parse_flags(NetworkEndian::read_u32(&buffer[field::FLOW_REMOVED_MASTER]))?,
                parse_flags(NetworkEndian::read_u32(&buffer[field::FLOW_REMOVED_SLAVE]))?,
            ],
        })
    }

    fn buffer_len(&self) -> usize {
        field::FLOW_REMOVED_SLAVE.end
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(
            &mut buffer[field::PACKET_IN_MASTER],
            emit_flags(&self.packet_in_mask[0]),
        );
        NetworkEndian::write_u32(
            &mut buffer[field::PACKET_IN_SLAVE],
            emit_flags(&self.packet_in_mask[1]),
        );
        NetworkEndian::write_u32(
            &mut buffer[field::PORT_STATUS_MASTER],
            emit_flags(&self.port_status_mask[0]),
        );
        NetworkEndian::write_u32(
            &mut buffer[field::PORT_STATUS_SLAVE],
            emit_flags(&self.port_status_mask[1]),
        );
        NetworkEndian::write_u32(
            &mut buffer[field::FLOW_REMOVED_MASTER],
            emit_flags(&self.flow_removed_mask[0]),
        );
        NetworkEndian::write_u32(
            &mut buffer[field::FLOW_REMOVED_SLAVE],
            emit_flags(&self.flow_removed_mask[1]),
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let repr = AsyncConfigRepr {
            packet_in_mask: [
                vec![packet_in::Reason::NoMatch, packet_in::Reason::InvalidTtl],
                vec![],
            ],
            port_status_mask: [
                vec![PortReason::Add, PortReason::Delete, PortReason::Modify],
                vec![PortReason::Modify],
            ],
            flow_removed_mask: [vec![flow_removed::Reason::Delete], vec![]],
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x00, 0x05]);
        assert_eq!(&bytes[8..12], &[0x00, 0x00, 0x00, 0x07]);
        assert_eq!(AsyncConfigRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn undefined_reason_bit() {
        let mut bytes = vec![0; 24];
        bytes[3] = 0x80;
        assert_eq!(AsyncConfigRepr::parse(&bytes), Err(Error::UnknownTag));
    }
}
