//! The OpenFlow 1.3 features-reply (switch features) body: a fixed
//! 24-byte structure. Port descriptions moved to the port-desc multipart
//! in v1.3 and are no longer carried here.

use byteorder::{ByteOrder, NetworkEndian};
use smoltcp::wire::EthernetAddress;

use crate::bitmap::{emit_flags, parse_flags};
use crate::{Error, Repr, Result};

flag_set! {
    /// Capabilities supported by a v1.3 datapath.
    pub enum Capability {
        /// Flow statistics.
        FlowStats = 0,
        /// Table statistics.
        TableStats = 1,
        /// Port statistics.
        PortStats = 2,
        /// Group statistics.
        GroupStats = 3,
        /// Can reassemble IP fragments.
        IpReasm = 5,
        /// Queue statistics.
        QueueStats = 6,
        /// Switch will block looping ports.
        PortBlocked = 8
    }
}

mod field {
    use crate::field::*;

    pub const DATAPATH_ID: Field = 0..2;
    pub const DATAPATH_MAC: Field = 2..8;
    pub const N_BUFFERS: Field = 8..12;
    pub const N_TABLES: usize = 12;
    pub const AUX_ID: usize = 13;
    pub const PAD: Field = 14..16;
    pub const CAPABILITIES: Field = 16..20;
    pub const RESERVED: Field = 20..24;
}

/// A high-level representation of a v1.3 features-reply body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FeaturesReplyRepr {
    /// Implementer-defined top 16 bits of the datapath identifier.
    pub datapath_id: u16,
    /// MAC address part of the datapath identifier.
    pub datapath_mac: EthernetAddress,
    /// Max packets buffered at once.
    pub n_buffers: u32,
    /// Number of tables supported by the datapath.
    pub n_tables: u8,
    /// Identifies the auxiliary connection; 0 for the main one.
    pub auxiliary_id: u8,
    pub capabilities: Vec<Capability>,
    /// Reserved word, kept as-is.
    pub reserved: u32,
}

impl Repr for FeaturesReplyRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::RESERVED.end {
            return Err(Error::Truncated);
        }
        Ok(FeaturesReplyRepr {
            datapath_id: NetworkEndian::read_u16(&buffer[field::DATAPATH_ID]),
            datapath_mac: EthernetAddress::from_bytes(&buffer[field::DATAPATH_MAC]),
            n_buffers: NetworkEndian::read_u32(&buffer[field::N_BUFFERS]),
            n_tables: buffer[field::N_TABLES],
            auxiliary_id: buffer[field::AUX_ID],
            capabilities: parse_flags(NetworkEndian::read_u32(&buffer[field::CAPABILITIES]))?,
            reserved: NetworkEndian::read_u32(&buffer[field::RESERVED]),
        })
    }

    fn buffer_len(&self) -> usize {
        field::RESERVED.end
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u16(&mut buffer[field::DATAPATH_ID], self.datapath_id);
        buffer[field::DATAPATH_MAC].copy_from_slice(self.datapath_mac.as_bytes());
        NetworkEndian::write_u32(&mut buffer[field::N_BUFFERS], self.n_buffers);
        buffer[field::N_TABLES] = self.n_tables;
        buffer[field::AUX_ID] = self.auxiliary_id;
        for byte in &mut buffer[field::PAD] {
            *byte = 0;
        }
        NetworkEndian::write_u32(&mut buffer[field::CAPABILITIES], emit_flags(&self.capabilities));
        NetworkEndian::write_u32(&mut buffer[field::RESERVED], self.reserved);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let repr = FeaturesReplyRepr {
            datapath_id: 0x6677,
            datapath_mac: EthernetAddress([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
            n_buffers: 256,
            n_tables: 8,
            auxiliary_id: 0,
            capabilities: vec![Capability::FlowStats, Capability::TableStats],
            reserved: 0,
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[0..8], &[0x66, 0x77, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        assert_eq!(&bytes[16..20], &[0x00, 0x00, 0x00, 0x03]);
        assert_eq!(FeaturesReplyRepr::parse(&bytes).unwrap(), repr);
    }
}
