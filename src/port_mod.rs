//! The port-mod body, identical in OpenFlow 1.1 and 1.3.

use byteorder::{ByteOrder, NetworkEndian};
use smoltcp::wire::EthernetAddress;

use crate::bitmap::{emit_flags, parse_flags};
use crate::port::{PortConfig, PortFeature, PortNumber};
use crate::{Error, Repr, Result};

mod field {
    use crate::field::*;

    pub const PORT_NO: Field = 0..4;
    pub const PAD1: Field = 4..8;
    pub const HW_ADDR: Field = 8..14;
    pub const PAD2: Field = 14..16;
    pub const CONFIG: Field = 16..20;
    pub const MASK: Field = 20..24;
    pub const ADVERTISE: Field = 24..28;
    pub const PAD3: Field = 28..32;
}

/// A high-level representation of a port-mod body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PortModRepr {
    pub port_no: PortNumber,
    /// The hardware address is not configurable; it is used only to
    /// sanity-check the request.
    pub hw_addr: EthernetAddress,
    pub config: Vec<PortConfig>,
    /// Bits in `config` that the request actually changes.
    pub mask: Vec<PortConfig>,
    /// Features to advertise; empty means no change.
    pub advertise: Vec<PortFeature>,
}

impl Repr for PortModRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::PAD3.end {
            return Err(Error::Truncated);
        }
        Ok(PortModRepr {
            port_no: PortNumber::from(NetworkEndian::read_u32(&buffer[field::PORT_NO])),
            hw_addr: EthernetAddress::from_bytes(&buffer[field::HW_ADDR]),
            config: parse_flags(NetworkEndian::read_u32(&buffer[field::CONFIG]))?,
            mask: parse_flags(NetworkEndian::read_u32(&buffer[field::MASK]))?,
            advertise: parse_flags(NetworkEndian::read_u32(&buffer[field::ADVERTISE]))?,
        })
    }

    fn buffer_len(&self) -> usize {
        field::PAD3.end
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[field::PORT_NO], self.port_no.into());
        for byte in &mut buffer[field::PAD1] {
            *byte = 0;
        }
        buffer[field::HW_ADDR].copy_from_slice(self.hw_addr.as_bytes());
        for byte in &mut buffer[field::PAD2] {
            *byte = 0;
        }
        NetworkEndian::write_u32(&mut buffer[field::CONFIG], emit_flags(&self.config));
        NetworkEndian::write_u32(&mut buffer[field::MASK], emit_flags(&self.mask));
        NetworkEndian::write_u32(&mut buffer[field::ADVERTISE], emit_flags(&self.advertise));
        for byte in &mut buffer[field::PAD3] {
            *byte = 0;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let repr = PortModRepr {
            port_no: PortNumber::Regular(7),
            hw_addr: EthernetAddress([0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f]),
            config: vec![PortConfig::PortDown],
            mask: vec![PortConfig::PortDown, PortConfig::NoFwd],
            advertise: vec![PortFeature::Rate10GbFd, PortFeature::Fiber],
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(PortModRepr::parse(&bytes).unwrap(), repr);
    }
}
