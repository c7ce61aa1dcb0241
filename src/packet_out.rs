//! The packet-out body, identical in OpenFlow 1.1 and 1.3.
//!
//! ```no_rust
//!  0      7        15       23       31
//! +--------+--------+--------+--------+
//! |             buffer id             |
//! +--------+--------+--------+--------+
//! |              in port              |
//! +--------+--------+--------+--------+
//! |   actions len   |    (padding)    |
//! +--------+--------+--------+--------+
//! |     (padding)   |     actions     |
//! +--------+--------+                 |
//! |       (variable length)           |
//! +--------+--------+--------+--------+
//! |   frame data (variable length)    |
//! +--------+--------+--------+--------+
//! ```
//!
//! The action list is carried opaque: action codecs are an external
//! collaborator, this layer only delimits their bytes.

use byteorder::{ByteOrder, NetworkEndian};

use crate::port::PortNumber;
use crate::{Error, Repr, Result};

mod field {
    use crate::field::*;

    pub const BUFFER_ID: Field = 0..4;
    pub const IN_PORT: Field = 4..8;
    pub const ACTIONS_LEN: Field = 8..10;
    pub const PAD: Field = 10..16;

    pub fn actions(actions_len: usize) -> Field {
        PAD.end..PAD.end + actions_len
    }
}

/// A high-level representation of a packet-out body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PacketOutRepr {
    /// Buffer id assigned by the datapath, or 0xffffffff if the frame is
    /// carried in `data`.
    pub buffer_id: u32,
    /// Ingress port that must be associated with the packet.
    pub in_port: PortNumber,
    /// Encoded action list, opaque to this layer.
    pub actions: Vec<u8>,
    /// The frame to send when `buffer_id` is 0xffffffff, empty otherwise.
    pub data: Vec<u8>,
}

impl Repr for PacketOutRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::PAD.end {
            return Err(Error::Truncated);
        }
        let actions_len = NetworkEndian::read_u16(&buffer[field::ACTIONS_LEN]) as usize;
        if buffer.len() < field::actions(actions_len).end {
            return Err(Error::Truncated);
        }
        Ok(PacketOutRepr {
            buffer_id: NetworkEndian::read_u32(&buffer[field::BUFFER_ID]),
            in_port: PortNumber::from(NetworkEndian::read_u32(&buffer[field::IN_PORT])),
            actions: buffer[field::actions(actions_len)].to_vec(),
            data: buffer[field::actions(actions_len).end..].to_vec(),
        })
    }

    fn buffer_len(&self) -> usize {
        field::PAD.end + self.actions.len() + self.data.len()
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[field::BUFFER_ID], self.buffer_id);
        NetworkEndian::write_u32(&mut buffer[field::IN_PORT], self.in_port.into());
        NetworkEndian::write_u16(&mut buffer[field::ACTIONS_LEN], self.actions.len() as u16);
        for byte in &mut buffer[field::PAD] {
            *byte = 0;
        }
        let actions = field::actions(self.actions.len());
        buffer[actions.clone()].copy_from_slice(&self.actions);
        buffer[actions.end..actions.end + self.data.len()].copy_from_slice(&self.data);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let repr = PacketOutRepr {
            buffer_id: 0xffff_ffff,
            in_port: PortNumber::Controller,
            actions: vec![0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01],
            data: vec![0xde, 0xad],
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 26);
        assert_eq!(&bytes[8..10], &[0x00, 0x08]);
        assert_eq!(PacketOutRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn truncated_actions() {
        let mut bytes = vec![0; 18];
        bytes[9] = 0x10;
        assert_eq!(PacketOutRepr::parse(&bytes), Err(Error::Truncated));
    }
}
