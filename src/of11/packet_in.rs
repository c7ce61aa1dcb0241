//! The OpenFlow 1.1 packet-in body.
//!
//! ```no_rust
//!  0      7        15       23       31
//! +--------+--------+--------+--------+
//! |             buffer id             |
//! +--------+--------+--------+--------+
//! |              in port              |
//! +--------+--------+--------+--------+
//! |         in physical port          |
//! +--------+--------+--------+--------+
//! |    total len    | reason |table id|
//! +--------+--------+--------+--------+
//! |    frame data (variable length)   |
//! +--------+--------+--------+--------+
//! ```

use byteorder::{ByteOrder, NetworkEndian};

use crate::bitmap::FlagBits;
use crate::{Error, Repr, Result};

flag_set! {
    /// Reasons for a v1.1 packet-in message.
    pub enum Reason {
        /// No matching flow.
        NoMatch = 0,
        /// Action explicitly output to controller.
        Action = 1
    }
}

mod field {
    use crate::field::*;

    pub const BUFFER_ID: Field = 0..4;
    pub const IN_PORT: Field = 4..8;
    pub const IN_PHY_PORT: Field = 8..12;
    pub const TOTAL_LEN: Field = 12..14;
    pub const REASON: usize = 14;
    pub const TABLE_ID: usize = 15;
    pub const DATA: Rest = 16..;
}

/// A high-level representation of a v1.1 packet-in body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PacketInRepr {
    /// Buffer id assigned by the datapath, or 0xffffffff when the whole
    /// frame is included.
    pub buffer_id: u32,
    /// Port on which the frame was received.
    pub in_port: u32,
    /// Physical port on which the frame was received.
    pub in_phy_port: u32,
    /// Full length of the frame as seen by the datapath.
    pub total_len: u16,
    pub reason: Reason,
    /// Id of the table that was looked up.
    pub table_id: u8,
    /// The (possibly truncated) frame.
    pub data: Vec<u8>,
}

impl Repr for PacketInRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::DATA.start {
            return Err(Error::Truncated);
        }
        let reason =
            Reason::from_bit(u32::from(buffer[field::REASON])).ok_or(Error::UnknownTag)?;
        Ok(PacketInRepr {
            buffer_id: NetworkEndian::read_u32(&buffer[field::BUFFER_ID]),
            in_port: NetworkEndian::read_u32(&buffer[field::IN_PORT]),
            in_phy_port: NetworkEndian::read_u32(&buffer[field::IN_PHY_PORT]),
            total_len: NetworkEndian::read_u16(&buffer[field::TOTAL_LEN]),
            reason,
            table_id: buffer[field::TABLE_ID],
            data: buffer[field::DATA].to_vec(),
        })
    }

    fn buffer_len(&self) -> usize {
        field::DATA.start + self.data.len()
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[field::BUFFER_ID], self.buffer_id);
        NetworkEndian::write_u32(&mut buffer[field::IN_PORT], self.in_port);
        NetworkEndian::write_u32(&mut buffer[field::IN_PHY_PORT], self.in_phy_port);
        NetworkEndian::write_u16(&mut buffer[field::TOTAL_LEN], self.total_len);
        buffer[field::REASON] = self.reason.bit() as u8;
        buffer[field::TABLE_ID] = self.table_id;
        buffer[field::DATA.start..self.buffer_len()].copy_from_slice(&self.data);
        Ok(())
    }
}
