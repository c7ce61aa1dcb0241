//! The OpenFlow 1.3 packet-in body.
//!
//! ```no_rust
//!  0      7        15       23       31
//! +--------+--------+--------+--------+
//! |             buffer id             |
//! +--------+--------+--------+--------+
//! |    total len    | reason |table id|
//! +--------+--------+--------+--------+
//! |               cookie              |
//! |                                   |
//! +--------+--------+--------+--------+
//! |       match (variable length,     |
//! |         8 bytes aligned)          |
//! +--------+--------+--------+--------+
//! |    (padding)    |    frame data   |
//! +--------+--------+                 |
//! |         (variable length)         |
//! +--------+--------+--------+--------+
//! ```
//!
//! The match length is only known after parsing the match, so the padding
//! and frame offsets are derived from it.

use byteorder::{ByteOrder, NetworkEndian};

use crate::bitmap::FlagBits;
use crate::of13::flow_match::FlowMatchRepr;
use crate::{Error, Repr, Result};

flag_set! {
    /// Reasons for a v1.3 packet-in message. The reason codes double as
    /// bit positions in the async-config packet-in mask.
    pub enum Reason {
        /// No matching flow (table-miss flow entry).
        NoMatch = 0,
        /// Action explicitly output to controller.
        Action = 1,
        /// Packet has invalid TTL.
        InvalidTtl = 2
    }
}

mod field {
    #![allow(non_snake_case)]

    use crate::field::*;

    pub const BUFFER_ID: Field = 0..4;
    pub const TOTAL_LEN: Field = 4..6;
    pub const REASON: usize = 6;
    pub const TABLE_ID: usize = 7;
    pub const COOKIE: Field = 8..16;
    pub const FLOW_MATCH: Rest = 16..;

    pub fn PADDING(flow_match_len: usize) -> Field {
        FLOW_MATCH.start + flow_match_len..FLOW_MATCH.start + flow_match_len + 2
    }

    pub fn DATA(flow_match_len: usize) -> Rest {
        PADDING(flow_match_len).end..
    }
}

/// A high-level representation of a v1.3 packet-in body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PacketInRepr {
    /// Buffer id assigned by the datapath, or 0xffffffff when the whole
    /// frame is included.
    pub buffer_id: u32,
    /// Full length of the frame as seen by the datapath.
    pub total_len: u16,
    pub reason: Reason,
    /// Id of the table that was looked up.
    pub table_id: u8,
    /// Cookie of the flow entry that caused the packet-in.
    pub cookie: u64,
    pub flow_match: FlowMatchRepr,
    /// The (possibly truncated) frame.
    pub data: Vec<u8>,
}

impl Repr for PacketInRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::FLOW_MATCH.start {
            return Err(Error::Truncated);
        }
        let reason =
            Reason::from_bit(u32::from(buffer[field::REASON])).ok_or(Error::UnknownTag)?;
        let flow_match = FlowMatchRepr::parse(&buffer[field::FLOW_MATCH])?;
        let match_len = flow_match.buffer_len();
        if buffer.len() < field::PADDING(match_len).end {
            return Err(Error::Truncated);
        }
        Ok(PacketInRepr {
            buffer_id: NetworkEndian::read_u32(&buffer[field::BUFFER_ID]),
            total_len: NetworkEndian::read_u16(&buffer[field::TOTAL_LEN]),
            reason,
            table_id: buffer[field::TABLE_ID],
            cookie: NetworkEndian::read_u64(&buffer[field::COOKIE]),
            flow_match,
            data: buffer[field::DATA(match_len)].to_vec(),
        })
    }

    fn buffer_len(&self) -> usize {
        field::PADDING(self.flow_match.buffer_len()).end + self.data.len()
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[field::BUFFER_ID], self.buffer_id);
        NetworkEndian::write_u16(&mut buffer[field::TOTAL_LEN], self.total_len);
        buffer[field::REASON] = self.reason.bit() as u8;
        buffer[field::TABLE_ID] = self.table_id;
        NetworkEndian::write_u64(&mut buffer[field::COOKIE], self.cookie);
        let match_len = self.flow_match.buffer_len();
        self.flow_match
            .emit(&mut buffer[field::FLOW_MATCH.start..field::FLOW_MATCH.start + match_len])?;
        for byte in &mut buffer[field::PADDING(match_len)] {
            *byte = 0;
        }
        let data = field::DATA(match_len);
        buffer[data.start..data.start + self.data.len()].copy_from_slice(&self.data);
        Ok(())
    }
}
