//! The OpenFlow 1.1 flow-removed body.

use byteorder::{ByteOrder, NetworkEndian};

use crate::bitmap::FlagBits;
use crate::of11::flow_match::{FlowMatchRepr, MATCH_LEN};
use crate::{Error, Repr, Result};

flag_set! {
    /// Reasons for a v1.1 flow-removed message.
    pub enum Reason {
        /// Flow idle time exceeded idle_timeout.
        IdleTimeout = 0,
        /// Time exceeded hard_timeout.
        HardTimeout = 1,
        /// Evicted by a delete flow mod.
        Delete = 2
    }
}

mod field {
    use crate::field::*;

    pub const COOKIE: Field = 0..8;
    pub const PRIORITY: Field = 8..10;
    pub const REASON: usize = 10;
    pub const TABLE_ID: usize = 11;
    pub const DURATION_SEC: Field = 12..16;
    pub const DURATION_NSEC: Field = 16..20;
    pub const IDLE_TIMEOUT: Field = 20..22;
    pub const PAD: Field = 22..24;
    pub const PACKET_COUNT: Field = 24..32;
    pub const BYTE_COUNT: Field = 32..40;
    pub const FLOW_MATCH: Field = 40..128;
}

/// A high-level representation of a v1.1 flow-removed body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FlowRemovedRepr {
    pub cookie: u64,
    pub priority: u16,
    pub reason: Reason,
    pub table_id: u8,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub idle_timeout: u16,
    pub packet_count: u64,
    pub byte_count: u64,
    pub flow_match: FlowMatchRepr,
}

impl Repr for FlowRemovedRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::FLOW_MATCH.end {
            return Err(Error::Truncated);
        }
        let reason =
            Reason::from_bit(u32::from(buffer[field::REASON])).ok_or(Error::UnknownTag)?;
        Ok(FlowRemovedRepr {
            cookie: NetworkEndian::read_u64(&buffer[field::COOKIE]),
            priority: NetworkEndian::read_u16(&buffer[field::PRIORITY]),
            reason,
            table_id: buffer[field::TABLE_ID],
            duration_sec: NetworkEndian::read_u32(&buffer[field::DURATION_SEC]),
            duration_nsec: NetworkEndian::read_u32(&buffer[field::DURATION_NSEC]),
            idle_timeout: NetworkEndian::read_u16(&buffer[field::IDLE_TIMEOUT]),
            packet_count: NetworkEndian::read_u64(&buffer[field::PACKET_COUNT]),
            byte_count: NetworkEndian::read_u64(&buffer[field::BYTE_COUNT]),
            flow_match: FlowMatchRepr::parse(&buffer[field::FLOW_MATCH])?,
        })
    }

    fn buffer_len(&self) -> usize {
        field::BYTE_COUNT.end + MATCH_LEN
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u64(&mut buffer[field::COOKIE], self.cookie);
        NetworkEndian::write_u16(&mut buffer[field::PRIORITY], self.priority);
        buffer[field::REASON] = self.reason.bit() as u8;
        buffer[field::TABLE_ID] = self.table_id;
        NetworkEndian::write_u32(&mut buffer[field::DURATION_SEC], self.duration_sec);
        NetworkEndian::write_u32(&mut buffer[field::DURATION_NSEC], self.duration_nsec);
        NetworkEndian::write_u16(&mut buffer[field::IDLE_TIMEOUT], self.idle_timeout);
        for byte in &mut buffer[field::PAD] {
            *byte = 0;
        }
        NetworkEndian::write_u64(&mut buffer[field::PACKET_COUNT], self.packet_count);
        NetworkEndian::write_u64(&mut buffer[field::BYTE_COUNT], self.byte_count);
        self.flow_match.emit(&mut buffer[field::FLOW_MATCH])
    }
}
