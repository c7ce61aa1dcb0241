//! The OpenFlow 1.1 flow-mod body.

use byteorder::{ByteOrder, NetworkEndian};

use crate::bitmap::{emit_flags, parse_flags};
use crate::of11::flow_match::{FlowMatchRepr, MATCH_LEN};
use crate::of11::instruction::{
    emit_instructions, instructions_len, parse_instructions, InstructionRepr,
};
use crate::port::PortNumber;
use crate::{Error, Repr, Result};

enum_with_unknown! {
    /// Flow mod commands.
    pub doc enum Command(u8) {
        /// New flow.
        Add = 0,
        /// Modify all matching flows.
        Modify = 1,
        /// Modify entry strictly matching wildcards and priority.
        ModifyStrict = 2,
        /// Delete all matching flows.
        Delete = 3,
        /// Delete entry strictly matching wildcards and priority.
        DeleteStrict = 4
    }
}

flag_set! {
    /// Flow mod flags.
    pub enum FlowModFlags {
        /// Send flow removed message when flow expires or is deleted.
        SendFlowRem = 0,
        /// Check for overlapping entries first.
        CheckOverlap = 1
    }
}

mod field {
    use crate::field::*;

    pub const COOKIE: Field = 0..8;
    pub const COOKIE_MASK: Field = 8..16;
    pub const TABLE_ID: usize = 16;
    pub const COMMAND: usize = 17;
    pub const IDLE_TIMEOUT: Field = 18..20;
    pub const HARD_TIMEOUT: Field = 20..22;
    pub const PRIORITY: Field = 22..24;
    pub const BUFFER_ID: Field = 24..28;
    pub const OUT_PORT: Field = 28..32;
    pub const OUT_GROUP: Field = 32..36;
    pub const FLAGS: Field = 36..38;
    pub const PAD: Field = 38..40;
    pub const FLOW_MATCH: Field = 40..128;
    pub const INSTRUCTIONS: Rest = 128..;
}

/// A high-level representation of a v1.1 flow-mod body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FlowModRepr {
    pub cookie: u64,
    /// Bits in `cookie` that the modify and delete commands restrict
    /// themselves to; ignored for add.
    pub cookie_mask: u64,
    pub table_id: u8,
    pub command: Command,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub priority: u16,
    /// Buffered packet to apply to, or 0xffffffff.
    pub buffer_id: u32,
    /// For delete commands, require matching entries to include this as an
    /// output port.
    pub out_port: PortNumber,
    /// For delete commands, require matching entries to include this as an
    /// output group.
    pub out_group: u32,
    pub flags: Vec<FlowModFlags>,
    pub flow_match: FlowMatchRepr,
    pub instructions: Vec<InstructionRepr>,
}

impl Repr for FlowModRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::FLOW_MATCH.end {
            return Err(Error::Truncated);
        }
        let command = match Command::from(buffer[field::COMMAND]) {
            Command::_Unknown(_) => return Err(Error::UnknownTag),
            command => command,
        };
        Ok(FlowModRepr {
            cookie: NetworkEndian::read_u64(&buffer[field::COOKIE]),
            cookie_mask: NetworkEndian::read_u64(&buffer[field::COOKIE_MASK]),
            table_id: buffer[field::TABLE_ID],
            command,
            idle_timeout: NetworkEndian::read_u16(&buffer[field::IDLE_TIMEOUT]),
            hard_timeout: NetworkEndian::read_u16(&buffer[field::HARD_TIMEOUT]),
            priority: NetworkEndian::read_u16(&buffer[field::PRIORITY]),
            buffer_id: NetworkEndian::read_u32(&buffer[field::BUFFER_ID]),
            out_port: PortNumber::from(NetworkEndian::read_u32(&buffer[field::OUT_PORT])),
            out_group: NetworkEndian::read_u32(&buffer[field::OUT_GROUP]),
            flags: parse_flags(u32::from(NetworkEndian::read_u16(&buffer[field::FLAGS])))?,
            flow_match: FlowMatchRepr::parse(&buffer[field::FLOW_MATCH])?,
            instructions: parse_instructions(&buffer[field::INSTRUCTIONS])?,
        })
    }

    fn buffer_len(&self) -> usize {
        field::FLOW_MATCH.start + MATCH_LEN + instructions_len(&self.instructions)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u64(&mut buffer[field::COOKIE], self.cookie);
        NetworkEndian::write_u64(&mut buffer[field::COOKIE_MASK], self.cookie_mask);
        buffer[field::TABLE_ID] = self.table_id;
        buffer[field::COMMAND] = self.command.into();
        NetworkEndian::write_u16(&mut buffer[field::IDLE_TIMEOUT], self.idle_timeout);
        NetworkEndian::write_u16(&mut buffer[field::HARD_TIMEOUT], self.hard_timeout);
        NetworkEndian::write_u16(&mut buffer[field::PRIORITY], self.priority);
        NetworkEndian::write_u32(&mut buffer[field::BUFFER_ID], self.buffer_id);
        NetworkEndian::write_u32(&mut buffer[field::OUT_PORT], self.out_port.into());
        NetworkEndian::write_u32(&mut buffer[field::OUT_GROUP], self.out_group);
        NetworkEndian::write_u16(&mut buffer[field::FLAGS], emit_flags(&self.flags) as u16);
        for byte in &mut buffer[field::PAD] {
            *byte = 0;
        }
        self.flow_match.emit(&mut buffer[field::FLOW_MATCH])?;
        emit_instructions(&self.instructions, &mut buffer[field::INSTRUCTIONS])
    }
}
