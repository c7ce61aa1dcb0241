//! OpenFlow 1.1 flow instructions.
//!
//! ```no_rust
//! +--------+--------+--------+--------+
//! |       type      |     length      |
//! +--------+--------+--------+--------+
//! |    body (length - 4 bytes)        |
//! +--------+--------+--------+--------+
//! ```
//!
//! The action lists inside write-actions and apply-actions are carried
//! opaque; action codecs are an external collaborator.

use byteorder::{ByteOrder, NetworkEndian};

use crate::{Error, Repr, Result};

enum_with_unknown! {
    /// Instruction types.
    pub doc enum Kind(u16) {
        /// Setup the next table in the lookup pipeline.
        GotoTable = 1,
        /// Setup the metadata field for use later in pipeline.
        WriteMetadata = 2,
        /// Write the action(s) onto the datapath action set.
        WriteActions = 3,
        /// Apply the action(s) immediately.
        ApplyActions = 4,
        /// Clear all actions from the datapath action set.
        ClearActions = 5,
        /// Experimenter instruction.
        Experimenter = 0xffff
    }
}

mod field {
    use crate::field::*;

    pub const KIND: Field = 0..2;
    pub const LENGTH: Field = 2..4;
    pub const BODY: Rest = 4..;
}

const HEADER_LEN: usize = 4;
const FIXED_LEN: usize = 8;
const WRITE_METADATA_LEN: usize = 24;

/// A high-level representation of one flow instruction.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum InstructionRepr {
    /// Send the packet to the given table next.
    GotoTable(u8),
    /// Write the masked metadata value into the pipeline metadata.
    WriteMetadata { metadata: u64, mask: u64 },
    /// Merge the actions into the action set (opaque encoded list).
    WriteActions(Vec<u8>),
    /// Apply the actions immediately (opaque encoded list).
    ApplyActions(Vec<u8>),
    /// Clear the action set.
    ClearActions,
    /// Experimenter instruction, carrying the experimenter id.
    Experimenter(u32),
}

impl Repr for InstructionRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < HEADER_LEN {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[field::LENGTH]) as usize;
        if length < FIXED_LEN {
            return Err(Error::LengthMismatch);
        }
        if length > buffer.len() {
            return Err(Error::Truncated);
        }
        let body = &buffer[field::BODY.start..length];
        match Kind::from(NetworkEndian::read_u16(&buffer[field::KIND])) {
            Kind::GotoTable => Ok(InstructionRepr::GotoTable(body[0])),
            Kind::WriteMetadata => {
                if length != WRITE_METADATA_LEN {
                    return Err(Error::LengthMismatch);
                }
                Ok(InstructionRepr::WriteMetadata {
                    metadata: NetworkEndian::read_u64(&body[4..12]),
                    mask: NetworkEndian::read_u64(&body[12..20]),
                })
            }
            Kind::WriteActions => Ok(InstructionRepr::WriteActions(body[4..].to_vec())),
            Kind::ApplyActions => Ok(InstructionRepr::ApplyActions(body[4..].to_vec())),
            Kind::ClearActions => Ok(InstructionRepr::ClearActions),
            Kind::Experimenter => Ok(InstructionRepr::Experimenter(NetworkEndian::read_u32(
                &body[0..4],
            ))),
            Kind::_Unknown(_) => Err(Error::UnknownTag),
        }
    }

    fn buffer_len(&self) -> usize {
        match *self {
            InstructionRepr::GotoTable(_)
            | InstructionRepr::ClearActions
            | InstructionRepr::Experimenter(_) => FIXED_LEN,
            InstructionRepr::WriteMetadata { .. } => WRITE_METADATA_LEN,
            InstructionRepr::WriteActions(ref actions)
            | InstructionRepr::ApplyActions(ref actions) => FIXED_LEN + actions.len(),
        }
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        let length = self.buffer_len();
        if buffer.len() < length {
            return Err(Error::Exhausted);
        }
        for byte in &mut buffer[..length] {
            *byte = 0;
        }
        NetworkEndian::write_u16(&mut buffer[field::LENGTH], length as u16);
        let kind = match *self {
            InstructionRepr::GotoTable(table_id) => {
                buffer[field::BODY.start] = table_id;
                Kind::GotoTable
            }
            InstructionRepr::WriteMetadata { metadata, mask } => {
                NetworkEndian::write_u64(&mut buffer[8..16], metadata);
                NetworkEndian::write_u64(&mut buffer[16..24], mask);
                Kind::WriteMetadata
            }
            InstructionRepr::WriteActions(ref actions) => {
                buffer[FIXED_LEN..length].copy_from_slice(actions);
                Kind::WriteActions
            }
            InstructionRepr::ApplyActions(ref actions) => {
                buffer[FIXED_LEN..length].copy_from_slice(actions);
                Kind::ApplyActions
            }
            InstructionRepr::ClearActions => Kind::ClearActions,
            InstructionRepr::Experimenter(id) => {
                NetworkEndian::write_u32(&mut buffer[4..8], id);
                Kind::Experimenter
            }
        };
        NetworkEndian::write_u16(&mut buffer[field::KIND], kind.into());
        Ok(())
    }
}

/// Parse a concatenation of instructions until the buffer is consumed.
pub fn parse_instructions(buffer: &[u8]) -> Result<Vec<InstructionRepr>> {
    crate::list::parse_list(buffer)
}

/// Emit a concatenation of instructions. The buffer must be sized by the
/// caller.
pub fn emit_instructions(instructions: &[InstructionRepr], buffer: &mut [u8]) -> Result<()> {
    crate::list::emit_list(instructions, buffer)
}

/// Return the total encoded length of an instruction list.
pub fn instructions_len(instructions: &[InstructionRepr]) -> usize {
    crate::list::list_len(instructions)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn goto_table() {
        let repr = InstructionRepr::GotoTable(4);
        let mut bytes = vec![0xff; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[..], &[0x00, 0x01, 0x00, 0x08, 0x04, 0x00, 0x00, 0x00]);
        assert_eq!(InstructionRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn write_metadata() {
        let repr = InstructionRepr::WriteMetadata {
            metadata: 0x1122_3344_5566_7788,
            mask: 0xffff_ffff_0000_0000,
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[..4], &[0x00, 0x02, 0x00, 0x18]);
        assert_eq!(InstructionRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn action_list_round_trip() {
        let repr = InstructionRepr::ApplyActions(vec![0, 0, 0, 8, 0, 0, 0, 1]);
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        // length covers header, padding and the opaque action bytes.
        assert_eq!(&bytes[2..4], &[0x00, 0x10]);
        assert_eq!(InstructionRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn list_round_trip() {
        let instructions = vec![
            InstructionRepr::ClearActions,
            InstructionRepr::GotoTable(1),
            InstructionRepr::Experimenter(0xcafe),
        ];
        let mut bytes = vec![0; instructions_len(&instructions)];
        emit_instructions(&instructions, &mut bytes).unwrap();
        assert_eq!(parse_instructions(&bytes).unwrap(), instructions);
    }

    #[test]
    fn unknown_kind() {
        let bytes = [0x00, 0x07, 0x00, 0x08, 0, 0, 0, 0];
        assert_eq!(InstructionRepr::parse(&bytes), Err(Error::UnknownTag));
    }

    #[test]
    fn undersized_length() {
        let bytes = [0x00, 0x01, 0x00, 0x04, 0, 0, 0, 0];
        assert_eq!(InstructionRepr::parse(&bytes), Err(Error::LengthMismatch));
    }
}
