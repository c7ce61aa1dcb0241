//! The table-mod body, identical in OpenFlow 1.1 and 1.3.

use byteorder::{ByteOrder, NetworkEndian};

use crate::{Error, Repr, Result};

mod field {
    use crate::field::*;

    pub const TABLE_ID: usize = 0;
    pub const PAD: Field = 1..4;
    pub const CONFIG: Field = 4..8;
}

/// Table numbered 0xff, addressing all tables at once.
pub const TABLE_ALL: u8 = 0xff;

/// A high-level representation of a table-mod body. The config bitmap is
/// kept raw; its meaning changed between versions and is deprecated in
/// v1.3.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TableModRepr {
    pub table_id: u8,
    pub config: u32,
}

impl Repr for TableModRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::CONFIG.end {
            return Err(Error::Truncated);
        }
        Ok(TableModRepr {
            table_id: buffer[field::TABLE_ID],
            config: NetworkEndian::read_u32(&buffer[field::CONFIG]),
        })
    }

    fn buffer_len(&self) -> usize {
        field::CONFIG.end
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        buffer[field::TABLE_ID] = self.table_id;
        for byte in &mut buffer[field::PAD] {
            *byte = 0;
        }
        NetworkEndian::write_u32(&mut buffer[field::CONFIG], self.config);
        Ok(())
    }
}
