//! The OpenFlow 1.3 role-request and role-reply bodies.

use byteorder::{ByteOrder, NetworkEndian};

use crate::{Error, Repr, Result};

enum_with_unknown! {
    /// Controller roles.
    pub doc enum ControllerRole(u32) {
        /// Don't change the current role.
        NoChange = 0,
        /// Default role, full access.
        Equal = 1,
        /// Full access, at most one controller at a time.
        Master = 2,
        /// Read-only access.
        Slave = 3
    }
}

mod field {
    use crate::field::*;

    pub const ROLE: Field = 0..4;
    pub const PAD: Field = 4..8;
    pub const GENERATION_ID: Field = 8..16;
}

/// A high-level representation of a role-request or role-reply body.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RoleRepr {
    pub role: ControllerRole,
    /// Master election generation id, guarding against stale requests.
    pub generation_id: u64,
}

impl Repr for RoleRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::GENERATION_ID.end {
            return Err(Error::Truncated);
        }
        let role = match ControllerRole::from(NetworkEndian::read_u32(&buffer[field::ROLE])) {
            ControllerRole::_Unknown(_) => return Err(Error::UnknownTag),
            role => role,
        };
        Ok(RoleRepr {
            role,
            generation_id: NetworkEndian::read_u64(&buffer[field::GENERATION_ID]),
        })
    }

    fn buffer_len(&self) -> usize {
        field::GENERATION_ID.end
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[field::ROLE], self.role.into());
        for byte in &mut buffer[field::PAD] {
            *byte = 0;
        }
        NetworkEndian::write_u64(&mut buffer[field::GENERATION_ID], self.generation_id);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let repr = RoleRepr {
            role: ControllerRole::Master,
            generation_id: 0x1122_3344_5566_7788,
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &[0, 0, 0, 2]);
        assert_eq!(RoleRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn unknown_role() {
        let mut bytes = vec![0; 16];
        bytes[3] = 9;
        assert_eq!(RoleRepr::parse(&bytes), Err(Error::UnknownTag));
    }
}
