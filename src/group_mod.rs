//! The group-mod body and its bucket structure, identical in OpenFlow 1.1
//! and 1.3.
//!
//! ```no_rust
//!  0      7        15       23       31
//! +--------+--------+--------+--------+
//! |     command     |  type  |  (pad) |
//! +--------+--------+--------+--------+
//! |             group id              |
//! +--------+--------+--------+--------+
//! |          buckets (variable)       |
//! +--------+--------+--------+--------+
//! ```
//!
//! Each bucket carries its own length field covering the 16-byte bucket
//! header plus the encoded action list, which this layer keeps opaque.

use byteorder::{ByteOrder, NetworkEndian};

use crate::port::PortNumber;
use crate::{Error, Repr, Result};

enum_with_unknown! {
    /// Group commands.
    pub doc enum GroupCommand(u16) {
        /// New group.
        Add = 0,
        /// Modify all matching groups.
        Modify = 1,
        /// Delete all matching groups.
        Delete = 2
    }
}

enum_with_unknown! {
    /// Group types.
    pub doc enum GroupType(u8) {
        /// All (multicast/broadcast) group.
        All = 0,
        /// Select group.
        Select = 1,
        /// Indirect group.
        Indirect = 2,
        /// Fast failover group.
        FastFailover = 3
    }
}

mod field {
    use crate::field::*;

    pub const COMMAND: Field = 0..2;
    pub const KIND: usize = 2;
    pub const PAD: usize = 3;
    pub const GROUP_ID: Field = 4..8;
    pub const BUCKETS: Rest = 8..;
}

mod bucket_field {
    use crate::field::*;

    pub const LENGTH: Field = 0..2;
    pub const WEIGHT: Field = 2..4;
    pub const WATCH_PORT: Field = 4..8;
    pub const WATCH_GROUP: Field = 8..12;
    pub const PAD: Field = 12..16;
}

const BUCKET_HEADER_LEN: usize = 16;

/// An action bucket of a group.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Bucket {
    /// Relative weight of the bucket; only defined for select groups.
    pub weight: u16,
    /// Port whose state affects whether this bucket is live; only required
    /// for fast failover groups.
    pub watch_port: PortNumber,
    /// Group whose state affects whether this bucket is live; only
    /// required for fast failover groups.
    pub watch_group: u32,
    /// Encoded action list, opaque to this layer.
    pub actions: Vec<u8>,
}

impl Repr for Bucket {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < BUCKET_HEADER_LEN {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[bucket_field::LENGTH]) as usize;
        if length < BUCKET_HEADER_LEN {
            return Err(Error::LengthMismatch);
        }
        if length > buffer.len() {
            return Err(Error::Truncated);
        }
        Ok(Bucket {
            weight: NetworkEndian::read_u16(&buffer[bucket_field::WEIGHT]),
            watch_port: PortNumber::from(NetworkEndian::read_u32(
                &buffer[bucket_field::WATCH_PORT],
            )),
            watch_group: NetworkEndian::read_u32(&buffer[bucket_field::WATCH_GROUP]),
            actions: buffer[BUCKET_HEADER_LEN..length].to_vec(),
        })
    }

    fn buffer_len(&self) -> usize {
        BUCKET_HEADER_LEN + self.actions.len()
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u16(&mut buffer[bucket_field::LENGTH], self.buffer_len() as u16);
        NetworkEndian::write_u16(&mut buffer[bucket_field::WEIGHT], self.weight);
        NetworkEndian::write_u32(&mut buffer[bucket_field::WATCH_PORT], self.watch_port.into());
        NetworkEndian::write_u32(&mut buffer[bucket_field::WATCH_GROUP], self.watch_group);
        for byte in &mut buffer[bucket_field::PAD] {
            *byte = 0;
        }
        buffer[BUCKET_HEADER_LEN..self.buffer_len()].copy_from_slice(&self.actions);
        Ok(())
    }
}

/// Parse a concatenation of buckets until the buffer is consumed.
pub fn parse_buckets(buffer: &[u8]) -> Result<Vec<Bucket>> {
    crate::list::parse_list(buffer)
}

/// Emit a concatenation of buckets. The buffer must be sized by the caller.
pub fn emit_buckets(buckets: &[Bucket], buffer: &mut [u8]) -> Result<()> {
    crate::list::emit_list(buckets, buffer)
}

/// Return the total encoded length of a bucket list.
pub fn buckets_len(buckets: &[Bucket]) -> usize {
    crate::list::list_len(buckets)
}

/// A high-level representation of a group-mod body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GroupModRepr {
    pub command: GroupCommand,
    pub kind: GroupType,
    pub group_id: u32,
    pub buckets: Vec<Bucket>,
}

impl Repr for GroupModRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::GROUP_ID.end {
            return Err(Error::Truncated);
        }
        let command = match GroupCommand::from(NetworkEndian::read_u16(&buffer[field::COMMAND])) {
            GroupCommand::_Unknown(_) => return Err(Error::UnknownTag),
            command => command,
        };
        let kind = match GroupType::from(buffer[field::KIND]) {
            GroupType::_Unknown(_) => return Err(Error::UnknownTag),
            kind => kind,
        };
        Ok(GroupModRepr {
            command,
            kind,
            group_id: NetworkEndian::read_u32(&buffer[field::GROUP_ID]),
            buckets: parse_buckets(&buffer[field::BUCKETS])?,
        })
    }

    fn buffer_len(&self) -> usize {
        field::GROUP_ID.end + buckets_len(&self.buckets)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u16(&mut buffer[field::COMMAND], self.command.into());
        buffer[field::KIND] = self.kind.into();
        buffer[field::PAD] = 0;
        NetworkEndian::write_u32(&mut buffer[field::GROUP_ID], self.group_id);
        emit_buckets(&self.buckets, &mut buffer[field::BUCKETS])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let repr = GroupModRepr {
            command: GroupCommand::Add,
            kind: GroupType::FastFailover,
            group_id: 5,
            buckets: vec![
                Bucket {
                    weight: 0,
                    watch_port: PortNumber::Regular(1),
                    watch_group: 0xffff_ffff,
                    actions: vec![0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01],
                },
                Bucket {
                    weight: 0,
                    watch_port: PortNumber::Regular(2),
                    watch_group: 0xffff_ffff,
                    actions: vec![],
                },
            ],
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 8 + 24 + 16);
        // first bucket length field covers header + actions.
        assert_eq!(&bytes[8..10], &[0x00, 0x18]);
        assert_eq!(GroupModRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn short_bucket() {
        let mut bytes = vec![0; 8 + 8];
        bytes[1] = 0;
        assert_eq!(GroupModRepr::parse(&bytes), Err(Error::Truncated));
    }
}
