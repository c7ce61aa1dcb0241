//! The OpenFlow 1.3 match container: an OXM TLV stream behind a 4-byte
//! header, zero-padded to an 8-byte boundary.
//!
//! ```no_rust
//! +---------------+---------------+
//! |   match type  |     length    |
//! +---------------+---------------+
//! |          oxm fields           |
//! |   (variable       +-----------+
//! |     length)       |  padding  |
//! +-------------------+-----------+
//! ```
//!
//! - The only supported match type is OXM (1).
//! - The length field covers the header and the TLVs but not the padding.

use byteorder::{ByteOrder, NetworkEndian};

use crate::bytes::padding;
use crate::list::{emit_list, list_len, parse_list};
use crate::of13::oxm::Oxm;
use crate::{Error, Repr, Result};

enum_with_unknown! {
    /// Match types.
    pub doc enum MatchType(u16) {
        /// The deprecated fixed-layout match.
        Standard = 0,
        /// OpenFlow eXtensible Match.
        Oxm = 1
    }
}

mod field {
    #![allow(non_snake_case)]

    use crate::field::*;

    pub const MATCH_TYPE: Field = 0..2;
    pub const LENGTH: Field = 2..4;

    pub fn OXM_FIELDS(length: usize) -> Field {
        LENGTH.end..length
    }

    pub fn PADDING(length: usize) -> Field {
        length..(length + 7) / 8 * 8
    }
}

/// A high-level representation of a v1.3 match: the ordered list of OXM
/// TLVs.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct FlowMatchRepr(pub Vec<Oxm>);

impl FlowMatchRepr {
    fn fields_len(&self) -> usize {
        list_len(&self.0)
    }
}

impl Repr for FlowMatchRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::LENGTH.end {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[field::LENGTH]) as usize;
        if length < field::LENGTH.end {
            return Err(Error::LengthMismatch);
        }
        if buffer.len() < field::PADDING(length).end {
            return Err(Error::Truncated);
        }
        match MatchType::from(NetworkEndian::read_u16(&buffer[field::MATCH_TYPE])) {
            MatchType::Oxm => {}
            _ => return Err(Error::UnknownTag),
        }
        Ok(FlowMatchRepr(parse_list(&buffer[field::OXM_FIELDS(length)])?))
    }

    fn buffer_len(&self) -> usize {
        let length = field::LENGTH.end + self.fields_len();
        length + padding(length, 8)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        let length = field::LENGTH.end + self.fields_len();
        NetworkEndian::write_u16(&mut buffer[field::MATCH_TYPE], MatchType::Oxm.into());
        NetworkEndian::write_u16(&mut buffer[field::LENGTH], length as u16);
        emit_list(&self.0, &mut buffer[field::OXM_FIELDS(length)])?;
        for byte in &mut buffer[field::PADDING(length)] {
            *byte = 0;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::of13::oxm::{Field, FieldRepr};

    #[cfg_attr(rustfmt, rustfmt_skip)]
    static BYTES: [u8; 24] = [
        // header
        0x00, 0x01,             // match type (1 = oxm)
        0x00, 0x10,             // length = 16

        // first oxm tlv (len = 8)
        0x80, 0x00,             // class = openflow basic
        0x00,                   // field (0 = in_port), no mask
        0x04,                   // value length = 4
        0x00, 0x00, 0xab, 0xcd, // value = 43981

        // second oxm tlv (len = 6)
        0x80, 0x00,             // class = openflow basic
        6 << 1,                 // field = 6 = vlan id, no mask
        0x02,                   // value length = 2
        0x07, 0x77,             // value

        // padding to the 8-byte boundary
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00
    ];

    fn repr() -> FlowMatchRepr {
        FlowMatchRepr(vec![
            Oxm::Basic(FieldRepr {
                field: Field::InPort,
                value: vec![0x00, 0x00, 0xab, 0xcd],
                mask: None,
            }),
            Oxm::Basic(FieldRepr {
                field: Field::VlanVid,
                value: vec![0x07, 0x77],
                mask: None,
            }),
        ])
    }

    #[test]
    fn parse() {
        assert_eq!(FlowMatchRepr::parse(&BYTES).unwrap(), repr());
    }

    #[test]
    fn emit() {
        let repr = repr();
        assert_eq!(repr.buffer_len(), 24);
        let mut bytes = [0xff; 24];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[..], &BYTES[..]);
    }

    #[test]
    fn single_field_pads_to_16() {
        // 4-byte header + 6-byte TLV, padded to the 8-byte boundary.
        let repr = FlowMatchRepr(vec![Oxm::Basic(FieldRepr {
            field: Field::EthType,
            value: vec![0x08, 0x00],
            mask: None,
        })]);
        assert_eq!(repr.buffer_len(), 16);
        let mut bytes = vec![0xff; 16];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[0..4], &[0x00, 0x01, 0x00, 0x0a]);
        assert_eq!(&bytes[4..10], &[0x80, 0x00, 0x0a, 0x02, 0x08, 0x00]);
        assert_eq!(&bytes[10..16], &[0; 6]);
    }

    #[test]
    fn empty_match_is_one_padded_header() {
        let repr = FlowMatchRepr(vec![]);
        assert_eq!(repr.buffer_len(), 8);
        let mut bytes = vec![0xff; 8];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[..], &[0x00, 0x01, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(FlowMatchRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn standard_match_type_is_rejected() {
        let mut bytes = BYTES;
        bytes[1] = 0x00;
        assert_eq!(FlowMatchRepr::parse(&bytes), Err(Error::UnknownTag));
    }
}
