//! Conversion between closed flag families and their on-wire bitmaps.
//!
//! Every flag bitmap in OpenFlow 1.1 and 1.3 is a 32-bit big-endian word in
//! which bit `b` (counted from the least significant bit) stands for one
//! symbol of a per-family enumeration. Families are declared with the
//! `flag_set!` macro, which implements [`FlagBits`] for the enum.
//!
//! [`FlagBits`]: trait.FlagBits.html

use crate::{Error, Result};

/// A flag family member that maps to a bit position in a bitmap.
pub trait FlagBits: Sized + Copy {
    /// Return the bit position assigned to this flag.
    fn bit(self) -> u32;

    /// Return the flag assigned to a bit position, if the family defines
    /// one there.
    fn from_bit(bit: u32) -> Option<Self>;
}

/// Build a bitmap from a set of flags.
pub fn emit_flags<F: FlagBits>(flags: &[F]) -> u32 {
    flags.iter().fold(0, |bitmap, flag| bitmap | 1 << flag.bit())
}

/// Decode a bitmap into the flags it carries, in ascending bit order.
///
/// A set bit with no symbol in the family is an error: the symbol set of a
/// family is closed, and a peer setting an undefined bit is speaking a
/// dialect this codec does not know.
pub fn parse_flags<F: FlagBits>(bitmap: u32) -> Result<Vec<F>> {
    let mut flags = Vec::new();
    for bit in 0..32 {
        if bitmap & (1 << bit) != 0 {
            match F::from_bit(bit) {
                Some(flag) => flags.push(flag),
                None => return Err(Error::UnknownTag),
            }
        }
    }
    Ok(flags)
}

#[cfg(test)]
mod test {
    use super::*;

    flag_set! {
        pub enum TestFlag {
            Alpha = 0,
            Beta = 1,
            Gamma = 5
        }
    }

    #[test]
    fn emit() {
        assert_eq!(emit_flags::<TestFlag>(&[]), 0);
        assert_eq!(emit_flags(&[TestFlag::Alpha]), 1);
        assert_eq!(emit_flags(&[TestFlag::Gamma, TestFlag::Beta]), 0b10_0010);
    }

    #[test]
    fn parse() {
        assert_eq!(parse_flags::<TestFlag>(0).unwrap(), vec![]);
        assert_eq!(
            parse_flags::<TestFlag>(0b10_0011).unwrap(),
            vec![TestFlag::Alpha, TestFlag::Beta, TestFlag::Gamma]
        );
        assert_eq!(parse_flags::<TestFlag>(1 << 4), Err(Error::UnknownTag));
    }

    #[test]
    fn round_trip() {
        let flags = vec![TestFlag::Alpha, TestFlag::Gamma];
        assert_eq!(parse_flags::<TestFlag>(emit_flags(&flags)).unwrap(), flags);
    }
}
