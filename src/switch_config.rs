//! The switch configuration body carried by get-config-reply and
//! set-config messages, identical in OpenFlow 1.1 and 1.3.

use byteorder::{ByteOrder, NetworkEndian};

use crate::{Error, Repr, Result};

/// Indicate whether IP fragments should be treated normally, dropped, or
/// reassembled.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConfigFlags {
    /// No special handling for fragments.
    FragmentNormal,
    /// Drop fragmented packets.
    FragmentDrop,
    /// Reassemble fragmented packets.
    FragmentReassemble,
    /// Mask covering the fragment handling bits.
    FragmentMask,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

mod field {
    use crate::field::*;

    pub const FLAGS: Field = 0..2;
    pub const MISS_SEND_LEN: Field = 2..4;
}

impl<T: AsRef<[u8]>> Packet<T> {
    pub fn new(buffer: T) -> Packet<T> {
        Packet { buffer }
    }

    pub fn new_checked(buffer: T) -> Result<Packet<T>> {
        let packet = Self::new(buffer);
        packet.check_len()?;
        Ok(packet)
    }

    pub fn check_len(&self) -> Result<()> {
        if self.buffer.as_ref().len() < field::MISS_SEND_LEN.end {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    /// Consume the packet, returning the underlying buffer.
    pub fn into_inner(self) -> T {
        self.buffer
    }

    /// Return the `flags` field.
    pub fn flags(&self) -> Result<ConfigFlags> {
        let data = self.buffer.as_ref();
        match NetworkEndian::read_u16(&data[field::FLAGS]) {
            0 => Ok(ConfigFlags::FragmentNormal),
            1 => Ok(ConfigFlags::FragmentDrop),
            2 => Ok(ConfigFlags::FragmentReassemble),
            3 => Ok(ConfigFlags::FragmentMask),
            _ => Err(Error::UnknownTag),
        }
    }

    /// Return the `miss_send_len` field.
    pub fn miss_send_len(&self) -> u16 {
        let data = self.buffer.as_ref();
        NetworkEndian::read_u16(&data[field::MISS_SEND_LEN])
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    /// Set the `flags` field.
    pub fn set_flags(&mut self, value: ConfigFlags) {
        let value = match value {
            ConfigFlags::FragmentNormal => 0,
            ConfigFlags::FragmentDrop => 1,
            ConfigFlags::FragmentReassemble => 2,
            ConfigFlags::FragmentMask => 3,
        };
        let data = self.buffer.as_mut();
        NetworkEndian::write_u16(&mut data[field::FLAGS], value)
    }

    /// Set the `miss_send_len` field.
    pub fn set_miss_send_len(&mut self, value: u16) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u16(&mut data[field::MISS_SEND_LEN], value)
    }
}

/// A high-level representation of a switch configuration body.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SwitchConfigRepr {
    pub flags: ConfigFlags,
    /// Max bytes of a new flow that the datapath should send to the
    /// controller in a packet-in.
    pub miss_send_len: u16,
}

impl Repr for SwitchConfigRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = Packet::new_checked(buffer)?;
        Ok(SwitchConfigRepr {
            flags: packet.flags()?,
            miss_send_len: packet.miss_send_len(),
        })
    }

    fn buffer_len(&self) -> usize {
        field::MISS_SEND_LEN.end
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        let mut packet = Packet::new_checked(buffer)?;
        packet.set_flags(self.flags);
        packet.set_miss_send_len(self.miss_send_len);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let repr = SwitchConfigRepr {
            flags: ConfigFlags::FragmentDrop,
            miss_send_len: 128,
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[..], &[0x00, 0x01, 0x00, 0x80]);
        assert_eq!(SwitchConfigRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn unknown_flags() {
        assert_eq!(
            SwitchConfigRepr::parse(&[0x00, 0x07, 0x00, 0x80]),
            Err(Error::UnknownTag)
        );
    }
}
