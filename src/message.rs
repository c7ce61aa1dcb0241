//! The 8-byte OpenFlow header and the version-dispatching entry points.
//!
//! ```no_rust
//! +--------+--------+--------+--------+
//! |version |  type  |     length      |
//! +--------+--------+--------+--------+
//! |                xid                |
//! +--------+--------+--------+--------+
//! |               body                |
//! +--------+--------+--------+--------+
//! ```
//!
//! - In version 1.3 the first byte is the wire version (4). In version 1.1
//!   only the low 7 bits are the wire version (2); the top bit is the
//!   experimental flag.
//! - The length field covers the header and the body.
//! - The xid, or transaction identifier, is opaque to the codec and used by
//!   callers to match requests to responses.

use byteorder::{ByteOrder, NetworkEndian};

use crate::{of11, of13};
use crate::{Error, Repr, Result};

/// Wire version byte of OpenFlow 1.1.
pub const VERSION_OF11: u8 = 2;
/// Wire version byte of OpenFlow 1.3.
pub const VERSION_OF13: u8 = 4;

mod field {
    use crate::field::*;

    pub const VERSION: usize = 0;
    pub const KIND: usize = 1;
    pub const LENGTH: Field = 2..4;
    pub const XID: Field = 4..8;
}

/// Length of the OpenFlow header present on every frame.
pub const HEADER_LEN: usize = field::XID.end;

/// A read/write wrapper around an OpenFlow frame buffer. The version byte
/// is exposed raw; its interpretation is version-specific.
#[derive(Debug)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Packet<T> {
    /// Imbue a raw octet buffer with OpenFlow frame structure.
    pub fn new(buffer: T) -> Packet<T> {
        Packet { buffer }
    }

    /// Shorthand for a combination of [new] and [check_len].
    ///
    /// [new]: #method.new
    /// [check_len]: #method.check_len
    pub fn new_checked(buffer: T) -> Result<Packet<T>> {
        let packet = Self::new(buffer);
        packet.check_len()?;
        Ok(packet)
    }

    /// Ensure that no accessor method will panic if called.
    /// Returns `Err(Error::Truncated)` if the buffer is too short.
    pub fn check_len(&self) -> Result<()> {
        if self.buffer.as_ref().len() < HEADER_LEN {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    /// Consume the packet, returning the underlying buffer.
    pub fn into_inner(self) -> T {
        self.buffer
    }

    /// Return the raw version byte.
    #[inline]
    pub fn version_byte(&self) -> u8 {
        self.buffer.as_ref()[field::VERSION]
    }

    /// Return the type byte.
    #[inline]
    pub fn kind(&self) -> u8 {
        self.buffer.as_ref()[field::KIND]
    }

    /// Return the length field. The length covers the header and the body.
    #[inline]
    pub fn length(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::LENGTH])
    }

    /// Return the xid field.
    #[inline]
    pub fn xid(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::XID])
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Packet<&'a T> {
    /// Return a pointer to the body, sliced by the length field.
    ///
    /// Returns `Err(Error::LengthMismatch)` if the length field does not
    /// cover the header, and `Err(Error::Truncated)` if it claims more
    /// bytes than the buffer holds.
    pub fn body(&self) -> Result<&'a [u8]> {
        let length = self.length() as usize;
        let data = self.buffer.as_ref();
        if length < HEADER_LEN {
            Err(Error::LengthMismatch)
        } else if length > data.len() {
            Err(Error::Truncated)
        } else {
            Ok(&data[HEADER_LEN..length])
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    /// Set the raw version byte.
    #[inline]
    pub fn set_version_byte(&mut self, value: u8) {
        self.buffer.as_mut()[field::VERSION] = value
    }

    /// Set the type byte.
    #[inline]
    pub fn set_kind(&mut self, value: u8) {
        self.buffer.as_mut()[field::KIND] = value
    }

    /// Set the length field.
    #[inline]
    pub fn set_length(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::LENGTH], value)
    }

    /// Set the xid field.
    #[inline]
    pub fn set_xid(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::XID], value)
    }

    /// Return a mutable pointer to the body, sliced by the length field.
    pub fn body_mut(&mut self) -> &mut [u8] {
        let length = self.length() as usize;
        &mut self.buffer.as_mut()[HEADER_LEN..length]
    }
}

/// A complete OpenFlow control message of either supported version.
#[derive(Debug, PartialEq, Clone)]
pub enum Message {
    /// An OpenFlow 1.1 message.
    Of11(of11::Message),
    /// An OpenFlow 1.3 message.
    Of13(of13::Message),
}

impl Repr for Message {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.is_empty() {
            return Err(Error::Truncated);
        }
        // The v1.1 version lives in the low 7 bits of the first byte; the
        // top bit is the experimental flag. v1.3 uses the whole byte.
        if buffer[0] & 0x7f == VERSION_OF11 {
            Ok(Message::Of11(of11::Message::parse(buffer)?))
        } else if buffer[0] == VERSION_OF13 {
            Ok(Message::Of13(of13::Message::parse(buffer)?))
        } else {
            Err(Error::UnknownTag)
        }
    }

    fn buffer_len(&self) -> usize {
        match *self {
            Message::Of11(ref repr) => repr.buffer_len(),
            Message::Of13(ref repr) => repr.buffer_len(),
        }
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        match *self {
            Message::Of11(ref repr) => repr.emit(buffer),
            Message::Of13(ref repr) => repr.emit(buffer),
        }
    }
}

/// Encode a message into a freshly allocated byte sequence.
pub fn encode(message: &Message) -> Result<Vec<u8>> {
    let mut buffer = vec![0; message.buffer_len()];
    message.emit(&mut buffer)?;
    Ok(buffer)
}

/// Decode one complete frame into a message.
pub fn decode(buffer: &[u8]) -> Result<Message> {
    Message::parse(buffer)
}
