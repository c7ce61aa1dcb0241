//! `ofwire` is an encoder and decoder for the OpenFlow switch-to-controller
//! wire protocol, versions 1.1 (wire version 2) and 1.3 (wire version 4).
//!
//! The crate exposes two entry points: [`encode`] turns a [`Message`] into
//! the exact byte sequence the protocol defines, and [`decode`] parses a
//! complete frame back into a [`Message`]. Both are pure functions: no state
//! is kept between calls, nothing is logged, and every failure is reported
//! as a single [`Error`] value.
//!
//! [`encode`]: fn.encode.html
//! [`decode`]: fn.decode.html
//! [`Message`]: enum.Message.html
//! [`Error`]: enum.Error.html

use core::fmt;

mod field {
    use core::ops;
    pub type Field = ops::Range<usize>;
    pub type Rest = ops::RangeFrom<usize>;
}

/// The error type for OpenFlow encoding and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An outgoing structure does not fit in the buffer it is emitted into.
    Exhausted,
    /// An incoming frame is shorter than a fixed layout or a declared length
    /// field requires.
    Truncated,
    /// A declared length field disagrees with the bytes that follow it.
    LengthMismatch,
    /// An enumeration lookup failed: an unrecognized message type,
    /// instruction type, match field, reason, role, queue property, meter
    /// band type, or a set bit in a flag bitmap with no defined symbol.
    UnknownTag,
    /// A construct that the protocol defines but this version does not
    /// carry, e.g. a v1.3-only error type inside a v1.1 frame.
    BadMessage,
    /// A caller-provided value or mask is narrower than the canonical
    /// width of its field.
    InvariantViolation,
}

/// The result type for OpenFlow encoding and decoding.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Exhausted => write!(f, "buffer space exhausted"),
            Error::Truncated => write!(f, "truncated frame"),
            Error::LengthMismatch => write!(f, "length field mismatch"),
            Error::UnknownTag => write!(f, "unknown enumeration value"),
            Error::BadMessage => write!(f, "message not supported by this version"),
            Error::InvariantViolation => write!(f, "field width invariant violated"),
        }
    }
}

impl std::error::Error for Error {}

/// The interface between a wire structure and its high-level representation.
pub trait Repr
where
    Self: Sized,
{
    /// Parse a wire structure and return a high-level representation.
    fn parse(buffer: &[u8]) -> Result<Self>;

    /// Return the length of the wire structure that will be emitted from
    /// this high-level representation.
    fn buffer_len(&self) -> usize;

    /// Emit a high-level representation into a buffer.
    fn emit(&self, buffer: &mut [u8]) -> Result<()>;
}

#[macro_use]
mod macros;

pub mod bitmap;
pub mod bytes;
pub mod list;
mod message;

pub mod stats;

pub mod error_msg;
pub mod group_mod;
pub mod packet_out;
pub mod port;
pub mod port_mod;
pub mod port_status;
pub mod switch_config;
pub mod table_mod;

pub mod of11;
pub mod of13;

pub use crate::error_msg as error;
pub use crate::group_mod::{Bucket, GroupCommand, GroupModRepr, GroupType};
pub use crate::message::{decode, encode, Message, VERSION_OF11, VERSION_OF13};
pub use crate::packet_out::PacketOutRepr;
pub use crate::port::{PortConfig, PortFeature, PortNumber, PortRepr, PortState};
pub use crate::port_mod::PortModRepr;
pub use crate::port_status::{PortReason, PortStatusRepr};
pub use crate::switch_config::{ConfigFlags, SwitchConfigRepr};
pub use crate::table_mod::TableModRepr;
