//! The port-status body, identical in OpenFlow 1.1 and 1.3.

use crate::bitmap::FlagBits;
use crate::port::PortRepr;
use crate::{Error, Repr, Result};

flag_set! {
    /// Reasons for a port-status message. The reason codes double as bit
    /// positions in the v1.3 async-config port-status mask.
    pub enum PortReason {
        /// The port was added.
        Add = 0,
        /// The port was removed.
        Delete = 1,
        /// Some attribute of the port has changed.
        Modify = 2
    }
}

mod field {
    use crate::field::*;

    pub const REASON: usize = 0;
    pub const PAD: Field = 1..8;
    pub const PORT: Field = 8..72;
}

/// A high-level representation of a port-status body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PortStatusRepr {
    pub reason: PortReason,
    pub port: PortRepr,
}

impl Repr for PortStatusRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::PORT.end {
            return Err(Error::Truncated);
        }
        let reason = PortReason::from_bit(u32::from(buffer[field::REASON]))
            .ok_or(Error::UnknownTag)?;
        Ok(PortStatusRepr {
            reason,
            port: PortRepr::parse(&buffer[field::PORT])?,
        })
    }

    fn buffer_len(&self) -> usize {
        field::PORT.end
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        buffer[field::REASON] = self.reason.bit() as u8;
        for byte in &mut buffer[field::PAD] {
            *byte = 0;
        }
        self.port.emit(&mut buffer[field::PORT])
    }
}
