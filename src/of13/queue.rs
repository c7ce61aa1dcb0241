//! OpenFlow 1.3 packet queues and the queue-get-config bodies.
//!
//! ```no_rust
//! +--------+--------+--------+--------+
//! |             queue id              |
//! +--------+--------+--------+--------+
//! |              port no              |
//! +--------+--------+--------+--------+
//! |      length     |    (padding)    |
//! +--------+--------+--------+--------+
//! |     (padding)   |    properties   |
//! +--------+--------+    (variable)   |
//! +--------+--------+--------+--------+
//! ```
//!
//! The queue length field covers the 16-byte queue header plus the summed
//! property lengths. Version 1.3 defines min-rate, max-rate and an
//! experimenter property.

use byteorder::{ByteOrder, NetworkEndian};

use crate::list::{emit_list, list_len, parse_list};
use crate::port::PortNumber;
use crate::{Error, Repr, Result};

const QUEUE_HEADER_LEN: usize = 16;
const PROPERTY_HEADER_LEN: usize = 8;
const RATE_PROPERTY_LEN: usize = 16;
const EXPERIMENTER_PROPERTY_LEN: usize = 16;

const PROPERTY_MIN_RATE: u16 = 1;
const PROPERTY_MAX_RATE: u16 = 2;
const PROPERTY_EXPERIMENTER: u16 = 0xffff;

/// A property of a packet queue.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum QueueProperty {
    /// Minimum datarate guaranteed, in 1/10 of a percent; values above
    /// 1000 mean the rate is disabled.
    MinRate(u16),
    /// Maximum datarate, in 1/10 of a percent; values above 1000 mean the
    /// rate is disabled.
    MaxRate(u16),
    /// Experimenter-defined property.
    Experimenter { experimenter: u32, data: Vec<u8> },
}

impl Repr for QueueProperty {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < PROPERTY_HEADER_LEN {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[2..4]) as usize;
        if length < PROPERTY_HEADER_LEN {
            return Err(Error::LengthMismatch);
        }
        if length > buffer.len() {
            return Err(Error::Truncated);
        }
        match NetworkEndian::read_u16(&buffer[0..2]) {
            kind @ PROPERTY_MIN_RATE | kind @ PROPERTY_MAX_RATE => {
                if length != RATE_PROPERTY_LEN {
                    return Err(Error::LengthMismatch);
                }
                let rate = NetworkEndian::read_u16(&buffer[8..10]);
                if kind == PROPERTY_MIN_RATE {
                    Ok(QueueProperty::MinRate(rate))
                } else {
                    Ok(QueueProperty::MaxRate(rate))
                }
            }
            PROPERTY_EXPERIMENTER => {
                if length < EXPERIMENTER_PROPERTY_LEN {
                    return Err(Error::LengthMismatch);
                }
                Ok(QueueProperty::Experimenter {
                    experimenter: NetworkEndian::read_u32(&buffer[8..12]),
                    data: buffer[16..length].to_vec(),
                })
            }
            _ => Err(Error::UnknownTag),
        }
    }

    fn buffer_len(&self) -> usize {
        match *self {
            QueueProperty::MinRate(_) | QueueProperty::MaxRate(_) => RATE_PROPERTY_LEN,
            QueueProperty::Experimenter { ref data, .. } => {
                EXPERIMENTER_PROPERTY_LEN + data.len()
            }
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
        NetworkEndian::write_u16(&mut buffer[2..4], length as u16);
        match *self {
            QueueProperty::MinRate(rate) => {
                NetworkEndian::write_u16(&mut buffer[0..2], PROPERTY_MIN_RATE);
                NetworkEndian::write_u16(&mut buffer[8..10], rate);
            }
            QueueProperty::MaxRate(rate) => {
                NetworkEndian::write_u16(&mut buffer[0..2], PROPERTY_MAX_RATE);
                NetworkEndian::write_u16(&mut buffer[8..10], rate);
            }
            QueueProperty::Experimenter {
                experimenter,
                ref data,
            } => {
                NetworkEndian::write_u16(&mut buffer[0..2], PROPERTY_EXPERIMENTER);
                NetworkEndian::write_u32(&mut buffer[8..12], experimenter);
                buffer[16..length].copy_from_slice(data);
            }
        }
        Ok(())
    }
}

/// A high-level representation of a v1.3 packet queue.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct QueueRepr {
    pub queue_id: u32,
    /// Port this queue is attached to.
    pub port_no: PortNumber,
    pub properties: Vec<QueueProperty>,
}

impl Repr for QueueRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < QUEUE_HEADER_LEN {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[8..10]) as usize;
        if length < QUEUE_HEADER_LEN {
            return Err(Error::LengthMismatch);
        }
        if length > buffer.len() {
            return Err(Error::Truncated);
        }
        Ok(QueueRepr {
            queue_id: NetworkEndian::read_u32(&buffer[0..4]),
            port_no: PortNumber::from(NetworkEndian::read_u32(&buffer[4..8])),
            properties: parse_list(&buffer[QUEUE_HEADER_LEN..length])?,
        })
    }

    fn buffer_len(&self) -> usize {
        QUEUE_HEADER_LEN + list_len(&self.properties)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        let length = self.buffer_len();
        if buffer.len() < length {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[0..4], self.queue_id);
        NetworkEndian::write_u32(&mut buffer[4..8], self.port_no.into());
        NetworkEndian::write_u16(&mut buffer[8..10], length as u16);
        for byte in &mut buffer[10..16] {
            *byte = 0;
        }
        emit_list(&self.properties, &mut buffer[QUEUE_HEADER_LEN..length])
    }
}

mod field {
    use crate::field::*;

    pub const PORT: Field = 0..4;
    pub const PAD: Field = 4..8;
    pub const QUEUES: Rest = 8..;
}

/// A high-level representation of a queue-get-config request body.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct GetConfigRequestRepr {
    pub port: PortNumber,
}

impl Repr for GetConfigRequestRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::PAD.end {
            return Err(Error::Truncated);
        }
        Ok(GetConfigRequestRepr {
            port: PortNumber::from(NetworkEndian::read_u32(&buffer[field::PORT])),
        })
    }

    fn buffer_len(&self) -> usize {
        field::PAD.end
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[field::PORT], self.port.into());
        for byte in &mut buffer[field::PAD] {
            *byte = 0;
        }
        Ok(())
    }
}

/// A high-level representation of a queue-get-config reply body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GetConfigReplyRepr {
    pub port: PortNumber,
    pub queues: Vec<QueueRepr>,
}

impl Repr for GetConfigReplyRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::QUEUES.start {
            return Err(Error::Truncated);
        }
        Ok(GetConfigReplyRepr {
            port: PortNumber::from(NetworkEndian::read_u32(&buffer[field::PORT])),
            queues: parse_list(&buffer[field::QUEUES])?,
        })
    }

    fn buffer_len(&self) -> usize {
        field::QUEUES.start + list_len(&self.queues)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[field::PORT], self.port.into());
        for byte in &mut buffer[field::PAD] {
            *byte = 0;
        }
        emit_list(&self.queues, &mut buffer[field::QUEUES])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn queue_round_trip() {
        let repr = QueueRepr {
            queue_id: 1,
            port_no: PortNumber::Regular(3),
            properties: vec![
                QueueProperty::MinRate(100),
                QueueProperty::MaxRate(500),
                QueueProperty::Experimenter {
                    experimenter: 0xcafe,
                    data: vec![1, 2, 3, 4, 5, 6, 7, 8],
                },
            ],
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 16 + 16 + 16 + 24);
        // queue length covers header and properties.
        assert_eq!(&bytes[8..10], &[0x00, 0x48]);
        assert_eq!(QueueRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn reply_round_trip() {
        let repr = GetConfigReplyRepr {
            port: PortNumber::Any,
            queues: vec![QueueRepr {
                queue_id: 9,
                port_no: PortNumber::Regular(1),
                properties: vec![QueueProperty::MaxRate(1000)],
            }],
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(GetConfigReplyRepr::parse(&bytes).unwrap(), repr);
    }
}
