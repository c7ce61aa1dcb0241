//! The OpenFlow 1.3 meter-mod body and its rate bands.
//!
//! ```no_rust
//! +--------+--------+--------+--------+
//! |     command     |      flags      |
//! +--------+--------+--------+--------+
//! |             meter id              |
//! +--------+--------+--------+--------+
//! |      bands (16 bytes each)        |
//! +--------+--------+--------+--------+
//! ```

use byteorder::{ByteOrder, NetworkEndian};

use crate::bitmap::{emit_flags, parse_flags};
use crate::list::{emit_list, list_len, parse_list};
use crate::{Error, Repr, Result};

enum_with_unknown! {
    /// Meter commands.
    pub doc enum Command(u16) {
        /// New meter.
        Add = 0,
        /// Modify specified meter.
        Modify = 1,
        /// Delete specified meter.
        Delete = 2
    }
}

flag_set! {
    /// Meter configuration flags.
    pub enum MeterFlags {
        /// Rate value in kb/s.
        Kbps = 0,
        /// Rate value in packets/s.
        Pktps = 1,
        /// Do burst size.
        Burst = 2,
        /// Collect statistics.
        Stats = 3
    }
}

const BAND_TYPE_DROP: u16 = 1;
const BAND_TYPE_DSCP_REMARK: u16 = 2;
const BAND_TYPE_EXPERIMENTER: u16 = 0xffff;

/// Length of every meter band on the wire.
pub const BAND_LEN: usize = 16;

/// One rate band of a meter. All bands share a fixed 16-byte layout:
/// type, length, rate and burst size, then 4 type-specific bytes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Band {
    /// Drop packets exceeding the band rate.
    Drop { rate: u32, burst_size: u32 },
    /// Remark the DSCP field of packets exceeding the band rate.
    DscpRemark {
        rate: u32,
        burst_size: u32,
        /// Number of drop precedence levels to add.
        prec_level: u8,
    },
    /// Experimenter-defined band.
    Experimenter {
        rate: u32,
        burst_size: u32,
        experimenter: u32,
    },
}

mod band_field {
    use crate::field::*;

    pub const KIND: Field = 0..2;
    pub const LENGTH: Field = 2..4;
    pub const RATE: Field = 4..8;
    pub const BURST_SIZE: Field = 8..12;
    pub const BODY: Field = 12..16;
}

impl Repr for Band {
    fn parse(buffer: &[u8]) -> Result<Self> {
        use self::band_field as field;
        if buffer.len() < BAND_LEN {
            return Err(Error::Truncated);
        }
        if NetworkEndian::read_u16(&buffer[field::LENGTH]) as usize != BAND_LEN {
            return Err(Error::LengthMismatch);
        }
        let rate = NetworkEndian::read_u32(&buffer[field::RATE]);
        let burst_size = NetworkEndian::read_u32(&buffer[field::BURST_SIZE]);
        match NetworkEndian::read_u16(&buffer[field::KIND]) {
            BAND_TYPE_DROP => Ok(Band::Drop { rate, burst_size }),
            BAND_TYPE_DSCP_REMARK => Ok(Band::DscpRemark {
                rate,
                burst_size,
                prec_level: buffer[field::BODY.start],
            }),
            BAND_TYPE_EXPERIMENTER => Ok(Band::Experimenter {
                rate,
                burst_size,
                experimenter: NetworkEndian::read_u32(&buffer[field::BODY]),
            }),
            _ => Err(Error::UnknownTag),
        }
    }

    fn buffer_len(&self) -> usize {
        BAND_LEN
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        use self::band_field as field;
        if buffer.len() < BAND_LEN {
            return Err(Error::Exhausted);
        }
        for byte in &mut buffer[..BAND_LEN] {
            *byte = 0;
        }
        NetworkEndian::write_u16(&mut buffer[field::LENGTH], BAND_LEN as u16);
        match *self {
            Band::Drop { rate, burst_size } => {
                NetworkEndian::write_u16(&mut buffer[field::KIND], BAND_TYPE_DROP);
                NetworkEndian::write_u32(&mut buffer[field::RATE], rate);
                NetworkEndian::write_u32(&mut buffer[field::BURST_SIZE], burst_size);
            }
            Band::DscpRemark {
                rate,
                burst_size,
                prec_level,
            } => {
                NetworkEndian::write_u16(&mut buffer[field::KIND], BAND_TYPE_DSCP_REMARK);
                NetworkEndian::write_u32(&mut buffer[field::RATE], rate);
                NetworkEndian::write_u32(&mut buffer[field::BURST_SIZE], burst_size);
                buffer[field::BODY.start] = prec_level;
            }
            Band::Experimenter {
                rate,
                burst_size,
                experimenter,
            } => {
                NetworkEndian::write_u16(&mut buffer[field::KIND], BAND_TYPE_EXPERIMENTER);
                NetworkEndian::write_u32(&mut buffer[field::RATE], rate);
                NetworkEndian::write_u32(&mut buffer[field::BURST_SIZE], burst_size);
                NetworkEndian::write_u32(&mut buffer[field::BODY], experimenter);
            }
        }
        Ok(())
    }
}

mod field {
    use crate::field::*;

    pub const COMMAND: Field = 0..2;
    pub const FLAGS: Field = 2..4;
    pub const METER_ID: Field = 4..8;
    pub const BANDS: Rest = 8..;
}

/// A high-level representation of a meter-mod body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MeterModRepr {
    pub command: Command,
    pub flags: Vec<MeterFlags>,
    pub meter_id: u32,
    pub bands: Vec<Band>,
}

impl Repr for MeterModRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::METER_ID.end {
            return Err(Error::Truncated);
        }
        let command = match Command::from(NetworkEndian::read_u16(&buffer[field::COMMAND])) {
            Command::_Unknown(_) => return Err(Error::UnknownTag),
            command => command,
        };
        Ok(MeterModRepr {
            command,
            flags: parse_flags(u32::from(NetworkEndian::read_u16(&buffer[field::FLAGS])))?,
            meter_id: NetworkEndian::read_u32(&buffer[field::METER_ID]),
            bands: parse_list(&buffer[field::BANDS])?,
        })
    }

    fn buffer_len(&self) -> usize {
        field::METER_ID.end + list_len(&self.bands)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u16(&mut buffer[field::COMMAND], self.command.into());
        NetworkEndian::write_u16(&mut buffer[field::FLAGS], emit_flags(&self.flags) as u16);
        NetworkEndian::write_u32(&mut buffer[field::METER_ID], self.meter_id);
        emit_list(&self.bands, &mut buffer[field::BANDS])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let repr = MeterModRepr {
            command: Command::Add,
            flags: vec![MeterFlags::Kbps, MeterFlags::Burst],
            meter_id: 7,
            bands: vec![
                Band::Drop {
                    rate: 1000,
                    burst_size: 100,
                },
                Band::DscpRemark {
                    rate: 500,
                    burst_size: 50,
                    prec_level: 1,
                },
                Band::Experimenter {
                    rate: 250,
                    burst_size: 25,
                    experimenter: 0xbeef,
                },
            ],
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 8 + 3 * BAND_LEN);
        assert_eq!(&bytes[2..4], &[0x00, 0x05]);
        assert_eq!(MeterModRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn unknown_band() {
        let mut bytes = vec![0; 8 + BAND_LEN];
        NetworkEndian::write_u16(&mut bytes[8..10], 3);
        NetworkEndian::write_u16(&mut bytes[10..12], BAND_LEN as u16);
        assert_eq!(MeterModRepr::parse(&bytes), Err(Error::UnknownTag));
    }
}
