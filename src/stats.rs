//! Statistics structures whose wire layout is identical in OpenFlow 1.1
//! and 1.3.

use byteorder::{ByteOrder, NetworkEndian};

use crate::bytes::{emit_name, strip_name};
use crate::group_mod::{buckets_len, emit_buckets, parse_buckets, Bucket, GroupType};
use crate::{Error, Repr, Result};

/// The switch description reply: five NUL-padded strings.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct DescStats {
    pub mfr_desc: String,
    pub hw_desc: String,
    pub sw_desc: String,
    pub serial_num: String,
    pub dp_desc: String,
}

mod desc_field {
    use crate::field::*;

    pub const MFR_DESC: Field = 0..256;
    pub const HW_DESC: Field = 256..512;
    pub const SW_DESC: Field = 512..768;
    pub const SERIAL_NUM: Field = 768..800;
    pub const DP_DESC: Field = 800..1056;
}

impl Repr for DescStats {
    fn parse(buffer: &[u8]) -> Result<Self> {
        use self::desc_field as field;
        if buffer.len() < field::DP_DESC.end {
            return Err(Error::Truncated);
        }
        Ok(DescStats {
            mfr_desc: strip_name(&buffer[field::MFR_DESC]),
            hw_desc: strip_name(&buffer[field::HW_DESC]),
            sw_desc: strip_name(&buffer[field::SW_DESC]),
            serial_num: strip_name(&buffer[field::SERIAL_NUM]),
            dp_desc: strip_name(&buffer[field::DP_DESC]),
        })
    }

    fn buffer_len(&self) -> usize {
        desc_field::DP_DESC.end
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        use self::desc_field as field;
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        emit_name(&self.mfr_desc, &mut buffer[field::MFR_DESC]);
        emit_name(&self.hw_desc, &mut buffer[field::HW_DESC]);
        emit_name(&self.sw_desc, &mut buffer[field::SW_DESC]);
        emit_name(&self.serial_num, &mut buffer[field::SERIAL_NUM]);
        emit_name(&self.dp_desc, &mut buffer[field::DP_DESC]);
        Ok(())
    }
}

/// The aggregate flow stats reply body.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AggregateStats {
    pub packet_count: u64,
    pub byte_count: u64,
    pub flow_count: u32,
}

impl Repr for AggregateStats {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 24 {
            return Err(Error::Truncated);
        }
        Ok(AggregateStats {
            packet_count: NetworkEndian::read_u64(&buffer[0..8]),
            byte_count: NetworkEndian::read_u64(&buffer[8..16]),
            flow_count: NetworkEndian::read_u32(&buffer[16..20]),
        })
    }

    fn buffer_len(&self) -> usize {
        24
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u64(&mut buffer[0..8], self.packet_count);
        NetworkEndian::write_u64(&mut buffer[8..16], self.byte_count);
        NetworkEndian::write_u32(&mut buffer[16..20], self.flow_count);
        for byte in &mut buffer[20..24] {
            *byte = 0;
        }
        Ok(())
    }
}

/// Per-bucket counters inside a group stats entry.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BucketCounter {
    pub packet_count: u64,
    pub byte_count: u64,
}

impl Repr for BucketCounter {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 16 {
            return Err(Error::Truncated);
        }
        Ok(BucketCounter {
            packet_count: NetworkEndian::read_u64(&buffer[0..8]),
            byte_count: NetworkEndian::read_u64(&buffer[8..16]),
        })
    }

    fn buffer_len(&self) -> usize {
        16
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < 16 {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u64(&mut buffer[0..8], self.packet_count);
        NetworkEndian::write_u64(&mut buffer[8..16], self.byte_count);
        Ok(())
    }
}

/// One entry of a group description reply.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GroupDescEntry {
    pub kind: GroupType,
    pub group_id: u32,
    pub buckets: Vec<Bucket>,
}

const GROUP_DESC_HEADER_LEN: usize = 8;

impl Repr for GroupDescEntry {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < GROUP_DESC_HEADER_LEN {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[0..2]) as usize;
        if length < GROUP_DESC_HEADER_LEN {
            return Err(Error::LengthMismatch);
        }
        if length > buffer.len() {
            return Err(Error::Truncated);
        }
        let kind = match GroupType::from(buffer[2]) {
            GroupType::_Unknown(_) => return Err(Error::UnknownTag),
            kind => kind,
        };
        Ok(GroupDescEntry {
            kind,
            group_id: NetworkEndian::read_u32(&buffer[4..8]),
            buckets: parse_buckets(&buffer[GROUP_DESC_HEADER_LEN..length])?,
        })
    }

    fn buffer_len(&self) -> usize {
        GROUP_DESC_HEADER_LEN + buckets_len(&self.buckets)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        let length = self.buffer_len();
        if buffer.len() < length {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u16(&mut buffer[0..2], length as u16);
        buffer[2] = self.kind.into();
        buffer[3] = 0;
        NetworkEndian::write_u32(&mut buffer[4..8], self.group_id);
        emit_buckets(&self.buckets, &mut buffer[GROUP_DESC_HEADER_LEN..length])
    }
}
