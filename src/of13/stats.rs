//! OpenFlow 1.3 multipart (statistics) requests and replies.
//!
//! The 8-byte stats header (`type:16 flags:16 pad[4]`) is shared by both
//! directions; the 16-bit stats type selects the body variant. The
//! table-features type exists in the protocol but its TLV property
//! machinery is out of scope for this codec; it is rejected in both
//! directions.

use byteorder::{ByteOrder, NetworkEndian};

use crate::bitmap::{emit_flags, parse_flags};
use crate::list::{emit_list, list_len, parse_list};
use crate::of13::flow_match::FlowMatchRepr;
use crate::of13::flow_mod::FlowModFlags;
use crate::of13::instruction::{
    emit_instructions, instructions_len, parse_instructions, InstructionRepr,
};
use crate::of13::meter_mod::{Band, MeterFlags};
use crate::port::{PortNumber, PortRepr};
use crate::stats::{AggregateStats, BucketCounter, DescStats, GroupDescEntry};
use crate::{Error, Repr, Result};

enum_with_unknown! {
    /// Multipart types.
    pub doc enum Kind(u16) {
        /// Description of the switch.
        Desc = 0,
        /// Individual flow statistics.
        Flow = 1,
        /// Aggregate flow statistics.
        Aggregate = 2,
        /// Flow table statistics.
        Table = 3,
        /// Port statistics.
        Port = 4,
        /// Queue statistics.
        Queue = 5,
        /// Group counter statistics.
        Group = 6,
        /// Group description.
        GroupDesc = 7,
        /// Group features.
        GroupFeatures = 8,
        /// Meter statistics.
        Meter = 9,
        /// Meter configuration.
        MeterConfig = 10,
        /// Meter features.
        MeterFeatures = 11,
        /// Table features.
        TableFeatures = 12,
        /// Port descriptions.
        PortDesc = 13,
        /// Experimenter statistics.
        Experimenter = 0xffff
    }
}

mod field {
    use crate::field::*;

    pub const KIND: Field = 0..2;
    pub const FLAGS: Field = 2..4;
    pub const PAD: Field = 4..8;
    pub const BODY: Rest = 8..;
}

/// Length of the stats header present in requests and replies.
pub const STATS_HEADER_LEN: usize = 8;

fn emit_stats_header(kind: Kind, flags: u16, buffer: &mut [u8]) {
    NetworkEndian::write_u16(&mut buffer[field::KIND], kind.into());
    NetworkEndian::write_u16(&mut buffer[field::FLAGS], flags);
    for byte in &mut buffer[field::PAD] {
        *byte = 0;
    }
}

/// The body shared by flow and aggregate stats requests.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FlowStatsRequest {
    /// Table to read, or 0xff for all tables.
    pub table_id: u8,
    /// Require matching entries to include this as an output port.
    pub out_port: PortNumber,
    /// Require matching entries to include this as an output group.
    pub out_group: u32,
    pub cookie: u64,
    pub cookie_mask: u64,
    pub flow_match: FlowMatchRepr,
}

mod flow_request_field {
    use crate::field::*;

    pub const TABLE_ID: usize = 0;
    pub const PAD1: Field = 1..4;
    pub const OUT_PORT: Field = 4..8;
    pub const OUT_GROUP: Field = 8..12;
    pub const PAD2: Field = 12..16;
    pub const COOKIE: Field = 16..24;
    pub const COOKIE_MASK: Field = 24..32;
    pub const FLOW_MATCH: Rest = 32..;
}

impl Repr for FlowStatsRequest {
    fn parse(buffer: &[u8]) -> Result<Self> {
        use self::flow_request_field as field;
        if buffer.len() < field::FLOW_MATCH.start {
            return Err(Error::Truncated);
        }
        Ok(FlowStatsRequest {
            table_id: buffer[field::TABLE_ID],
            out_port: PortNumber::from(NetworkEndian::read_u32(&buffer[field::OUT_PORT])),
            out_group: NetworkEndian::read_u32(&buffer[field::OUT_GROUP]),
            cookie: NetworkEndian::read_u64(&buffer[field::COOKIE]),
            cookie_mask: NetworkEndian::read_u64(&buffer[field::COOKIE_MASK]),
            flow_match: FlowMatchRepr::parse(&buffer[field::FLOW_MATCH])?,
        })
    }

    fn buffer_len(&self) -> usize {
        flow_request_field::FLOW_MATCH.start + self.flow_match.buffer_len()
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        use self::flow_request_field as field;
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        buffer[field::TABLE_ID] = self.table_id;
        for byte in &mut buffer[field::PAD1] {
            *byte = 0;
        }
        NetworkEndian::write_u32(&mut buffer[field::OUT_PORT], self.out_port.into());
        NetworkEndian::write_u32(&mut buffer[field::OUT_GROUP], self.out_group);
        for byte in &mut buffer[field::PAD2] {
            *byte = 0;
        }
        NetworkEndian::write_u64(&mut buffer[field::COOKIE], self.cookie);
        NetworkEndian::write_u64(&mut buffer[field::COOKIE_MASK], self.cookie_mask);
        self.flow_match.emit(&mut buffer[field::FLOW_MATCH])
    }
}

/// The body variants of a multipart request.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RequestBody {
    Desc,
    Flow(FlowStatsRequest),
    Aggregate(FlowStatsRequest),
    Table,
    /// Port statistics for one port, or all with `PortNumber::Any`.
    Port(PortNumber),
    Queue {
        port_no: PortNumber,
        queue_id: u32,
    },
    /// Group statistics for one group id, or all with 0xfffffffc.
    Group(u32),
    GroupDesc,
    GroupFeatures,
    /// Meter statistics for one meter id, or all with 0xffffffff.
    Meter(u32),
    /// Meter configuration for one meter id, or all with 0xffffffff.
    MeterConfig(u32),
    MeterFeatures,
    PortDesc,
    Experimenter {
        experimenter: u32,
        exp_type: u32,
        data: Vec<u8>,
    },
}

/// A high-level representation of a multipart request body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RequestRepr {
    /// Raw flags word; bit 0 means more requests follow.
    pub flags: u16,
    pub body: RequestBody,
}

impl RequestRepr {
    fn kind(&self) -> Kind {
        match self.body {
            RequestBody::Desc => Kind::Desc,
            RequestBody::Flow(_) => Kind::Flow,
            RequestBody::Aggregate(_) => Kind::Aggregate,
            RequestBody::Table => Kind::Table,
            RequestBody::Port(_) => Kind::Port,
            RequestBody::Queue { .. } => Kind::Queue,
            RequestBody::Group(_) => Kind::Group,
            RequestBody::GroupDesc => Kind::GroupDesc,
            RequestBody::GroupFeatures => Kind::GroupFeatures,
            RequestBody::Meter(_) => Kind::Meter,
            RequestBody::MeterConfig(_) => Kind::MeterConfig,
            RequestBody::MeterFeatures => Kind::MeterFeatures,
            RequestBody::PortDesc => Kind::PortDesc,
            RequestBody::Experimenter { .. } => Kind::Experimenter,
        }
    }
}

impl Repr for RequestRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < STATS_HEADER_LEN {
            return Err(Error::Truncated);
        }
        let flags = NetworkEndian::read_u16(&buffer[field::FLAGS]);
        let body = &buffer[field::BODY];
        let read_id = |body: &[u8]| -> Result<u32> {
            if body.len() < 8 {
                Err(Error::Truncated)
            } else {
                Ok(NetworkEndian::read_u32(&body[0..4]))
            }
        };
        let body = match Kind::from(NetworkEndian::read_u16(&buffer[field::KIND])) {
            Kind::Desc => RequestBody::Desc,
            Kind::Flow => RequestBody::Flow(FlowStatsRequest::parse(body)?),
            Kind::Aggregate => RequestBody::Aggregate(FlowStatsRequest::parse(body)?),
            Kind::Table => RequestBody::Table,
            Kind::Port => RequestBody::Port(PortNumber::from(read_id(body)?)),
            Kind::Queue => {
                if body.len() < 8 {
                    return Err(Error::Truncated);
                }
                RequestBody::Queue {
                    port_no: PortNumber::from(NetworkEndian::read_u32(&body[0..4])),
                    queue_id: NetworkEndian::read_u32(&body[4..8]),
                }
            }
            Kind::Group => RequestBody::Group(read_id(body)?),
            Kind::GroupDesc => RequestBody::GroupDesc,
            Kind::GroupFeatures => RequestBody::GroupFeatures,
            Kind::Meter => RequestBody::Meter(read_id(body)?),
            Kind::MeterConfig => RequestBody::MeterConfig(read_id(body)?),
            Kind::MeterFeatures => RequestBody::MeterFeatures,
            Kind::TableFeatures => return Err(Error::BadMessage),
            Kind::PortDesc => RequestBody::PortDesc,
            Kind::Experimenter => {
                if body.len() < 8 {
                    return Err(Error::Truncated);
                }
                RequestBody::Experimenter {
                    experimenter: NetworkEndian::read_u32(&body[0..4]),
                    exp_type: NetworkEndian::read_u32(&body[4..8]),
                    data: body[8..].to_vec(),
                }
            }
            Kind::_Unknown(_) => return Err(Error::UnknownTag),
        };
        Ok(RequestRepr { flags, body })
    }

    fn buffer_len(&self) -> usize {
        STATS_HEADER_LEN
            + match self.body {
                RequestBody::Desc
                | RequestBody::Table
                | RequestBody::GroupDesc
                | RequestBody::GroupFeatures
                | RequestBody::MeterFeatures
                | RequestBody::PortDesc => 0,
                RequestBody::Flow(ref request) | RequestBody::Aggregate(ref request) => {
                    request.buffer_len()
                }
                RequestBody::Port(_)
                | RequestBody::Queue { .. }
                | RequestBody::Group(_)
                | RequestBody::Meter(_)
                | RequestBody::MeterConfig(_) => 8,
                RequestBody::Experimenter { ref data, .. } => 8 + data.len(),
            }
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        emit_stats_header(self.kind(), self.flags, buffer);
        let body = &mut buffer[field::BODY];
        match self.body {
            RequestBody::Desc
            | RequestBody::Table
            | RequestBody::GroupDesc
            | RequestBody::GroupFeatures
            | RequestBody::MeterFeatures
            | RequestBody::PortDesc => {}
            RequestBody::Flow(ref request) | RequestBody::Aggregate(ref request) => {
                request.emit(body)?
            }
            RequestBody::Port(port_no) => {
                NetworkEndian::write_u32(&mut body[0..4], port_no.into());
                for byte in &mut body[4..8] {
                    *byte = 0;
                }
            }
            RequestBody::Queue { port_no, queue_id } => {
                NetworkEndian::write_u32(&mut body[0..4], port_no.into());
                NetworkEndian::write_u32(&mut body[4..8], queue_id);
            }
            RequestBody::Group(id) | RequestBody::Meter(id) | RequestBody::MeterConfig(id) => {
                NetworkEndian::write_u32(&mut body[0..4], id);
                for byte in &mut body[4..8] {
                    *byte = 0;
                }
            }
            RequestBody::Experimenter {
                experimenter,
                exp_type,
                ref data,
            } => {
                NetworkEndian::write_u32(&mut body[0..4], experimenter);
                NetworkEndian::write_u32(&mut body[4..8], exp_type);
                body[8..8 + data.len()].copy_from_slice(data);
            }
        }
        Ok(())
    }
}

/// One entry of a flow stats reply.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FlowStatsEntry {
    pub table_id: u8,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub priority: u16,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub flags: Vec<FlowModFlags>,
    pub cookie: u64,
    pub packet_count: u64,
    pub byte_count: u64,
    pub flow_match: FlowMatchRepr,
    pub instructions: Vec<InstructionRepr>,
}

mod flow_entry_field {
    use crate::field::*;

    pub const LENGTH: Field = 0..2;
    pub const TABLE_ID: usize = 2;
    pub const PAD1: usize = 3;
    pub const DURATION_SEC: Field = 4..8;
    pub const DURATION_NSEC: Field = 8..12;
    pub const PRIORITY: Field = 12..14;
    pub const IDLE_TIMEOUT: Field = 14..16;
    pub const HARD_TIMEOUT: Field = 16..18;
    pub const FLAGS: Field = 18..20;
    pub const PAD2: Field = 20..24;
    pub const COOKIE: Field = 24..32;
    pub const PACKET_COUNT: Field = 32..40;
    pub const BYTE_COUNT: Field = 40..48;
    pub const FLOW_MATCH: Rest = 48..;
}

impl Repr for FlowStatsEntry {
    fn parse(buffer: &[u8]) -> Result<Self> {
        use self::flow_entry_field as field;
        if buffer.len() < field::FLOW_MATCH.start {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[field::LENGTH]) as usize;
        if length < field::FLOW_MATCH.start {
            return Err(Error::LengthMismatch);
        }
        if length > buffer.len() {
            return Err(Error::Truncated);
        }
        let flow_match = FlowMatchRepr::parse(&buffer[field::FLOW_MATCH.start..length])?;
        let instructions_at = field::FLOW_MATCH.start + flow_match.buffer_len();
        if instructions_at > length {
            return Err(Error::LengthMismatch);
        }
        Ok(FlowStatsEntry {
            table_id: buffer[field::TABLE_ID],
            duration_sec: NetworkEndian::read_u32(&buffer[field::DURATION_SEC]),
            duration_nsec: NetworkEndian::read_u32(&buffer[field::DURATION_NSEC]),
            priority: NetworkEndian::read_u16(&buffer[field::PRIORITY]),
            idle_timeout: NetworkEndian::read_u16(&buffer[field::IDLE_TIMEOUT]),
            hard_timeout: NetworkEndian::read_u16(&buffer[field::HARD_TIMEOUT]),
            flags: parse_flags(u32::from(NetworkEndian::read_u16(&buffer[field::FLAGS])))?,
            cookie: NetworkEndian::read_u64(&buffer[field::COOKIE]),
            packet_count: NetworkEndian::read_u64(&buffer[field::PACKET_COUNT]),
            byte_count: NetworkEndian::read_u64(&buffer[field::BYTE_COUNT]),
            flow_match,
            instructions: parse_instructions(&buffer[instructions_at..length])?,
        })
    }

    fn buffer_len(&self) -> usize {
        flow_entry_field::FLOW_MATCH.start
            + self.flow_match.buffer_len()
            + instructions_len(&self.instructions)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        use self::flow_entry_field as field;
        let length = self.buffer_len();
        if buffer.len() < length {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u16(&mut buffer[field::LENGTH], length as u16);
        buffer[field::TABLE_ID] = self.table_id;
        buffer[field::PAD1] = 0;
        NetworkEndian::write_u32(&mut buffer[field::DURATION_SEC], self.duration_sec);
        NetworkEndian::write_u32(&mut buffer[field::DURATION_NSEC], self.duration_nsec);
        NetworkEndian::write_u16(&mut buffer[field::PRIORITY], self.priority);
        NetworkEndian::write_u16(&mut buffer[field::IDLE_TIMEOUT], self.idle_timeout);
        NetworkEndian::write_u16(&mut buffer[field::HARD_TIMEOUT], self.hard_timeout);
        NetworkEndian::write_u16(&mut buffer[field::FLAGS], emit_flags(&self.flags) as u16);
        for byte in &mut buffer[field::PAD2] {
            *byte = 0;
        }
        NetworkEndian::write_u64(&mut buffer[field::COOKIE], self.cookie);
        NetworkEndian::write_u64(&mut buffer[field::PACKET_COUNT], self.packet_count);
        NetworkEndian::write_u64(&mut buffer[field::BYTE_COUNT], self.byte_count);
        let instructions_at = field::FLOW_MATCH.start + self.flow_match.buffer_len();
        self.flow_match
            .emit(&mut buffer[field::FLOW_MATCH.start..instructions_at])?;
        emit_instructions(&self.instructions, &mut buffer[instructions_at..length])
    }
}

/// One entry of a table stats reply.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TableStatsEntry {
    pub table_id: u8,
    pub active_count: u32,
    pub lookup_count: u64,
    pub matched_count: u64,
}

impl Repr for TableStatsEntry {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 24 {
            return Err(Error::Truncated);
        }
        Ok(TableStatsEntry {
            table_id: buffer[0],
            active_count: NetworkEndian::read_u32(&buffer[4..8]),
            lookup_count: NetworkEndian::read_u64(&buffer[8..16]),
            matched_count: NetworkEndian::read_u64(&buffer[16..24]),
        })
    }

    fn buffer_len(&self) -> usize {
        24
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        buffer[0] = self.table_id;
        for byte in &mut buffer[1..4] {
            *byte = 0;
        }
        NetworkEndian::write_u32(&mut buffer[4..8], self.active_count);
        NetworkEndian::write_u64(&mut buffer[8..16], self.lookup_count);
        NetworkEndian::write_u64(&mut buffer[16..24], self.matched_count);
        Ok(())
    }
}

/// One entry of a port stats reply.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PortStatsEntry {
    pub port_no: PortNumber,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub rx_frame_err: u64,
    pub rx_over_err: u64,
    pub rx_crc_err: u64,
    pub collisions: u64,
    pub duration_sec: u32,
    pub duration_nsec: u32,
}

const PORT_ENTRY_LEN: usize = 112;

impl Repr for PortStatsEntry {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < PORT_ENTRY_LEN {
            return Err(Error::Truncated);
        }
        let counter = |index: usize| NetworkEndian::read_u64(&buffer[8 + index * 8..]);
        Ok(PortStatsEntry {
            port_no: PortNumber::from(NetworkEndian::read_u32(&buffer[0..4])),
            rx_packets: counter(0),
            tx_packets: counter(1),
            rx_bytes: counter(2),
            tx_bytes: counter(3),
            rx_dropped: counter(4),
            tx_dropped: counter(5),
            rx_errors: counter(6),
            tx_errors: counter(7),
            rx_frame_err: counter(8),
            rx_over_err: counter(9),
            rx_crc_err: counter(10),
            collisions: counter(11),
            duration_sec: NetworkEndian::read_u32(&buffer[104..108]),
            duration_nsec: NetworkEndian::read_u32(&buffer[108..112]),
        })
    }

    fn buffer_len(&self) -> usize {
        PORT_ENTRY_LEN
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < PORT_ENTRY_LEN {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[0..4], self.port_no.into());
        for byte in &mut buffer[4..8] {
            *byte = 0;
        }
        let counters = [
            self.rx_packets,
            self.tx_packets,
            self.rx_bytes,
            self.tx_bytes,
            self.rx_dropped,
            self.tx_dropped,
            self.rx_errors,
            self.tx_errors,
            self.rx_frame_err,
            self.rx_over_err,
            self.rx_crc_err,
            self.collisions,
        ];
        for (index, counter) in counters.iter().enumerate() {
            NetworkEndian::write_u64(&mut buffer[8 + index * 8..16 + index * 8], *counter);
        }
        NetworkEndian::write_u32(&mut buffer[104..108], self.duration_sec);
        NetworkEndian::write_u32(&mut buffer[108..112], self.duration_nsec);
        Ok(())
    }
}

/// One entry of a queue stats reply.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct QueueStatsEntry {
    pub port_no: PortNumber,
    pub queue_id: u32,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    pub tx_errors: u64,
    pub duration_sec: u32,
    pub duration_nsec: u32,
}

impl Repr for QueueStatsEntry {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 40 {
            return Err(Error::Truncated);
        }
        Ok(QueueStatsEntry {
            port_no: PortNumber::from(NetworkEndian::read_u32(&buffer[0..4])),
            queue_id: NetworkEndian::read_u32(&buffer[4..8]),
            tx_bytes: NetworkEndian::read_u64(&buffer[8..16]),
            tx_packets: NetworkEndian::read_u64(&buffer[16..24]),
            tx_errors: NetworkEndian::read_u64(&buffer[24..32]),
            duration_sec: NetworkEndian::read_u32(&buffer[32..36]),
            duration_nsec: NetworkEndian::read_u32(&buffer[36..40]),
        })
    }

    fn buffer_len(&self) -> usize {
        40
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[0..4], self.port_no.into());
        NetworkEndian::write_u32(&mut buffer[4..8], self.queue_id);
        NetworkEndian::write_u64(&mut buffer[8..16], self.tx_bytes);
        NetworkEndian::write_u64(&mut buffer[16..24], self.tx_packets);
        NetworkEndian::write_u64(&mut buffer[24..32], self.tx_errors);
        NetworkEndian::write_u32(&mut buffer[32..36], self.duration_sec);
        NetworkEndian::write_u32(&mut buffer[36..40], self.duration_nsec);
        Ok(())
    }
}

/// One entry of a group stats reply.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GroupStatsEntry {
    pub group_id: u32,
    pub ref_count: u32,
    pub packet_count: u64,
    pub byte_count: u64,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub bucket_stats: Vec<BucketCounter>,
}

const GROUP_ENTRY_HEADER_LEN: usize = 40;

impl Repr for GroupStatsEntry {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < GROUP_ENTRY_HEADER_LEN {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[0..2]) as usize;
        if length < GROUP_ENTRY_HEADER_LEN {
            return Err(Error::LengthMismatch);
        }
        if length > buffer.len() {
            return Err(Error::Truncated);
        }
        Ok(GroupStatsEntry {
            group_id: NetworkEndian::read_u32(&buffer[4..8]),
            ref_count: NetworkEndian::read_u32(&buffer[8..12]),
            packet_count: NetworkEndian::read_u64(&buffer[16..24]),
            byte_count: NetworkEndian::read_u64(&buffer[24..32]),
            duration_sec: NetworkEndian::read_u32(&buffer[32..36]),
            duration_nsec: NetworkEndian::read_u32(&buffer[36..40]),
            bucket_stats: parse_list(&buffer[GROUP_ENTRY_HEADER_LEN..length])?,
        })
    }

    fn buffer_len(&self) -> usize {
        GROUP_ENTRY_HEADER_LEN + list_len(&self.bucket_stats)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        let length = self.buffer_len();
        if buffer.len() < length {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u16(&mut buffer[0..2], length as u16);
        for byte in &mut buffer[2..4] {
            *byte = 0;
        }
        NetworkEndian::write_u32(&mut buffer[4..8], self.group_id);
        NetworkEndian::write_u32(&mut buffer[8..12], self.ref_count);
        for byte in &mut buffer[12..16] {
            *byte = 0;
        }
        NetworkEndian::write_u64(&mut buffer[16..24], self.packet_count);
        NetworkEndian::write_u64(&mut buffer[24..32], self.byte_count);
        NetworkEndian::write_u32(&mut buffer[32..36], self.duration_sec);
        NetworkEndian::write_u32(&mut buffer[36..40], self.duration_nsec);
        emit_list(&self.bucket_stats, &mut buffer[GROUP_ENTRY_HEADER_LEN..length])
    }
}

/// The group features reply body. The capability bitmaps are kept raw;
/// they describe group-table capabilities bit-for-bit as the switch
/// reports them.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct GroupFeatures {
    pub types: u32,
    pub capabilities: u32,
    pub max_groups: [u32; 4],
    pub actions: [u32; 4],
}

impl Repr for GroupFeatures {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 40 {
            return Err(Error::Truncated);
        }
        let word = |index: usize| NetworkEndian::read_u32(&buffer[index * 4..]);
        Ok(GroupFeatures {
            types: word(0),
            capabilities: word(1),
            max_groups: [word(2), word(3), word(4), word(5)],
            actions: [word(6), word(7), word(8), word(9)],
        })
    }

    fn buffer_len(&self) -> usize {
        40
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[0..4], self.types);
        NetworkEndian::write_u32(&mut buffer[4..8], self.capabilities);
        for (index, value) in self.max_groups.iter().chain(self.actions.iter()).enumerate() {
            NetworkEndian::write_u32(&mut buffer[8 + index * 4..12 + index * 4], *value);
        }
        Ok(())
    }
}

/// Per-band counters inside a meter stats entry.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BandCounter {
    pub packet_band_count: u64,
    pub byte_band_count: u64,
}

impl Repr for BandCounter {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 16 {
            return Err(Error::Truncated);
        }
        Ok(BandCounter {
            packet_band_count: NetworkEndian::read_u64(&buffer[0..8]),
            byte_band_count: NetworkEndian::read_u64(&buffer[8..16]),
        })
    }

    fn buffer_len(&self) -> usize {
        16
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < 16 {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u64(&mut buffer[0..8], self.packet_band_count);
        NetworkEndian::write_u64(&mut buffer[8..16], self.byte_band_count);
        Ok(())
    }
}

/// One entry of a meter stats reply.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MeterStatsEntry {
    pub meter_id: u32,
    pub flow_count: u32,
    pub packet_in_count: u64,
    pub byte_in_count: u64,
    pub duration_sec: u32,
    pub duration_nsec: u32,
    pub band_stats: Vec<BandCounter>,
}

const METER_ENTRY_HEADER_LEN: usize = 40;

impl Repr for MeterStatsEntry {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < METER_ENTRY_HEADER_LEN {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[4..6]) as usize;
        if length < METER_ENTRY_HEADER_LEN {
            return Err(Error::LengthMismatch);
        }
        if length > buffer.len() {
            return Err(Error::Truncated);
        }
        Ok(MeterStatsEntry {
            meter_id: NetworkEndian::read_u32(&buffer[0..4]),
            flow_count: NetworkEndian::read_u32(&buffer[12..16]),
            packet_in_count: NetworkEndian::read_u64(&buffer[16..24]),
            byte_in_count: NetworkEndian::read_u64(&buffer[24..32]),
            duration_sec: NetworkEndian::read_u32(&buffer[32..36]),
            duration_nsec: NetworkEndian::read_u32(&buffer[36..40]),
            band_stats: parse_list(&buffer[METER_ENTRY_HEADER_LEN..length])?,
        })
    }

    fn buffer_len(&self) -> usize {
        METER_ENTRY_HEADER_LEN + list_len(&self.band_stats)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        let length = self.buffer_len();
        if buffer.len() < length {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[0..4], self.meter_id);
        NetworkEndian::write_u16(&mut buffer[4..6], length as u16);
        for byte in &mut buffer[6..12] {
            *byte = 0;
        }
        NetworkEndian::write_u32(&mut buffer[12..16], self.flow_count);
        NetworkEndian::write_u64(&mut buffer[16..24], self.packet_in_count);
        NetworkEndian::write_u64(&mut buffer[24..32], self.byte_in_count);
        NetworkEndian::write_u32(&mut buffer[32..36], self.duration_sec);
        NetworkEndian::write_u32(&mut buffer[36..40], self.duration_nsec);
        emit_list(&self.band_stats, &mut buffer[METER_ENTRY_HEADER_LEN..length])
    }
}

/// One entry of a meter config reply.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MeterConfigEntry {
    pub flags: Vec<MeterFlags>,
    pub meter_id: u32,
    pub bands: Vec<Band>,
}

const METER_CONFIG_HEADER_LEN: usize = 8;

impl Repr for MeterConfigEntry {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < METER_CONFIG_HEADER_LEN {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[0..2]) as usize;
        if length < METER_CONFIG_HEADER_LEN {
            return Err(Error::LengthMismatch);
        }
        if length > buffer.len() {
            return Err(Error::Truncated);
        }
        Ok(MeterConfigEntry {
            flags: parse_flags(u32::from(NetworkEndian::read_u16(&buffer[2..4])))?,
            meter_id: NetworkEndian::read_u32(&buffer[4..8]),
            bands: parse_list(&buffer[METER_CONFIG_HEADER_LEN..length])?,
        })
    }

    fn buffer_len(&self) -> usize {
        METER_CONFIG_HEADER_LEN + list_len(&self.bands)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        let length = self.buffer_len();
        if buffer.len() < length {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u16(&mut buffer[0..2], length as u16);
        NetworkEndian::write_u16(&mut buffer[2..4], emit_flags(&self.flags) as u16);
        NetworkEndian::write_u32(&mut buffer[4..8], self.meter_id);
        emit_list(&self.bands, &mut buffer[METER_CONFIG_HEADER_LEN..length])
    }
}

/// The meter features reply body. The band type and capability bitmaps
/// are kept raw.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MeterFeaturesRepr {
    pub max_meter: u32,
    pub band_types: u32,
    pub capabilities: u32,
    pub max_bands: u8,
    pub max_color: u8,
}

impl Repr for MeterFeaturesRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 16 {
            return Err(Error::Truncated);
        }
        Ok(MeterFeaturesRepr {
            max_meter: NetworkEndian::read_u32(&buffer[0..4]),
            band_types: NetworkEndian::read_u32(&buffer[4..8]),
            capabilities: NetworkEndian::read_u32(&buffer[8..12]),
            max_bands: buffer[12],
            max_color: buffer[13],
        })
    }

    fn buffer_len(&self) -> usize {
        16
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[0..4], self.max_meter);
        NetworkEndian::write_u32(&mut buffer[4..8], self.band_types);
        NetworkEndian::write_u32(&mut buffer[8..12], self.capabilities);
        buffer[12] = self.max_bands;
        buffer[13] = self.max_color;
        buffer[14] = 0;
        buffer[15] = 0;
        Ok(())
    }
}

/// The body variants of a multipart reply.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ReplyBody {
    Desc(DescStats),
    Flow(Vec<FlowStatsEntry>),
    Aggregate(AggregateStats),
    Table(Vec<TableStatsEntry>),
    Port(Vec<PortStatsEntry>),
    Queue(Vec<QueueStatsEntry>),
    Group(Vec<GroupStatsEntry>),
    GroupDesc(Vec<GroupDescEntry>),
    GroupFeatures(GroupFeatures),
    Meter(Vec<MeterStatsEntry>),
    MeterConfig(Vec<MeterConfigEntry>),
    MeterFeatures(MeterFeaturesRepr),
    PortDesc(Vec<PortRepr>),
    Experimenter {
        experimenter: u32,
        exp_type: u32,
        data: Vec<u8>,
    },
}

/// A high-level representation of a multipart reply body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ReplyRepr {
    /// Raw flags word; bit 0 means more replies follow.
    pub flags: u16,
    pub body: ReplyBody,
}

impl ReplyRepr {
    fn kind(&self) -> Kind {
        match self.body {
            ReplyBody::Desc(_) => Kind::Desc,
            ReplyBody::Flow(_) => Kind::Flow,
            ReplyBody::Aggregate(_) => Kind::Aggregate,
            ReplyBody::Table(_) => Kind::Table,
            ReplyBody::Port(_) => Kind::Port,
            ReplyBody::Queue(_) => Kind::Queue,
            ReplyBody::Group(_) => Kind::Group,
            ReplyBody::GroupDesc(_) => Kind::GroupDesc,
            ReplyBody::GroupFeatures(_) => Kind::GroupFeatures,
            ReplyBody::Meter(_) => Kind::Meter,
            ReplyBody::MeterConfig(_) => Kind::MeterConfig,
            ReplyBody::MeterFeatures(_) => Kind::MeterFeatures,
            ReplyBody::PortDesc(_) => Kind::PortDesc,
            ReplyBody::Experimenter { .. } => Kind::Experimenter,
        }
    }
}

impl Repr for ReplyRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < STATS_HEADER_LEN {
            return Err(Error::Truncated);
        }
        let flags = NetworkEndian::read_u16(&buffer[field::FLAGS]);
        let body = &buffer[field::BODY];
        let body = match Kind::from(NetworkEndian::read_u16(&buffer[field::KIND])) {
            Kind::Desc => ReplyBody::Desc(DescStats::parse(body)?),
            Kind::Flow => ReplyBody::Flow(parse_list(body)?),
            Kind::Aggregate => ReplyBody::Aggregate(AggregateStats::parse(body)?),
            Kind::Table => ReplyBody::Table(parse_list(body)?),
            Kind::Port => ReplyBody::Port(parse_list(body)?),
            Kind::Queue => ReplyBody::Queue(parse_list(body)?),
            Kind::Group => ReplyBody::Group(parse_list(body)?),
            Kind::GroupDesc => ReplyBody::GroupDesc(parse_list(body)?),
            Kind::GroupFeatures => ReplyBody::GroupFeatures(GroupFeatures::parse(body)?),
            Kind::Meter => ReplyBody::Meter(parse_list(body)?),
            Kind::MeterConfig => ReplyBody::MeterConfig(parse_list(body)?),
            Kind::MeterFeatures => ReplyBody::MeterFeatures(MeterFeaturesRepr::parse(body)?),
            Kind::TableFeatures => return Err(Error::BadMessage),
            Kind::PortDesc => ReplyBody::PortDesc(parse_list(body)?),
            Kind::Experimenter => {
                if body.len() < 8 {
                    return Err(Error::Truncated);
                }
                ReplyBody::Experimenter {
                    experimenter: NetworkEndian::read_u32(&body[0..4]),
                    exp_type: NetworkEndian::read_u32(&body[4..8]),
                    data: body[8..].to_vec(),
                }
            }
            Kind::_Unknown(_) => return Err(Error::UnknownTag),
        };
        Ok(ReplyRepr { flags, body })
    }

    fn buffer_len(&self) -> usize {
        STATS_HEADER_LEN
            + match self.body {
                ReplyBody::Desc(ref stats) => stats.buffer_len(),
                ReplyBody::Flow(ref entries) => list_len(entries),
                ReplyBody::Aggregate(ref stats) => stats.buffer_len(),
                ReplyBody::Table(ref entries) => list_len(entries),
                ReplyBody::Port(ref entries) => list_len(entries),
                ReplyBody::Queue(ref entries) => list_len(entries),
                ReplyBody::Group(ref entries) => list_len(entries),
                ReplyBody::GroupDesc(ref entries) => list_len(entries),
                ReplyBody::GroupFeatures(ref features) => features.buffer_len(),
                ReplyBody::Meter(ref entries) => list_len(entries),
                ReplyBody::MeterConfig(ref entries) => list_len(entries),
                ReplyBody::MeterFeatures(ref features) => features.buffer_len(),
                ReplyBody::PortDesc(ref ports) => list_len(ports),
                ReplyBody::Experimenter { ref data, .. } => 8 + data.len(),
            }
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        emit_stats_header(self.kind(), self.flags, buffer);
        let body = &mut buffer[field::BODY];
        match self.body {
            ReplyBody::Desc(ref stats) => stats.emit(body),
            ReplyBody::Flow(ref entries) => emit_list(entries, body),
            ReplyBody::Aggregate(ref stats) => stats.emit(body),
            ReplyBody::Table(ref entries) => emit_list(entries, body),
            ReplyBody::Port(ref entries) => emit_list(entries, body),
            ReplyBody::Queue(ref entries) => emit_list(entries, body),
            ReplyBody::Group(ref entries) => emit_list(entries, body),
            ReplyBody::GroupDesc(ref entries) => emit_list(entries, body),
            ReplyBody::GroupFeatures(ref features) => features.emit(body),
            ReplyBody::Meter(ref entries) => emit_list(entries, body),
            ReplyBody::MeterConfig(ref entries) => emit_list(entries, body),
            ReplyBody::MeterFeatures(ref features) => features.emit(body),
            ReplyBody::PortDesc(ref ports) => emit_list(ports, body),
            ReplyBody::Experimenter {
                experimenter,
                exp_type,
                ref data,
            } => {
                NetworkEndian::write_u32(&mut body[0..4], experimenter);
                NetworkEndian::write_u32(&mut body[4..8], exp_type);
                body[8..8 + data.len()].copy_from_slice(data);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::of13::oxm::{Field, FieldRepr, Oxm};

    #[test]
    fn flow_request_round_trip() {
        let repr = RequestRepr {
            flags: 0,
            body: RequestBody::Flow(FlowStatsRequest {
                table_id: 0xff,
                out_port: PortNumber::Any,
                out_group: 0xffff_ffff,
                cookie: 0,
                cookie_mask: 0,
                flow_match: FlowMatchRepr(vec![Oxm::Basic(FieldRepr {
                    field: Field::EthType,
                    value: vec![0x08, 0x00],
                    mask: None,
                })]),
            }),
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 8 + 32 + 16);
        assert_eq!(RequestRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn meter_reply_round_trip() {
        let repr = ReplyRepr {
            flags: 0,
            body: ReplyBody::Meter(vec![MeterStatsEntry {
                meter_id: 1,
                flow_count: 2,
                packet_in_count: 100,
                byte_in_count: 6400,
                duration_sec: 10,
                duration_nsec: 0,
                band_stats: vec![BandCounter {
                    packet_band_count: 7,
                    byte_band_count: 448,
                }],
            }]),
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(ReplyRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn port_desc_round_trip() {
        use smoltcp::wire::EthernetAddress;

        let repr = ReplyRepr {
            flags: 0,
            body: ReplyBody::PortDesc(vec![PortRepr {
                port_no: PortNumber::Regular(1),
                hw_addr: EthernetAddress([0, 1, 2, 3, 4, 5]),
                name: "eth0".to_string(),
                config: vec![],
                state: vec![],
                curr: vec![],
                advertised: vec![],
                supported: vec![],
                peer: vec![],
                curr_speed: 0,
                max_speed: 0,
            }]),
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 8 + 64);
        assert_eq!(ReplyRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn table_features_is_unsupported() {
        let bytes = [0x00, 0x0c, 0, 0, 0, 0, 0, 0];
        assert_eq!(RequestRepr::parse(&bytes), Err(Error::BadMessage));
        assert_eq!(ReplyRepr::parse(&bytes), Err(Error::BadMessage));
    }
}
