//! OpenFlow 1.1 statistics requests and replies.
//!
//! ```no_rust
//! +--------+--------+--------+--------+
//! |    stats type   |      flags      |
//! +--------+--------+--------+--------+
//! |             (padding)             |
//! +--------+--------+--------+--------+
//! |      type-specific body           |
//! +--------+--------+--------+--------+
//! ```
//!
//! Both directions share the 8-byte stats header; the 16-bit stats type
//! selects the body variant.

use byteorder::{ByteOrder, NetworkEndian};

use crate::bytes::{emit_name, strip_name};
use crate::list::{emit_list, list_len, parse_list};
use crate::of11::flow_match::{FlowMatchRepr, MATCH_LEN};
use crate::of11::instruction::{
    emit_instructions, instructions_len, parse_instructions, InstructionRepr,
};
use crate::port::PortNumber;
use crate::stats::{AggregateStats, BucketCounter, DescStats, GroupDescEntry};
use crate::{Error, Repr, Result};

enum_with_unknown! {
    /// Statistics types.
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
    pub const FLOW_MATCH: Field = 32..120;
}

impl Repr for FlowStatsRequest {
    fn parse(buffer: &[u8]) -> Result<Self> {
        use self::flow_request_field as field;
        if buffer.len() < field::FLOW_MATCH.end {
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
        flow_request_field::FLOW_MATCH.end
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

/// The body variants of a stats request.
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
    Experimenter {
        experimenter: u32,
        data: Vec<u8>,
    },
}

/// A high-level representation of a stats request body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RequestRepr {
    /// Raw flags word; no request flags are defined in v1.1.
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
        let body = match Kind::from(NetworkEndian::read_u16(&buffer[field::KIND])) {
            Kind::Desc => RequestBody::Desc,
            Kind::Flow => RequestBody::Flow(FlowStatsRequest::parse(body)?),
            Kind::Aggregate => RequestBody::Aggregate(FlowStatsRequest::parse(body)?),
            Kind::Table => RequestBody::Table,
            Kind::Port => {
                if body.len() < 8 {
                    return Err(Error::Truncated);
                }
                RequestBody::Port(PortNumber::from(NetworkEndian::read_u32(&body[0..4])))
            }
            Kind::Queue => {
                if body.len() < 8 {
                    return Err(Error::Truncated);
                }
                RequestBody::Queue {
                    port_no: PortNumber::from(NetworkEndian::read_u32(&body[0..4])),
                    queue_id: NetworkEndian::read_u32(&body[4..8]),
                }
            }
            Kind::Group => {
                if body.len() < 8 {
                    return Err(Error::Truncated);
                }
                RequestBody::Group(NetworkEndian::read_u32(&body[0..4]))
            }
            Kind::GroupDesc => RequestBody::GroupDesc,
            Kind::Experimenter => {
                if body.len() < 4 {
                    return Err(Error::Truncated);
                }
                RequestBody::Experimenter {
                    experimenter: NetworkEndian::read_u32(&body[0..4]),
                    data: body[4..].to_vec(),
                }
            }
            Kind::_Unknown(_) => return Err(Error::UnknownTag),
        };
        Ok(RequestRepr { flags, body })
    }

    fn buffer_len(&self) -> usize {
        STATS_HEADER_LEN
            + match self.body {
                RequestBody::Desc | RequestBody::Table | RequestBody::GroupDesc => 0,
                RequestBody::Flow(ref request) | RequestBody::Aggregate(ref request) => {
                    request.buffer_len()
                }
                RequestBody::Port(_) | RequestBody::Queue { .. } | RequestBody::Group(_) => 8,
                RequestBody::Experimenter { ref data, .. } => 4 + data.len(),
            }
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        emit_stats_header(self.kind(), self.flags, buffer);
        let body = &mut buffer[field::BODY];
        match self.body {
            RequestBody::Desc | RequestBody::Table | RequestBody::GroupDesc => {}
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
            RequestBody::Group(group_id) => {
                NetworkEndian::write_u32(&mut body[0..4], group_id);
                for byte in &mut body[4..8] {
                    *byte = 0;
                }
            }
            RequestBody::Experimenter {
                experimenter,
                ref data,
            } => {
                NetworkEndian::write_u32(&mut body[0..4], experimenter);
                body[4..4 + data.len()].copy_from_slice(data);
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
    pub const PAD2: Field = 18..24;
    pub const COOKIE: Field = 24..32;
    pub const PACKET_COUNT: Field = 32..40;
    pub const BYTE_COUNT: Field = 40..48;
    pub const FLOW_MATCH: Field = 48..136;
}

impl Repr for FlowStatsEntry {
    fn parse(buffer: &[u8]) -> Result<Self> {
        use self::flow_entry_field as field;
        if buffer.len() < field::FLOW_MATCH.end {
            return Err(Error::Truncated);
        }
        let length = NetworkEndian::read_u16(&buffer[field::LENGTH]) as usize;
        if length < field::FLOW_MATCH.end {
            return Err(Error::LengthMismatch);
        }
        if length > buffer.len() {
            return Err(Error::Truncated);
        }
        Ok(FlowStatsEntry {
            table_id: buffer[field::TABLE_ID],
            duration_sec: NetworkEndian::read_u32(&buffer[field::DURATION_SEC]),
            duration_nsec: NetworkEndian::read_u32(&buffer[field::DURATION_NSEC]),
            priority: NetworkEndian::read_u16(&buffer[field::PRIORITY]),
            idle_timeout: NetworkEndian::read_u16(&buffer[field::IDLE_TIMEOUT]),
            hard_timeout: NetworkEndian::read_u16(&buffer[field::HARD_TIMEOUT]),
            cookie: NetworkEndian::read_u64(&buffer[field::COOKIE]),
            packet_count: NetworkEndian::read_u64(&buffer[field::PACKET_COUNT]),
            byte_count: NetworkEndian::read_u64(&buffer[field::BYTE_COUNT]),
            flow_match: FlowMatchRepr::parse(&buffer[field::FLOW_MATCH])?,
            instructions: parse_instructions(&buffer[field::FLOW_MATCH.end..length])?,
        })
    }

    fn buffer_len(&self) -> usize {
        flow_entry_field::FLOW_MATCH.start + MATCH_LEN + instructions_len(&self.instructions)
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
        for byte in &mut buffer[field::PAD2] {
            *byte = 0;
        }
        NetworkEndian::write_u64(&mut buffer[field::COOKIE], self.cookie);
        NetworkEndian::write_u64(&mut buffer[field::PACKET_COUNT], self.packet_count);
        NetworkEndian::write_u64(&mut buffer[field::BYTE_COUNT], self.byte_count);
        self.flow_match.emit(&mut buffer[field::FLOW_MATCH])?;
        emit_instructions(&self.instructions, &mut buffer[field::FLOW_MATCH.end..length])
    }
}

/// One entry of a table stats reply. The wildcard, match and instruction
/// support bitmaps are kept raw; they describe table capabilities, not
/// message contents.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TableStatsEntry {
    pub table_id: u8,
    pub name: String,
    pub wildcards: u32,
    pub match_fields: u32,
    pub instructions: u32,
    pub write_actions: u32,
    pub apply_actions: u32,
    pub config: u32,
    pub max_entries: u32,
    pub active_count: u32,
    pub lookup_count: u64,
    pub matched_count: u64,
}

mod table_entry_field {
    use crate::field::*;

    pub const TABLE_ID: usize = 0;
    pub const PAD: Field = 1..8;
    pub const NAME: Field = 8..40;
    pub const WILDCARDS: Field = 40..44;
    pub const MATCH: Field = 44..48;
    pub const INSTRUCTIONS: Field = 48..52;
    pub const WRITE_ACTIONS: Field = 52..56;
    pub const APPLY_ACTIONS: Field = 56..60;
    pub const CONFIG: Field = 60..64;
    pub const MAX_ENTRIES: Field = 64..68;
    pub const ACTIVE_COUNT: Field = 68..72;
    pub const LOOKUP_COUNT: Field = 72..80;
    pub const MATCHED_COUNT: Field = 80..88;
}

impl Repr for TableStatsEntry {
    fn parse(buffer: &[u8]) -> Result<Self> {
        use self::table_entry_field as field;
        if buffer.len() < field::MATCHED_COUNT.end {
            return Err(Error::Truncated);
        }
        Ok(TableStatsEntry {
            table_id: buffer[field::TABLE_ID],
            name: strip_name(&buffer[field::NAME]),
            wildcards: NetworkEndian::read_u32(&buffer[field::WILDCARDS]),
            match_fields: NetworkEndian::read_u32(&buffer[field::MATCH]),
            instructions: NetworkEndian::read_u32(&buffer[field::INSTRUCTIONS]),
            write_actions: NetworkEndian::read_u32(&buffer[field::WRITE_ACTIONS]),
            apply_actions: NetworkEndian::read_u32(&buffer[field::APPLY_ACTIONS]),
            config: NetworkEndian::read_u32(&buffer[field::CONFIG]),
            max_entries: NetworkEndian::read_u32(&buffer[field::MAX_ENTRIES]),
            active_count: NetworkEndian::read_u32(&buffer[field::ACTIVE_COUNT]),
            lookup_count: NetworkEndian::read_u64(&buffer[field::LOOKUP_COUNT]),
            matched_count: NetworkEndian::read_u64(&buffer[field::MATCHED_COUNT]),
        })
    }

    fn buffer_len(&self) -> usize {
        table_entry_field::MATCHED_COUNT.end
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        use self::table_entry_field as field;
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        buffer[field::TABLE_ID] = self.table_id;
        for byte in &mut buffer[field::PAD] {
            *byte = 0;
        }
        emit_name(&self.name, &mut buffer[field::NAME]);
        NetworkEndian::write_u32(&mut buffer[field::WILDCARDS], self.wildcards);
        NetworkEndian::write_u32(&mut buffer[field::MATCH], self.match_fields);
        NetworkEndian::write_u32(&mut buffer[field::INSTRUCTIONS], self.instructions);
        NetworkEndian::write_u32(&mut buffer[field::WRITE_ACTIONS], self.write_actions);
        NetworkEndian::write_u32(&mut buffer[field::APPLY_ACTIONS], self.apply_actions);
        NetworkEndian::write_u32(&mut buffer[field::CONFIG], self.config);
        NetworkEndian::write_u32(&mut buffer[field::MAX_ENTRIES], self.max_entries);
        NetworkEndian::write_u32(&mut buffer[field::ACTIVE_COUNT], self.active_count);
        NetworkEndian::write_u64(&mut buffer[field::LOOKUP_COUNT], self.lookup_count);
        NetworkEndian::write_u64(&mut buffer[field::MATCHED_COUNT], self.matched_count);
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
}

const PORT_ENTRY_LEN: usize = 104;

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
}

impl Repr for QueueStatsEntry {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 32 {
            return Err(Error::Truncated);
        }
        Ok(QueueStatsEntry {
            port_no: PortNumber::from(NetworkEndian::read_u32(&buffer[0..4])),
            queue_id: NetworkEndian::read_u32(&buffer[4..8]),
            tx_bytes: NetworkEndian::read_u64(&buffer[8..16]),
            tx_packets: NetworkEndian::read_u64(&buffer[16..24]),
            tx_errors: NetworkEndian::read_u64(&buffer[24..32]),
        })
    }

    fn buffer_len(&self) -> usize {
        32
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
    pub bucket_stats: Vec<BucketCounter>,
}

const GROUP_ENTRY_HEADER_LEN: usize = 32;

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
        emit_list(&self.bucket_stats, &mut buffer[GROUP_ENTRY_HEADER_LEN..length])
    }
}

/// The body variants of a stats reply.
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
    Experimenter { experimenter: u32, data: Vec<u8> },
}

/// A high-level representation of a stats reply body.
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
            Kind::Experimenter => {
                if body.len() < 4 {
                    return Err(Error::Truncated);
                }
                ReplyBody::Experimenter {
                    experimenter: NetworkEndian::read_u32(&body[0..4]),
                    data: body[4..].to_vec(),
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
                ReplyBody::Experimenter { ref data, .. } => 4 + data.len(),
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
            ReplyBody::Experimenter {
                experimenter,
                ref data,
            } => {
                NetworkEndian::write_u32(&mut body[0..4], experimenter);
                body[4..4 + data.len()].copy_from_slice(data);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn desc_request_round_trip() {
        let repr = RequestRepr {
            flags: 0,
            body: RequestBody::Desc,
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[..], &[0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(RequestRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn desc_reply_round_trip() {
        let repr = ReplyRepr {
            flags: 0,
            body: ReplyBody::Desc(DescStats {
                mfr_desc: "an open source switch".to_string(),
                hw_desc: "none".to_string(),
                sw_desc: "0.1".to_string(),
                serial_num: "42".to_string(),
                dp_desc: "test datapath".to_string(),
            }),
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 8 + 1056);
        assert_eq!(ReplyRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn flow_reply_round_trip() {
        use crate::of11::flow_match::MatchField;
        use smoltcp::wire::{EthernetAddress, Ipv4Address};

        // the match is in the decoder's canonical shape: the four
        // mask-carrying slots present, wildcarded with all-ones masks.
        let repr = ReplyRepr {
            flags: 0,
            body: ReplyBody::Flow(vec![FlowStatsEntry {
                table_id: 0,
                duration_sec: 10,
                duration_nsec: 500,
                priority: 0x8000,
                idle_timeout: 0,
                hard_timeout: 0,
                cookie: 0x1234,
                packet_count: 9,
                byte_count: 900,
                flow_match: FlowMatchRepr(vec![
                    MatchField::InPort(1),
                    MatchField::EthSrc {
                        addr: EthernetAddress([0; 6]),
                        mask: EthernetAddress([0xff; 6]),
                    },
                    MatchField::EthDst {
                        addr: EthernetAddress([0; 6]),
                        mask: EthernetAddress([0xff; 6]),
                    },
                    MatchField::Ipv4Src {
                        addr: Ipv4Address([0; 4]),
                        mask: Ipv4Address([0xff; 4]),
                    },
                    MatchField::Ipv4Dst {
                        addr: Ipv4Address([0; 4]),
                        mask: Ipv4Address([0xff; 4]),
                    },
                ]),
                instructions: vec![InstructionRepr::GotoTable(1)],
            }]),
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        // entry length field covers the fixed prefix, match and instructions.
        assert_eq!(&bytes[8..10], &[0x00, 0x90]);
        assert_eq!(ReplyRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn group_reply_round_trip() {
        let repr = ReplyRepr {
            flags: 0,
            body: ReplyBody::Group(vec![GroupStatsEntry {
                group_id: 1,
                ref_count: 2,
                packet_count: 3,
                byte_count: 4,
                bucket_stats: vec![BucketCounter {
                    packet_count: 1,
                    byte_count: 64,
                }],
            }]),
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(ReplyRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn unknown_stats_kind() {
        let bytes = [0x00, 0x0c, 0, 0, 0, 0, 0, 0];
        assert_eq!(RequestRepr::parse(&bytes), Err(Error::UnknownTag));
    }
}
