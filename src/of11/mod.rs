//! The OpenFlow 1.1 message codec.
//!
//! The first header byte of a v1.1 frame packs an experimental flag into
//! the top bit and the wire version (2) into the low 7 bits.

pub mod features;
pub mod flow_match;
pub mod flow_mod;
pub mod flow_removed;
pub mod instruction;
pub mod packet_in;
pub mod queue;
pub mod stats;

use byteorder::{ByteOrder, NetworkEndian};

use crate::error_msg::ErrorMsgRepr;
use crate::group_mod::GroupModRepr;
use crate::message::{self, HEADER_LEN, VERSION_OF11};
use crate::packet_out::PacketOutRepr;
use crate::port_mod::PortModRepr;
use crate::port_status::PortStatusRepr;
use crate::switch_config::SwitchConfigRepr;
use crate::table_mod::TableModRepr;
use crate::{Error, Repr, Result};

enum_with_unknown! {
    /// v1.1 message types.
    pub doc enum Kind(u8) {
        ///
        Hello = 0,
        ///
        Error = 1,
        ///
        EchoRequest = 2,
        ///
        EchoReply = 3,
        ///
        Experimenter = 4,
        ///
        FeaturesRequest = 5,
        ///
        FeaturesReply = 6,
        ///
        GetConfigRequest = 7,
        ///
        GetConfigReply = 8,
        ///
        SetConfig = 9,
        ///
        PacketIn = 10,
        ///
        FlowRemoved = 11,
        ///
        PortStatus = 12,
        ///
        PacketOut = 13,
        ///
        FlowMod = 14,
        ///
        GroupMod = 15,
        ///
        PortMod = 16,
        ///
        TableMod = 17,
        ///
        StatsRequest = 18,
        ///
        StatsReply = 19,
        ///
        BarrierRequest = 20,
        ///
        BarrierReply = 21,
        ///
        QueueGetConfigRequest = 22,
        ///
        QueueGetConfigReply = 23
    }
}

/// The v1.1 experimenter body: an experimenter id followed by opaque data.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExperimenterRepr {
    pub experimenter: u32,
    pub data: Vec<u8>,
}

impl Repr for ExperimenterRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < 8 {
            return Err(Error::Truncated);
        }
        Ok(ExperimenterRepr {
            experimenter: NetworkEndian::read_u32(&buffer[0..4]),
            data: buffer[8..].to_vec(),
        })
    }

    fn buffer_len(&self) -> usize {
        8 + self.data.len()
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u32(&mut buffer[0..4], self.experimenter);
        for byte in &mut buffer[4..8] {
            *byte = 0;
        }
        buffer[8..8 + self.data.len()].copy_from_slice(&self.data);
        Ok(())
    }
}

/// The body of a v1.1 message.
#[derive(Debug, PartialEq, Clone)]
pub enum Payload {
    Hello,
    Error(ErrorMsgRepr),
    EchoRequest(Vec<u8>),
    EchoReply(Vec<u8>),
    Experimenter(ExperimenterRepr),
    FeaturesRequest,
    FeaturesReply(features::FeaturesReplyRepr),
    GetConfigRequest,
    GetConfigReply(SwitchConfigRepr),
    SetConfig(SwitchConfigRepr),
    PacketIn(packet_in::PacketInRepr),
    FlowRemoved(flow_removed::FlowRemovedRepr),
    PortStatus(PortStatusRepr),
    PacketOut(PacketOutRepr),
    FlowMod(flow_mod::FlowModRepr),
    GroupMod(GroupModRepr),
    PortMod(PortModRepr),
    TableMod(TableModRepr),
    StatsRequest(stats::RequestRepr),
    StatsReply(stats::ReplyRepr),
    BarrierRequest,
    BarrierReply,
    QueueGetConfigRequest(queue::GetConfigRequestRepr),
    QueueGetConfigReply(queue::GetConfigReplyRepr),
}

impl Payload {
    fn parse(kind: Kind, buffer: &[u8]) -> Result<Self> {
        use self::Payload::*;
        Ok(match kind {
            Kind::Hello => Hello,
            Kind::Error => {
                let repr = ErrorMsgRepr::parse(buffer)?;
                if repr.header.min_version() > VERSION_OF11 {
                    return Err(self::Error::BadMessage);
                }
                Error(repr)
            }
            Kind::EchoRequest => EchoRequest(buffer.to_vec()),
            Kind::EchoReply => EchoReply(buffer.to_vec()),
            Kind::Experimenter => Experimenter(ExperimenterRepr::parse(buffer)?),
            Kind::FeaturesRequest => FeaturesRequest,
            Kind::FeaturesReply => FeaturesReply(features::FeaturesReplyRepr::parse(buffer)?),
            Kind::GetConfigRequest => GetConfigRequest,
            Kind::GetConfigReply => GetConfigReply(SwitchConfigRepr::parse(buffer)?),
            Kind::SetConfig => SetConfig(SwitchConfigRepr::parse(buffer)?),
            Kind::PacketIn => PacketIn(packet_in::PacketInRepr::parse(buffer)?),
            Kind::FlowRemoved => FlowRemoved(flow_removed::FlowRemovedRepr::parse(buffer)?),
            Kind::PortStatus => PortStatus(PortStatusRepr::parse(buffer)?),
            Kind::PacketOut => PacketOut(PacketOutRepr::parse(buffer)?),
            Kind::FlowMod => FlowMod(flow_mod::FlowModRepr::parse(buffer)?),
            Kind::GroupMod => GroupMod(GroupModRepr::parse(buffer)?),
            Kind::PortMod => PortMod(PortModRepr::parse(buffer)?),
            Kind::TableMod => TableMod(TableModRepr::parse(buffer)?),
            Kind::StatsRequest => StatsRequest(stats::RequestRepr::parse(buffer)?),
            Kind::StatsReply => StatsReply(stats::ReplyRepr::parse(buffer)?),
            Kind::BarrierRequest => BarrierRequest,
            Kind::BarrierReply => BarrierReply,
            Kind::QueueGetConfigRequest => {
                QueueGetConfigRequest(queue::GetConfigRequestRepr::parse(buffer)?)
            }
            Kind::QueueGetConfigReply => {
                QueueGetConfigReply(queue::GetConfigReplyRepr::parse(buffer)?)
            }
            Kind::_Unknown(_) => return Err(self::Error::UnknownTag),
        })
    }

    fn kind(&self) -> Kind {
        use self::Payload::*;
        match *self {
            Hello => Kind::Hello,
            Error(_) => Kind::Error,
            EchoRequest(_) => Kind::EchoRequest,
            EchoReply(_) => Kind::EchoReply,
            Experimenter(_) => Kind::Experimenter,
            FeaturesRequest => Kind::FeaturesRequest,
            FeaturesReply(_) => Kind::FeaturesReply,
            GetConfigRequest => Kind::GetConfigRequest,
            GetConfigReply(_) => Kind::GetConfigReply,
            SetConfig(_) => Kind::SetConfig,
            PacketIn(_) => Kind::PacketIn,
            FlowRemoved(_) => Kind::FlowRemoved,
            PortStatus(_) => Kind::PortStatus,
            PacketOut(_) => Kind::PacketOut,
            FlowMod(_) => Kind::FlowMod,
            GroupMod(_) => Kind::GroupMod,
            PortMod(_) => Kind::PortMod,
            TableMod(_) => Kind::TableMod,
            StatsRequest(_) => Kind::StatsRequest,
            StatsReply(_) => Kind::StatsReply,
            BarrierRequest => Kind::BarrierRequest,
            BarrierReply => Kind::BarrierReply,
            QueueGetConfigRequest(_) => Kind::QueueGetConfigRequest,
            QueueGetConfigReply(_) => Kind::QueueGetConfigReply,
        }
    }

    fn buffer_len(&self) -> usize {
        use self::Payload::*;
        match *self {
            Hello | FeaturesRequest | GetConfigRequest | BarrierRequest | BarrierReply => 0,
            Error(ref repr) => repr.buffer_len(),
            EchoRequest(ref data) | EchoReply(ref data) => data.len(),
            Experimenter(ref repr) => repr.buffer_len(),
            FeaturesReply(ref repr) => repr.buffer_len(),
            GetConfigReply(ref repr) | SetConfig(ref repr) => repr.buffer_len(),
            PacketIn(ref repr) => repr.buffer_len(),
            FlowRemoved(ref repr) => repr.buffer_len(),
            PortStatus(ref repr) => repr.buffer_len(),
            PacketOut(ref repr) => repr.buffer_len(),
            FlowMod(ref repr) => repr.buffer_len(),
            GroupMod(ref repr) => repr.buffer_len(),
            PortMod(ref repr) => repr.buffer_len(),
            TableMod(ref repr) => repr.buffer_len(),
            StatsRequest(ref repr) => repr.buffer_len(),
            StatsReply(ref repr) => repr.buffer_len(),
            QueueGetConfigRequest(ref repr) => repr.buffer_len(),
            QueueGetConfigReply(ref repr) => repr.buffer_len(),
        }
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        use self::Payload::*;
        match *self {
            Hello | FeaturesRequest | GetConfigRequest | BarrierRequest | BarrierReply => Ok(()),
            Error(ref repr) => {
                if repr.header.min_version() > VERSION_OF11 {
                    return Err(self::Error::BadMessage);
                }
                repr.emit(buffer)
            }
            EchoRequest(ref data) | EchoReply(ref data) => {
                if buffer.len() < data.len() {
                    Err(self::Error::Exhausted)
                } else {
                    buffer[..data.len()].copy_from_slice(data);
                    Ok(())
                }
            }
            Experimenter(ref repr) => repr.emit(buffer),
            FeaturesReply(ref repr) => repr.emit(buffer),
            GetConfigReply(ref repr) | SetConfig(ref repr) => repr.emit(buffer),
            PacketIn(ref repr) => repr.emit(buffer),
            FlowRemoved(ref repr) => repr.emit(buffer),
            PortStatus(ref repr) => repr.emit(buffer),
            PacketOut(ref repr) => repr.emit(buffer),
            FlowMod(ref repr) => repr.emit(buffer),
            GroupMod(ref repr) => repr.emit(buffer),
            PortMod(ref repr) => repr.emit(buffer),
            TableMod(ref repr) => repr.emit(buffer),
            StatsRequest(ref repr) => repr.emit(buffer),
            StatsReply(ref repr) => repr.emit(buffer),
            QueueGetConfigRequest(ref repr) => repr.emit(buffer),
            QueueGetConfigReply(ref repr) => repr.emit(buffer),
        }
    }
}

/// A complete OpenFlow 1.1 message.
#[derive(Debug, PartialEq, Clone)]
pub struct Message {
    /// The experimental bit carried in the top bit of the version byte.
    pub experimental: bool,
    pub xid: u32,
    pub payload: Payload,
}

impl Repr for Message {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = message::Packet::new_checked(buffer)?;
        let kind = Kind::from(packet.kind());
        Ok(Message {
            experimental: packet.version_byte() & 0x80 != 0,
            xid: packet.xid(),
            payload: Payload::parse(kind, packet.body()?)?,
        })
    }

    fn buffer_len(&self) -> usize {
        HEADER_LEN + self.payload.buffer_len()
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        let mut packet = message::Packet::new(&mut buffer[..]);
        let version_byte = VERSION_OF11 | if self.experimental { 0x80 } else { 0 };
        packet.set_version_byte(version_byte);
        packet.set_kind(self.payload.kind().into());
        packet.set_length(self.buffer_len() as u16);
        packet.set_xid(self.xid);
        self.payload.emit(packet.body_mut())
    }
}
