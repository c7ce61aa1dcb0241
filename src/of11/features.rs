//! The OpenFlow 1.1 features-reply (switch features) body. Unlike v1.3,
//! the v1.1 body carries the port descriptions inline after the fixed
//! 24-byte prefix.

use byteorder::{ByteOrder, NetworkEndian};
use smoltcp::wire::EthernetAddress;

use crate::bitmap::{emit_flags, parse_flags};
use crate::list::{emit_list, list_len, parse_list};
use crate::port::PortRepr;
use crate::{Error, Repr, Result};

flag_set! {
    /// Capabilities supported by a v1.1 datapath.
    pub enum Capability {
        /// Flow statistics.
        FlowStats = 0,
        /// Table statistics.
        TableStats = 1,
        /// Port statistics.
        PortStats = 2,
        /// Group statistics.
        GroupStats = 3,
        /// Can reassemble IP fragments.
        IpReasm = 5,
        /// Queue statistics.
        QueueStats = 6,
        /// Match IP addresses in ARP packets.
        ArpMatchIp = 7
    }
}

mod field {
    use crate::field::*;

    pub const DATAPATH_ID: Field = 0..2;
    pub const DATAPATH_MAC: Field = 2..8;
    pub const N_BUFFERS: Field = 8..12;
    pub const N_TABLES: usize = 12;
    pub const PAD: Field = 13..16;
    pub const CAPABILITIES: Field = 16..20;
    pub const RESERVED: Field = 20..24;
    pub const PORTS: Rest = 24..;
}

/// A high-level representation of a v1.1 features-reply body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FeaturesReplyRepr {
    /// Implementer-defined top 16 bits of the datapath identifier.
    pub datapath_id: u16,
    /// MAC address part of the datapath identifier.
    pub datapath_mac: EthernetAddress,
    /// Max packets buffered at once.
    pub n_buffers: u32,
    /// Number of tables supported by the datapath.
    pub n_tables: u8,
    pub capabilities: Vec<Capability>,
    /// Reserved word, kept as-is.
    pub reserved: u32,
    pub ports: Vec<PortRepr>,
}

impl Repr for FeaturesReplyRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < field::PORTS.start {
            return Err(Error::Truncated);
        }
        Ok(FeaturesReplyRepr {
            datapath_id: NetworkEndian::read_u16(&buffer[field::DATAPATH_ID]),
            datapath_mac: EthernetAddress::from_bytes(&buffer[field::DATAPATH_MAC]),
            n_buffers: NetworkEndian::read_u32(&buffer[field::N_BUFFERS]),
            n_tables: buffer[field::N_TABLES],
            capabilities: parse_flags(NetworkEndian::read_u32(&buffer[field::CAPABILITIES]))?,
            reserved: NetworkEndian::read_u32(&buffer[field::RESERVED]),
            ports: parse_list(&buffer[field::PORTS])?,
        })
    }

    fn buffer_len(&self) -> usize {
        field::PORTS.start + list_len(&self.ports)
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        NetworkEndian::write_u16(&mut buffer[field::DATAPATH_ID], self.datapath_id);
        buffer[field::DATAPATH_MAC].copy_from_slice(self.datapath_mac.as_bytes());
        NetworkEndian::write_u32(&mut buffer[field::N_BUFFERS], self.n_buffers);
        buffer[field::N_TABLES] = self.n_tables;
        for byte in &mut buffer[field::PAD] {
            *byte = 0;
        }
        NetworkEndian::write_u32(&mut buffer[field::CAPABILITIES], emit_flags(&self.capabilities));
        NetworkEndian::write_u32(&mut buffer[field::RESERVED], self.reserved);
        emit_list(&self.ports, &mut buffer[field::PORTS])
    }
}
