//! The port description structure and its enumerations, shared verbatim by
//! OpenFlow 1.1 and 1.3.
//!
//! ```no_rust
//!  0      7        15       23       31
//! +--------+--------+--------+--------+
//! |             port no               |
//! +--------+--------+--------+--------+
//! |             (padding)             |
//! +--------+--------+--------+--------+
//! |              hw addr              |
//! +--------+--------+--------+--------+
//! | hw addr (cont.) |    (padding)    |
//! +--------+--------+--------+--------+
//! |          name (16 bytes)          |
//! +--------+--------+--------+--------+
//! |   config, state, curr, advert.,   |
//! |   supported, peer (6 x 32 bits)   |
//! +--------+--------+--------+--------+
//! |    curr speed   |    max speed    |
//! +--------+--------+--------+--------+
//! ```

use byteorder::{ByteOrder, NetworkEndian};
use smoltcp::wire::EthernetAddress;

use crate::bitmap::{emit_flags, parse_flags};
use crate::bytes::{emit_name, strip_name};
use crate::{Error, Repr, Result};

/// OpenFlow port numbers: either a regular 32-bit number or one of the
/// reserved names.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PortNumber {
    /// Maximum number of physical and logical switch ports.
    Max,
    /// Send the packet out the input port.
    InPort,
    /// Submit the packet to the first flow table.
    Table,
    /// Forward using the non-OpenFlow pipeline.
    Normal,
    /// Flood using the non-OpenFlow pipeline.
    Flood,
    /// Flood through all standard ports except the input port.
    All,
    /// Send to controller.
    Controller,
    /// Local OpenFlow "port".
    Local,
    /// Wildcard used in some requests when no port is specified.
    Any,
    /// A regular port number.
    Regular(u32),
}

impl ::core::convert::From<u32> for PortNumber {
    fn from(value: u32) -> Self {
        match value {
            0xffff_ff00 => PortNumber::Max,
            0xffff_fff8 => PortNumber::InPort,
            0xffff_fff9 => PortNumber::Table,
            0xffff_fffa => PortNumber::Normal,
            0xffff_fffb => PortNumber::Flood,
            0xffff_fffc => PortNumber::All,
            0xffff_fffd => PortNumber::Controller,
            0xffff_fffe => PortNumber::Local,
            0xffff_ffff => PortNumber::Any,
            other => PortNumber::Regular(other),
        }
    }
}

impl ::core::convert::From<PortNumber> for u32 {
    fn from(value: PortNumber) -> Self {
        match value {
            PortNumber::Max => 0xffff_ff00,
            PortNumber::InPort => 0xffff_fff8,
            PortNumber::Table => 0xffff_fff9,
            PortNumber::Normal => 0xffff_fffa,
            PortNumber::Flood => 0xffff_fffb,
            PortNumber::All => 0xffff_fffc,
            PortNumber::Controller => 0xffff_fffd,
            PortNumber::Local => 0xffff_fffe,
            PortNumber::Any => 0xffff_ffff,
            PortNumber::Regular(other) => other,
        }
    }
}

flag_set! {
    /// Flags to describe the administrative configuration of a port.
    pub enum PortConfig {
        /// Port is administratively down.
        PortDown = 0,
        /// Drop all packets received by the port.
        NoRecv = 2,
        /// Drop packets forwarded to the port.
        NoFwd = 5,
        /// Do not send packet-in messages for the port.
        NoPacketIn = 6
    }
}

flag_set! {
    /// Flags to describe the current state of a port.
    pub enum PortState {
        /// No physical link present.
        LinkDown = 0,
        /// Port is blocked by spanning tree or similar.
        Blocked = 1,
        /// Live for fast failover groups.
        Live = 2
    }
}

flag_set! {
    /// Flags to describe the rate and medium features of a port.
    pub enum PortFeature {
        /// 10 Mb half-duplex rate support.
        Rate10MbHd = 0,
        /// 10 Mb full-duplex rate support.
        Rate10MbFd = 1,
        /// 100 Mb half-duplex rate support.
        Rate100MbHd = 2,
        /// 100 Mb full-duplex rate support.
        Rate100MbFd = 3,
        /// 1 Gb half-duplex rate support.
        Rate1GbHd = 4,
        /// 1 Gb full-duplex rate support.
        Rate1GbFd = 5,
        /// 10 Gb full-duplex rate support.
        Rate10GbFd = 6,
        /// 40 Gb full-duplex rate support.
        Rate40GbFd = 7,
        /// 100 Gb full-duplex rate support.
        Rate100GbFd = 8,
        /// 1 Tb full-duplex rate support.
        Rate1TbFd = 9,
        /// Another rate, not in the list.
        Other = 10,
        /// Copper medium.
        Copper = 11,
        /// Fiber medium.
        Fiber = 12,
        /// Auto-negotiation.
        Autoneg = 13,
        /// Pause.
        Pause = 14,
        /// Asymmetric pause.
        PauseAsym = 15
    }
}

mod field {
    use crate::field::*;

    pub const PORT_NO: Field = 0..4;
    pub const PAD1: Field = 4..8;
    pub const HW_ADDR: Field = 8..14;
    pub const PAD2: Field = 14..16;
    pub const NAME: Field = 16..32;
    pub const CONFIG: Field = 32..36;
    pub const STATE: Field = 36..40;
    pub const CURR: Field = 40..44;
    pub const ADVERTISED: Field = 44..48;
    pub const SUPPORTED: Field = 48..52;
    pub const PEER: Field = 52..56;
    pub const CURR_SPEED: Field = 56..60;
    pub const MAX_SPEED: Field = 60..64;
}

/// Length of the port structure on the wire.
pub const PORT_LEN: usize = 64;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> Packet<T> {
    pub fn new(buffer: T) -> Packet<T> {
        Packet { buffer }
    }

    pub fn new_checked(buffer: T) -> Result<Packet<T>> {
        let packet = Self::new(buffer);
        packet.check_len()?;
        Ok(packet)
    }

    pub fn check_len(&self) -> Result<()> {
        if self.buffer.as_ref().len() < PORT_LEN {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    /// Consume the packet, returning the underlying buffer.
    pub fn into_inner(self) -> T {
        self.buffer
    }

    /// Return the `port_no` field.
    pub fn port_no(&self) -> PortNumber {
        let data = self.buffer.as_ref();
        PortNumber::from(NetworkEndian::read_u32(&data[field::PORT_NO]))
    }

    /// Return the `hw_addr` field.
    pub fn hw_addr(&self) -> EthernetAddress {
        let data = self.buffer.as_ref();
        EthernetAddress::from_bytes(&data[field::HW_ADDR])
    }

    /// Return the `name` field, stripped at the first NUL byte.
    pub fn name(&self) -> String {
        strip_name(&self.buffer.as_ref()[field::NAME])
    }

    /// Return the `config` bitmap.
    pub fn config(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::CONFIG])
    }

    /// Return the `state` bitmap.
    pub fn state(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::STATE])
    }

    /// Return the `curr` features bitmap.
    pub fn curr(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::CURR])
    }

    /// Return the `advertised` features bitmap.
    pub fn advertised(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::ADVERTISED])
    }

    /// Return the `supported` features bitmap.
    pub fn supported(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::SUPPORTED])
    }

    /// Return the `peer` features bitmap.
    pub fn peer(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::PEER])
    }

    /// Return the `curr_speed` field, in kbps.
    pub fn curr_speed(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::CURR_SPEED])
    }

    /// Return the `max_speed` field, in kbps.
    pub fn max_speed(&self) -> u32 {
        NetworkEndian::read_u32(&self.buffer.as_ref()[field::MAX_SPEED])
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    pub fn set_port_no(&mut self, value: PortNumber) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u32(&mut data[field::PORT_NO], value.into())
    }

    pub fn set_hw_addr(&mut self, value: EthernetAddress) {
        self.buffer.as_mut()[field::HW_ADDR].copy_from_slice(value.as_bytes())
    }

    pub fn set_name(&mut self, value: &str) {
        emit_name(value, &mut self.buffer.as_mut()[field::NAME])
    }

    pub fn set_config(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::CONFIG], value)
    }

    pub fn set_state(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::STATE], value)
    }

    pub fn set_curr(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::CURR], value)
    }

    pub fn set_advertised(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::ADVERTISED], value)
    }

    pub fn set_supported(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::SUPPORTED], value)
    }

    pub fn set_peer(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::PEER], value)
    }

    pub fn set_curr_speed(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::CURR_SPEED], value)
    }

    pub fn set_max_speed(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buffer.as_mut()[field::MAX_SPEED], value)
    }

    fn clear_padding(&mut self) {
        let data = self.buffer.as_mut();
        for byte in &mut data[field::PAD1] {
            *byte = 0;
        }
        for byte in &mut data[field::PAD2] {
            *byte = 0;
        }
    }
}

/// A high-level representation of a port description.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PortRepr {
    pub port_no: PortNumber,
    pub hw_addr: EthernetAddress,
    pub name: String,
    pub config: Vec<PortConfig>,
    pub state: Vec<PortState>,
    pub curr: Vec<PortFeature>,
    pub advertised: Vec<PortFeature>,
    pub supported: Vec<PortFeature>,
    pub peer: Vec<PortFeature>,
    pub curr_speed: u32,
    pub max_speed: u32,
}

impl Repr for PortRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = Packet::new_checked(buffer)?;
        Ok(PortRepr {
            port_no: packet.port_no(),
            hw_addr: packet.hw_addr(),
            name: packet.name(),
            config: parse_flags(packet.config())?,
            state: parse_flags(packet.state())?,
            curr: parse_flags(packet.curr())?,
            advertised: parse_flags(packet.advertised())?,
            supported: parse_flags(packet.supported())?,
            peer: parse_flags(packet.peer())?,
            curr_speed: packet.curr_speed(),
            max_speed: packet.max_speed(),
        })
    }

    fn buffer_len(&self) -> usize {
        PORT_LEN
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        let mut packet = Packet::new_checked(buffer)?;
        packet.clear_padding();
        packet.set_port_no(self.port_no);
        packet.set_hw_addr(self.hw_addr);
        packet.set_name(&self.name);
        packet.set_config(emit_flags(&self.config));
        packet.set_state(emit_flags(&self.state));
        packet.set_curr(emit_flags(&self.curr));
        packet.set_advertised(emit_flags(&self.advertised));
        packet.set_supported(emit_flags(&self.supported));
        packet.set_peer(emit_flags(&self.peer));
        packet.set_curr_speed(self.curr_speed);
        packet.set_max_speed(self.max_speed);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> PortRepr {
        PortRepr {
            port_no: PortNumber::Regular(1),
            hw_addr: EthernetAddress([0x00, 0x01, 0x02, 0x03, 0x04, 0x05]),
            name: "eth0".to_string(),
            config: vec![],
            state: vec![PortState::Live],
            curr: vec![PortFeature::Rate1GbFd, PortFeature::Copper],
            advertised: vec![],
            supported: vec![],
            peer: vec![],
            curr_speed: 1_000_000,
            max_speed: 1_000_000,
        }
    }

    #[test]
    fn emit_layout() {
        let repr = sample();
        let mut bytes = [0xff; PORT_LEN];
        repr.emit(&mut bytes).unwrap();

        assert_eq!(&bytes[0..4], &[0, 0, 0, 1]);
        assert_eq!(&bytes[4..8], &[0; 4]);
        assert_eq!(&bytes[8..14], &[0x00, 0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(&bytes[16..21], b"eth0\0");
        // state bitmap: exactly the live bit.
        assert_eq!(&bytes[36..40], &[0, 0, 0, 1 << 2]);
        // curr bitmap: 1gb_fd | copper.
        assert_eq!(&bytes[40..44], &[0, 0, 0x08, 0x20]);
    }

    #[test]
    fn round_trip() {
        let repr = sample();
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(PortRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn undefined_state_bit() {
        let repr = sample();
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        bytes[36] = 0x80;
        assert_eq!(PortRepr::parse(&bytes), Err(Error::UnknownTag));
    }

    #[test]
    fn long_name_is_truncated() {
        let mut repr = sample();
        repr.name = "a-port-name-that-exceeds-sixteen-bytes".to_string();
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        let parsed = PortRepr::parse(&bytes).unwrap();
        assert_eq!(parsed.name, "a-port-name-that");
    }
}
