//! The OpenFlow 1.1 standard match: a fixed 88-byte structure with named
//! slots and a wildcards bitmap.
//!
//! ```no_rust
//! +---------------+---------------+
//! |   match type  |     length    |
//! +---------------+---------------+
//! |    in port    |   wildcards   |
//! +---------------+---------------+
//! |  eth src + mask, eth dst+mask |
//! +---------------+---------------+
//! | vlan vid, pcp, eth type, tos, |
//! | proto, ipv4 src/dst + masks,  |
//! | tp src/dst, mpls label/tc     |
//! +---------------+---------------+
//! |     metadata + mask           |
//! +---------------+---------------+
//! ```
//!
//! A slot is either constrained by a field or wildcarded. Slots without a
//! mask of their own are wildcarded through a bit in the wildcards bitmap;
//! the ethernet and IPv4 address slots are wildcarded by an all-ones mask
//! instead (a set mask bit means "ignore this bit"). The two transport
//! port slots are demultiplexed by the `ip_proto` slot: 6 means TCP, 17
//! means UDP, anything else leaves them uninterpreted.

use byteorder::{ByteOrder, NetworkEndian};
use smoltcp::wire::{EthernetAddress, Ipv4Address};

use crate::bitmap::{emit_flags, parse_flags};
use crate::{Error, Repr, Result};

/// Match type of the fixed v1.1 layout.
const MATCH_TYPE_STANDARD: u16 = 0;

/// Length of the standard match on the wire.
pub const MATCH_LEN: usize = 88;

const IP_PROTO_TCP: u8 = 6;
const IP_PROTO_UDP: u8 = 17;

flag_set! {
    /// Wildcard bits of the v1.1 match. A set bit means the slot is not
    /// constrained.
    pub enum Wildcard {
        /// Switch input port.
        InPort = 0,
        /// VLAN id.
        VlanVid = 1,
        /// VLAN priority.
        VlanPcp = 2,
        /// Ethernet frame type.
        EthType = 3,
        /// IP DSCP (ToS).
        IpDscp = 4,
        /// IP protocol.
        IpProto = 5,
        /// TCP/UDP source port.
        TpSrc = 6,
        /// TCP/UDP destination port.
        TpDst = 7,
        /// MPLS label.
        MplsLabel = 8,
        /// MPLS traffic class.
        MplsTc = 9
    }
}

mod field {
    use crate::field::*;

    pub const MATCH_TYPE: Field = 0..2;
    pub const LENGTH: Field = 2..4;
    pub const IN_PORT: Field = 4..8;
    pub const WILDCARDS: Field = 8..12;
    pub const ETH_SRC: Field = 12..18;
    pub const ETH_SRC_MASK: Field = 18..24;
    pub const ETH_DST: Field = 24..30;
    pub const ETH_DST_MASK: Field = 30..36;
    pub const VLAN_VID: Field = 36..38;
    pub const VLAN_PCP: usize = 38;
    pub const PAD1: usize = 39;
    pub const ETH_TYPE: Field = 40..42;
    pub const IP_DSCP: usize = 42;
    pub const IP_PROTO: usize = 43;
    pub const IPV4_SRC: Field = 44..48;
    pub const IPV4_SRC_MASK: Field = 48..52;
    pub const IPV4_DST: Field = 52..56;
    pub const IPV4_DST_MASK: Field = 56..60;
    pub const TP_SRC: Field = 60..62;
    pub const TP_DST: Field = 62..64;
    pub const MPLS_LABEL: Field = 64..68;
    pub const MPLS_TC: usize = 68;
    pub const PAD2: Field = 69..72;
    pub const METADATA: Field = 72..80;
    pub const METADATA_MASK: Field = 80..88;
}

/// One constrained slot of a v1.1 match.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum MatchField {
    /// Switch input port.
    InPort(u32),
    /// Ethernet source address; set mask bits are ignored when matching.
    EthSrc {
        addr: EthernetAddress,
        mask: EthernetAddress,
    },
    /// Ethernet destination address; set mask bits are ignored when
    /// matching.
    EthDst {
        addr: EthernetAddress,
        mask: EthernetAddress,
    },
    /// VLAN id.
    VlanVid(u16),
    /// VLAN priority.
    VlanPcp(u8),
    /// Ethernet frame type.
    EthType(u16),
    /// IP DSCP, lower 6 bits meaningful.
    IpDscp(u8),
    /// IP protocol.
    IpProto(u8),
    /// IPv4 source address; set mask bits are ignored when matching.
    Ipv4Src { addr: Ipv4Address, mask: Ipv4Address },
    /// IPv4 destination address; set mask bits are ignored when matching.
    Ipv4Dst { addr: Ipv4Address, mask: Ipv4Address },
    /// TCP source port, meaningful when `ip_proto` is 6.
    TcpSrc(u16),
    /// TCP destination port, meaningful when `ip_proto` is 6.
    TcpDst(u16),
    /// UDP source port, meaningful when `ip_proto` is 17.
    UdpSrc(u16),
    /// UDP destination port, meaningful when `ip_proto` is 17.
    UdpDst(u16),
    /// MPLS label, lower 20 bits meaningful.
    MplsLabel(u32),
    /// MPLS traffic class, lower 3 bits meaningful.
    MplsTc(u8),
}

/// A high-level representation of a v1.1 match: the ordered list of
/// constrained slots.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct FlowMatchRepr(pub Vec<MatchField>);

impl Repr for FlowMatchRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < MATCH_LEN {
            return Err(Error::Truncated);
        }
        if NetworkEndian::read_u16(&buffer[field::MATCH_TYPE]) != MATCH_TYPE_STANDARD {
            return Err(Error::UnknownTag);
        }
        if NetworkEndian::read_u16(&buffer[field::LENGTH]) as usize != MATCH_LEN {
            return Err(Error::LengthMismatch);
        }

        let wildcards: Vec<Wildcard> =
            parse_flags(NetworkEndian::read_u32(&buffer[field::WILDCARDS]))?;
        let wild = |slot: Wildcard| wildcards.contains(&slot);

        let mut fields = Vec::new();
        if !wild(Wildcard::InPort) {
            fields.push(MatchField::InPort(NetworkEndian::read_u32(
                &buffer[field::IN_PORT],
            )));
        }
        fields.push(MatchField::EthSrc {
            addr: EthernetAddress::from_bytes(&buffer[field::ETH_SRC]),
            mask: EthernetAddress::from_bytes(&buffer[field::ETH_SRC_MASK]),
        });
        fields.push(MatchField::EthDst {
            addr: EthernetAddress::from_bytes(&buffer[field::ETH_DST]),
            mask: EthernetAddress::from_bytes(&buffer[field::ETH_DST_MASK]),
        });
        if !wild(Wildcard::VlanVid) {
            fields.push(MatchField::VlanVid(NetworkEndian::read_u16(
                &buffer[field::VLAN_VID],
            )));
        }
        if !wild(Wildcard::VlanPcp) {
            fields.push(MatchField::VlanPcp(buffer[field::VLAN_PCP]));
        }
        if !wild(Wildcard::EthType) {
            fields.push(MatchField::EthType(NetworkEndian::read_u16(
                &buffer[field::ETH_TYPE],
            )));
        }
        if !wild(Wildcard::IpDscp) {
            fields.push(MatchField::IpDscp(buffer[field::IP_DSCP]));
        }
        let ip_proto = buffer[field::IP_PROTO];
        if !wild(Wildcard::IpProto) {
            fields.push(MatchField::IpProto(ip_proto));
        }
        fields.push(MatchField::Ipv4Src {
            addr: Ipv4Address::from_bytes(&buffer[field::IPV4_SRC]),
            mask: Ipv4Address::from_bytes(&buffer[field::IPV4_SRC_MASK]),
        });
        fields.push(MatchField::Ipv4Dst {
            addr: Ipv4Address::from_bytes(&buffer[field::IPV4_DST]),
            mask: Ipv4Address::from_bytes(&buffer[field::IPV4_DST_MASK]),
        });
        // The transport slots are only meaningful when ip_proto selects a
        // protocol that has ports.
        if !wild(Wildcard::TpSrc) {
            let value = NetworkEndian::read_u16(&buffer[field::TP_SRC]);
            match ip_proto {
                IP_PROTO_TCP => fields.push(MatchField::TcpSrc(value)),
                IP_PROTO_UDP => fields.push(MatchField::UdpSrc(value)),
                _ => {}
            }
        }
        if !wild(Wildcard::TpDst) {
            let value = NetworkEndian::read_u16(&buffer[field::TP_DST]);
            match ip_proto {
                IP_PROTO_TCP => fields.push(MatchField::TcpDst(value)),
                IP_PROTO_UDP => fields.push(MatchField::UdpDst(value)),
                _ => {}
            }
        }
        if !wild(Wildcard::MplsLabel) {
            fields.push(MatchField::MplsLabel(NetworkEndian::read_u32(
                &buffer[field::MPLS_LABEL],
            )));
        }
        if !wild(Wildcard::MplsTc) {
            fields.push(MatchField::MplsTc(buffer[field::MPLS_TC]));
        }

        Ok(FlowMatchRepr(fields))
    }

    fn buffer_len(&self) -> usize {
        MATCH_LEN
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < MATCH_LEN {
            return Err(Error::Exhausted);
        }
        let buffer = &mut buffer[..MATCH_LEN];

        // All slots default to zero; the address masks default to all-ones
        // (fully wildcarded) and are overwritten when a field constrains
        // them.
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
        for range in &[
            field::ETH_SRC_MASK,
            field::ETH_DST_MASK,
            field::IPV4_SRC_MASK,
            field::IPV4_DST_MASK,
            field::METADATA_MASK,
        ] {
            for byte in &mut buffer[range.start..range.end] {
                *byte = 0xff;
            }
        }

        NetworkEndian::write_u16(&mut buffer[field::MATCH_TYPE], MATCH_TYPE_STANDARD);
        NetworkEndian::write_u16(&mut buffer[field::LENGTH], MATCH_LEN as u16);

        // First pass: the ip_proto slot decides how the transport port
        // fields map onto their slots.
        let mut ip_proto = 0;
        for match_field in &self.0 {
            if let MatchField::IpProto(value) = *match_field {
                ip_proto = value;
            }
        }

        let mut present = Vec::new();
        for match_field in &self.0 {
            match *match_field {
                MatchField::InPort(value) => {
                    NetworkEndian::write_u32(&mut buffer[field::IN_PORT], value);
                    present.push(Wildcard::InPort);
                }
                MatchField::EthSrc { addr, mask } => {
                    buffer[field::ETH_SRC].copy_from_slice(addr.as_bytes());
                    buffer[field::ETH_SRC_MASK].copy_from_slice(mask.as_bytes());
                }
                MatchField::EthDst { addr, mask } => {
                    buffer[field::ETH_DST].copy_from_slice(addr.as_bytes());
                    buffer[field::ETH_DST_MASK].copy_from_slice(mask.as_bytes());
                }
                MatchField::VlanVid(value) => {
                    NetworkEndian::write_u16(&mut buffer[field::VLAN_VID], value);
                    present.push(Wildcard::VlanVid);
                }
                MatchField::VlanPcp(value) => {
                    buffer[field::VLAN_PCP] = value;
                    present.push(Wildcard::VlanPcp);
                }
                MatchField::EthType(value) => {
                    NetworkEndian::write_u16(&mut buffer[field::ETH_TYPE], value);
                    present.push(Wildcard::EthType);
                }
                MatchField::IpDscp(value) => {
                    buffer[field::IP_DSCP] = value;
                    present.push(Wildcard::IpDscp);
                }
                MatchField::IpProto(value) => {
                    buffer[field::IP_PROTO] = value;
                    present.push(Wildcard::IpProto);
                }
                MatchField::Ipv4Src { addr, mask } => {
                    buffer[field::IPV4_SRC].copy_from_slice(addr.as_bytes());
                    buffer[field::IPV4_SRC_MASK].copy_from_slice(mask.as_bytes());
                }
                MatchField::Ipv4Dst { addr, mask } => {
                    buffer[field::IPV4_DST].copy_from_slice(addr.as_bytes());
                    buffer[field::IPV4_DST_MASK].copy_from_slice(mask.as_bytes());
                }
                MatchField::TcpSrc(value) if ip_proto == IP_PROTO_TCP => {
                    NetworkEndian::write_u16(&mut buffer[field::TP_SRC], value);
                    present.push(Wildcard::TpSrc);
                }
                MatchField::TcpDst(value) if ip_proto == IP_PROTO_TCP => {
                    NetworkEndian::write_u16(&mut buffer[field::TP_DST], value);
                    present.push(Wildcard::TpDst);
                }
                MatchField::UdpSrc(value) if ip_proto == IP_PROTO_UDP => {
                    NetworkEndian::write_u16(&mut buffer[field::TP_SRC], value);
                    present.push(Wildcard::TpSrc);
                }
                MatchField::UdpDst(value) if ip_proto == IP_PROTO_UDP => {
                    NetworkEndian::write_u16(&mut buffer[field::TP_DST], value);
                    present.push(Wildcard::TpDst);
                }
                // Transport fields that the ip_proto slot does not select
                // leave their slot zero and wildcarded.
                MatchField::TcpSrc(_)
                | MatchField::TcpDst(_)
                | MatchField::UdpSrc(_)
                | MatchField::UdpDst(_) => {}
                MatchField::MplsLabel(value) => {
                    NetworkEndian::write_u32(&mut buffer[field::MPLS_LABEL], value);
                    present.push(Wildcard::MplsLabel);
                }
                MatchField::MplsTc(value) => {
                    buffer[field::MPLS_TC] = value;
                    present.push(Wildcard::MplsTc);
                }
            }
        }

        let absent: Vec<Wildcard> = [
            Wildcard::InPort,
            Wildcard::VlanVid,
            Wildcard::VlanPcp,
            Wildcard::EthType,
            Wildcard::IpDscp,
            Wildcard::IpProto,
            Wildcard::TpSrc,
            Wildcard::TpDst,
            Wildcard::MplsLabel,
            Wildcard::MplsTc,
        ]
        .iter()
        .cloned()
        .filter(|slot| !present.contains(slot))
        .collect();
        NetworkEndian::write_u32(&mut buffer[field::WILDCARDS], emit_flags(&absent));
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ONES_MAC: EthernetAddress = EthernetAddress([0xff; 6]);
    const ONES_IP: Ipv4Address = Ipv4Address([0xff; 4]);

    #[test]
    fn in_port_only() {
        let repr = FlowMatchRepr(vec![MatchField::InPort(3)]);
        let mut bytes = vec![0xaa; MATCH_LEN];
        repr.emit(&mut bytes).unwrap();

        assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x00, 0x58]);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 3]);
        // every wildcard bit set except in_port.
        assert_eq!(NetworkEndian::read_u32(&bytes[8..12]), 0x3fe);
        // address slots wildcarded through all-ones masks.
        assert_eq!(&bytes[18..24], &[0xff; 6]);
        assert_eq!(&bytes[48..52], &[0xff; 4]);
        // metadata zero with all-ones mask.
        assert_eq!(&bytes[72..80], &[0; 8]);
        assert_eq!(&bytes[80..88], &[0xff; 8]);

        let parsed = FlowMatchRepr::parse(&bytes).unwrap();
        assert_eq!(
            parsed,
            FlowMatchRepr(vec![
                MatchField::InPort(3),
                MatchField::EthSrc {
                    addr: EthernetAddress([0; 6]),
                    mask: ONES_MAC,
                },
                MatchField::EthDst {
                    addr: EthernetAddress([0; 6]),
                    mask: ONES_MAC,
                },
                MatchField::Ipv4Src {
                    addr: Ipv4Address([0; 4]),
                    mask: ONES_IP,
                },
                MatchField::Ipv4Dst {
                    addr: Ipv4Address([0; 4]),
                    mask: ONES_IP,
                },
            ])
        );
    }

    fn tp_round_trip(fields: Vec<MatchField>) -> Vec<MatchField> {
        let repr = FlowMatchRepr(fields);
        let mut bytes = vec![0; MATCH_LEN];
        repr.emit(&mut bytes).unwrap();
        FlowMatchRepr::parse(&bytes).unwrap().0
    }

    #[test]
    fn tcp_ports_with_matching_proto() {
        let fields = tp_round_trip(vec![
            MatchField::IpProto(6),
            MatchField::TcpSrc(80),
            MatchField::TcpDst(8080),
        ]);
        assert!(fields.contains(&MatchField::TcpSrc(80)));
        assert!(fields.contains(&MatchField::TcpDst(8080)));
    }

    #[test]
    fn udp_ports_with_matching_proto() {
        let fields = tp_round_trip(vec![MatchField::IpProto(17), MatchField::UdpSrc(53)]);
        assert!(fields.contains(&MatchField::UdpSrc(53)));
        assert!(!fields.iter().any(|f| matches!(f, MatchField::TcpSrc(_))));
    }

    #[test]
    fn transport_ports_dropped_without_proto() {
        let fields = tp_round_trip(vec![MatchField::TcpSrc(80)]);
        assert!(!fields.iter().any(|f| matches!(f, MatchField::TcpSrc(_))));
    }

    #[test]
    fn bad_match_type() {
        let mut bytes = vec![0; MATCH_LEN];
        bytes[1] = 9;
        NetworkEndian::write_u16(&mut bytes[2..4], MATCH_LEN as u16);
        assert_eq!(FlowMatchRepr::parse(&bytes), Err(Error::UnknownTag));
    }

    #[test]
    fn bad_length_field() {
        let repr = FlowMatchRepr(vec![]);
        let mut bytes = vec![0; MATCH_LEN];
        repr.emit(&mut bytes).unwrap();
        NetworkEndian::write_u16(&mut bytes[2..4], 90);
        assert_eq!(FlowMatchRepr::parse(&bytes), Err(Error::LengthMismatch));
    }
}
