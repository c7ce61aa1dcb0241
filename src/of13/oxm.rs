//! The OXM (OpenFlow eXtensible Match) TLV codec used by OpenFlow 1.3.
//!
//! ```no_rust
//! 0                       16             23  24             32
//! +------------------------+-------------+----+-------------+
//! |       oxm_class        |  oxm_field  | HM |  oxm_length |
//! +------------------------+-------------+----+-------------+
//! |                     value and/or mask                   |
//! |                      (variable size)                    |
//! +---------------------------------------------------------+
//! ```
//!
//! - `oxm_class` selects the field namespace; only the openflow-basic and
//!   experimenter classes are carried, the legacy NXM classes are not.
//! - `oxm_field` is a 7-bit class-specific field id; the trailing `HM` bit
//!   says whether half of the payload is a mask.
//! - `oxm_length` is the payload length in bytes.
//!
//! Values and masks of the openflow-basic class are canonicalized to the
//! field's defined bit width: the stored byte string is right-truncated to
//! `ceil(bits / 8)` bytes with the excess top bits masked off.

use byteorder::{ByteOrder, NetworkEndian};

use crate::bytes::cut_bits;
use crate::{Error, Repr, Result};

enum_with_unknown! {
    /// OXM classes.
    pub doc enum Class(u16) {
        /// Backward compatibility with NXM.
        Nxm0 = 0x0000,
        /// Backward compatibility with NXM.
        Nxm1 = 0x0001,
        /// Basic class for OpenFlow.
        OpenFlowBasic = 0x8000,
        /// Experimenter class.
        Experimenter = 0xffff
    }
}

enum_with_unknown! {
    /// Match fields of the openflow-basic class.
    pub doc enum Field(u8) {
        /// Switch input port.
        InPort = 0,
        /// Switch physical input port.
        InPhyPort = 1,
        /// Metadata passed between tables.
        Metadata = 2,
        /// Ethernet destination address.
        EthDst = 3,
        /// Ethernet source address.
        EthSrc = 4,
        /// Ethernet frame type.
        EthType = 5,
        /// VLAN id.
        VlanVid = 6,
        /// VLAN priority.
        VlanPcp = 7,
        /// IP DSCP (6 bits in ToS field).
        IpDscp = 8,
        /// IP ECN (2 bits in ToS field).
        IpEcn = 9,
        /// IP protocol.
        IpProto = 10,
        /// IPv4 source address.
        Ipv4Src = 11,
        /// IPv4 destination address.
        Ipv4Dst = 12,
        /// TCP source port.
        TcpSrc = 13,
        /// TCP destination port.
        TcpDst = 14,
        /// UDP source port.
        UdpSrc = 15,
        /// UDP destination port.
        UdpDst = 16,
        /// SCTP source port.
        SctpSrc = 17,
        /// SCTP destination port.
        SctpDst = 18,
        /// ICMP type.
        Icmpv4Type = 19,
        /// ICMP code.
        Icmpv4Code = 20,
        /// ARP opcode.
        ArpOp = 21,
        /// ARP source IPv4 address.
        ArpSpa = 22,
        /// ARP target IPv4 address.
        ArpTpa = 23,
        /// ARP source hardware address.
        ArpSha = 24,
        /// ARP target hardware address.
        ArpTha = 25,
        /// IPv6 source address.
        Ipv6Src = 26,
        /// IPv6 destination address.
        Ipv6Dst = 27,
        /// IPv6 flow label.
        Ipv6Flabel = 28,
        /// ICMPv6 type.
        Icmpv6Type = 29,
        /// ICMPv6 code.
        Icmpv6Code = 30,
        /// Target address for IPv6 neighbor discovery.
        Ipv6NdTarget = 31,
        /// Source link-layer for IPv6 neighbor discovery.
        Ipv6NdSll = 32,
        /// Target link-layer for IPv6 neighbor discovery.
        Ipv6NdTll = 33,
        /// MPLS label.
        MplsLabel = 34,
        /// MPLS traffic class.
        MplsTc = 35,
        /// MPLS bottom-of-stack bit.
        MplsBos = 36,
        /// PBB I-SID.
        PbbIsid = 37,
        /// Logical port metadata.
        TunnelId = 38,
        /// IPv6 extension header pseudo-field.
        Ipv6ExtHdr = 39
    }
}

/// Return the canonical bit width of an openflow-basic match field.
#[cfg_attr(rustfmt, rustfmt_skip)]
pub fn bit_length(field: Field) -> Result<usize> {
    Ok(match field {
        Field::InPort       => 32,
        Field::InPhyPort    => 32,
        Field::Metadata     => 64,
        Field::EthDst       => 48,
        Field::EthSrc       => 48,
        Field::EthType      => 16,
        Field::VlanVid      => 13,
        Field::VlanPcp      => 3,
        Field::IpDscp       => 6,
        Field::IpEcn        => 2,
        Field::IpProto      => 8,
        Field::Ipv4Src      => 32,
        Field::Ipv4Dst      => 32,
        Field::TcpSrc       => 16,
        Field::TcpDst       => 16,
        Field::UdpSrc       => 16,
        Field::UdpDst       => 16,
        Field::SctpSrc      => 16,
        Field::SctpDst      => 16,
        Field::Icmpv4Type   => 8,
        Field::Icmpv4Code   => 8,
        Field::ArpOp        => 16,
        Field::ArpSpa       => 32,
        Field::ArpTpa       => 32,
        Field::ArpSha       => 48,
        Field::ArpTha       => 48,
        Field::Ipv6Src      => 128,
        Field::Ipv6Dst      => 128,
        Field::Ipv6Flabel   => 20,
        Field::Icmpv6Type   => 8,
        Field::Icmpv6Code   => 8,
        Field::Ipv6NdTarget => 128,
        Field::Ipv6NdSll    => 48,
        Field::Ipv6NdTll    => 48,
        Field::MplsLabel    => 20,
        Field::MplsTc       => 3,
        Field::MplsBos      => 1,
        Field::PbbIsid      => 24,
        Field::TunnelId     => 64,
        Field::Ipv6ExtHdr   => 9,
        Field::_Unknown(_)  => return Err(Error::UnknownTag),
    })
}

/// Length of the TLV header.
pub const OXM_HEADER_LEN: usize = 4;

mod field {
    use crate::field::*;

    pub const CLASS: Field = 0..2;
    pub const FIELD: usize = 2;
    pub const MASK: usize = 2;
    pub const LENGTH: usize = 3;
    pub const VALUE: Rest = 4..;
}

/// A wrapper to read and write a buffer representing one OXM TLV.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Packet<T> {
    inner: T,
}

impl<T: AsRef<[u8]>> Packet<T> {
    /// Return a new TLV parser/encoder for the given buffer.
    pub fn new(buffer: T) -> Self {
        Packet { inner: buffer }
    }

    /// Return the inner buffer.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Return a new TLV parser/encoder for the given buffer, and make sure
    /// no getter or setter will panic.
    pub fn new_checked(buffer: T) -> Result<Self> {
        let packet = Packet { inner: buffer };
        packet.check_len()?;
        Ok(packet)
    }

    /// Return the `oxm_class` field.
    pub fn class(&self) -> Class {
        Class::from(NetworkEndian::read_u16(&self.inner.as_ref()[field::CLASS]))
    }

    /// Return the `oxm_field` field.
    pub fn field(&self) -> u8 {
        self.inner.as_ref()[field::FIELD] >> 1
    }

    /// Return `true` if the payload carries a mask.
    pub fn has_mask(&self) -> bool {
        self.inner.as_ref()[field::MASK] & 0x01 == 1
    }

    /// Return the `oxm_length` field.
    pub fn length(&self) -> u8 {
        self.inner.as_ref()[field::LENGTH]
    }

    /// Check whether any getter may panic because the buffer is too small.
    pub fn check_len(&self) -> Result<()> {
        let len = self.inner.as_ref().len();
        if len < OXM_HEADER_LEN || len < OXM_HEADER_LEN + self.length() as usize {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Packet<&'a T> {
    /// Return the TLV payload, sliced by the length field.
    pub fn value(&self) -> &'a [u8] {
        let length = self.length() as usize;
        &self.inner.as_ref()[field::VALUE.start..field::VALUE.start + length]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    /// Set the `oxm_class` field.
    pub fn set_class(&mut self, value: Class) {
        NetworkEndian::write_u16(&mut self.inner.as_mut()[field::CLASS], value.into());
    }

    /// Set the `oxm_field` field; the least significant bit of `value` is
    /// ignored since the field is 7 bits wide.
    pub fn set_field(&mut self, value: u8) {
        let current = self.inner.as_ref()[field::FIELD];
        self.inner.as_mut()[field::FIELD] = value << 1 | (current & 1);
    }

    /// Set the `HM` bit.
    pub fn set_mask(&mut self) {
        self.inner.as_mut()[field::MASK] |= 1;
    }

    /// Unset the `HM` bit.
    pub fn unset_mask(&mut self) {
        self.inner.as_mut()[field::MASK] &= 0xfe;
    }

    /// Set the `oxm_length` field.
    pub fn set_length(&mut self, value: u8) {
        self.inner.as_mut()[field::LENGTH] = value;
    }

    /// Get a mutable pointer to the TLV payload.
    pub fn value_mut(&mut self) -> &mut [u8] {
        &mut self.inner.as_mut()[field::VALUE]
    }
}

/// An openflow-basic match field in canonical byte form.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FieldRepr {
    pub field: Field,
    /// Big-endian value bytes, `ceil(bit_length / 8)` of them.
    pub value: Vec<u8>,
    /// Optional mask of the same width as the value.
    pub mask: Option<Vec<u8>>,
}

impl FieldRepr {
    fn parse_tlv<'a, T: AsRef<[u8]> + ?Sized>(packet: &Packet<&'a T>) -> Result<Self> {
        let match_field = match Field::from(packet.field()) {
            Field::_Unknown(_) => return Err(Error::UnknownTag),
            match_field => match_field,
        };
        let width = (bit_length(match_field)? + 7) / 8;
        let expected = if packet.has_mask() { 2 * width } else { width };
        if packet.length() as usize != expected {
            return Err(Error::LengthMismatch);
        }
        let payload = packet.value();
        Ok(FieldRepr {
            field: match_field,
            value: payload[..width].to_vec(),
            mask: if packet.has_mask() {
                Some(payload[width..].to_vec())
            } else {
                None
            },
        })
    }
}

impl Repr for FieldRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = Packet::new_checked(buffer)?;
        FieldRepr::parse_tlv(&packet)
    }

    fn buffer_len(&self) -> usize {
        let width = (bit_length(self.field).unwrap_or(0) + 7) / 8;
        OXM_HEADER_LEN + if self.mask.is_some() { 2 * width } else { width }
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        let bits = bit_length(self.field)?;
        let width = (bits + 7) / 8;
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        let mut packet = Packet::new(&mut buffer[..]);
        packet.set_class(Class::OpenFlowBasic);
        packet.set_field(self.field.into());
        let length = if self.mask.is_some() { 2 * width } else { width };
        packet.set_length(length as u8);
        if self.mask.is_some() {
            packet.set_mask();
        } else {
            packet.unset_mask();
        }
        let payload = packet.value_mut();
        payload[..width].copy_from_slice(&cut_bits(&self.value, bits)?);
        if let Some(ref mask) = self.mask {
            payload[width..2 * width].copy_from_slice(&cut_bits(mask, bits)?);
        }
        Ok(())
    }
}

/// An experimenter OXM TLV: the experimenter id leads the payload, the
/// rest is opaque.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExperimenterRepr {
    /// The 7-bit experimenter-specific field id.
    pub field: u8,
    pub experimenter: u32,
    pub data: Vec<u8>,
}

impl Repr for ExperimenterRepr {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = Packet::new_checked(buffer)?;
        let payload = packet.value();
        if payload.len() < 4 {
            return Err(Error::Truncated);
        }
        Ok(ExperimenterRepr {
            field: packet.field(),
            experimenter: NetworkEndian::read_u32(&payload[0..4]),
            data: payload[4..].to_vec(),
        })
    }

    fn buffer_len(&self) -> usize {
        OXM_HEADER_LEN + 4 + self.data.len()
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }
        let mut packet = Packet::new(&mut buffer[..]);
        packet.set_class(Class::Experimenter);
        packet.set_field(self.field);
        packet.unset_mask();
        packet.set_length((4 + self.data.len()) as u8);
        let payload = packet.value_mut();
        NetworkEndian::write_u32(&mut payload[0..4], self.experimenter);
        payload[4..4 + self.data.len()].copy_from_slice(&self.data);
        Ok(())
    }
}

/// One OXM TLV.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Oxm {
    /// A field of the openflow-basic class.
    Basic(FieldRepr),
    /// A field of the experimenter class.
    Experimenter(ExperimenterRepr),
}

impl Repr for Oxm {
    fn parse(buffer: &[u8]) -> Result<Self> {
        let packet = Packet::new_checked(buffer)?;
        match packet.class() {
            Class::OpenFlowBasic => Ok(Oxm::Basic(FieldRepr::parse_tlv(&packet)?)),
            Class::Experimenter => Ok(Oxm::Experimenter(ExperimenterRepr::parse(
                packet.into_inner(),
            )?)),
            // This codec does not speak the legacy NXM dialect.
            Class::Nxm0 | Class::Nxm1 => Err(Error::BadMessage),
            Class::_Unknown(_) => Err(Error::UnknownTag),
        }
    }

    fn buffer_len(&self) -> usize {
        match *self {
            Oxm::Basic(ref repr) => repr.buffer_len(),
            Oxm::Experimenter(ref repr) => repr.buffer_len(),
        }
    }

    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        match *self {
            Oxm::Basic(ref repr) => repr.emit(buffer),
            Oxm::Experimenter(ref repr) => repr.emit(buffer),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn eth_type_tlv() {
        let repr = FieldRepr {
            field: Field::EthType,
            value: vec![0x08, 0x00],
            mask: None,
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[..], &[0x80, 0x00, 0x0a, 0x02, 0x08, 0x00]);
        assert_eq!(FieldRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn masked_vlan_vid_is_canonicalized() {
        let repr = FieldRepr {
            field: Field::VlanVid,
            value: vec![0xff, 0xff],
            mask: Some(vec![0xff, 0xff]),
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        // field byte carries the HM bit, the 13-bit value is truncated.
        assert_eq!(&bytes[..], &[0x80, 0x00, 0x0d, 0x04, 0x1f, 0xff, 0x1f, 0xff]);
        let parsed = FieldRepr::parse(&bytes).unwrap();
        assert_eq!(parsed.value, vec![0x1f, 0xff]);
        assert_eq!(parsed.mask, Some(vec![0x1f, 0xff]));
    }

    #[test]
    fn undersized_value_is_rejected() {
        let repr = FieldRepr {
            field: Field::InPort,
            value: vec![0x01],
            mask: None,
        };
        let mut bytes = vec![0; repr.buffer_len()];
        assert_eq!(repr.emit(&mut bytes), Err(Error::InvariantViolation));
    }

    #[test]
    fn wire_length_must_match_width() {
        // in_port declared with a 3-byte payload.
        let bytes = [0x80, 0x00, 0x00, 0x03, 0x00, 0x00, 0x01];
        assert_eq!(Oxm::parse(&bytes), Err(Error::LengthMismatch));
    }

    #[test]
    fn unknown_field() {
        let bytes = [0x80, 0x00, 40 << 1, 0x02, 0x00, 0x00];
        assert_eq!(Oxm::parse(&bytes), Err(Error::UnknownTag));
    }

    #[test]
    fn nxm_class_is_unsupported() {
        let bytes = [0x00, 0x00, 0x00, 0x02, 0x00, 0x00];
        assert_eq!(Oxm::parse(&bytes), Err(Error::BadMessage));
    }

    #[test]
    fn experimenter_round_trip() {
        let repr = ExperimenterRepr {
            field: 11,
            experimenter: 0x0000_4f4e,
            data: vec![0x01, 0x02, 0x03, 0x04],
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(Oxm::parse(&bytes).unwrap(), Oxm::Experimenter(repr));
    }
}
