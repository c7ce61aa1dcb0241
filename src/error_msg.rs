//! Types representing OpenFlow error messages.
//!
//! The error body is shared by both supported versions; the v1.2+ error
//! types (role, meter, table-features, experimenter) are rejected when the
//! carrying frame is v1.1.

use byteorder::{ByteOrder, NetworkEndian};

use crate::message::{VERSION_OF11, VERSION_OF13};
use crate::{Error, Repr, Result};

enum_with_unknown! {
    /// Represent the type of the error.
    pub doc enum Kind(u16) {
        /// Hello protocol failed.
        HelloFailed = 0,
        /// Request was not understood.
        BadRequest = 1,
        /// Error in action description.
        BadAction = 2,
        /// Error in instruction list.
        BadInstruction = 3,
        /// Error in match.
        BadMatch = 4,
        /// Problem modifying flow entry.
        FlowModFailed = 5,
        /// Problem modifying group entry.
        GroupModFailed = 6,
        /// Port mod request failed.
        PortModFailed = 7,
        /// Table mod request failed.
        TableModFailed = 8,
        /// Queue operation failed.
        QueueOpFailed = 9,
        /// Switch config request failed.
        SwitchConfigFailed = 10,
        /// Controller role request failed.
        RoleRequestFailed = 11,
        /// Error in meter.
        MeterModFailed = 12,
        /// Setting table features failed.
        TableFeaturesFailed = 13,
        /// Experimenter error message.
        Experimenter = 0xffff
    }
}

enum_with_unknown! {
    /// The code associated to a `HelloFailed` error.
    pub doc enum HelloFailedCode(u16) {
        /// No compatible version.
        Incompatible = 0,
        /// Permissions error.
        Eperm = 1
    }
}

enum_with_unknown! {
    /// The code associated to a `BadRequest` error.
    pub doc enum BadRequestCode(u16) {
        /// Header version not supported.
        BadVersion = 0,
        /// Header type not supported.
        BadType = 1,
        /// Stats request type not supported.
        BadStat = 2,
        /// Experimenter id not supported.
        BadExperimenter = 3,
        /// Experimenter type not supported.
        BadExpType = 4,
        /// Permissions error.
        Permissions = 5,
        /// Wrong request length for type.
        BadLength = 6,
        /// Specified buffer has already been used.
        BufferEmpty = 7,
        /// Specified buffer does not exist.
        BufferUnknown = 8,
        /// Specified table-id is invalid or does not exist.
        BadTableId = 9,
        /// Denied because controller is slave.
        IsSlave = 10,
        /// Invalid port or missing port.
        BadPort = 11,
        /// Invalid packet in packet-out.
        BadPacket = 12,
        /// Stats request overflowed the assigned buffer.
        MultipartBufferOverflow = 13
    }
}

enum_with_unknown! {
    /// The code associated to a `BadAction` error.
    pub doc enum BadActionCode(u16) {
        /// Unknown or unsupported action type.
        BadType = 0,
        /// Length problem in actions.
        BadLength = 1,
        /// Unknown experimenter id specified.
        BadExperimenterId = 2,
        /// Unknown action for experimenter id.
        BadExperimenterType = 3,
        /// Problem validating output port.
        BadOutPort = 4,
        /// Bad action argument.
        BadArgument = 5,
        /// Permissions error.
        Permissions = 6,
        /// Can't handle this many actions.
        TooMany = 7,
        /// Problem validating output queue.
        BadQueue = 8,
        /// Invalid group id in group action.
        BadOutGroup = 9,
        /// Action can't apply for this match, or Set-Field missing prerequisite.
        MatchInconsistent = 10,
        /// Action order is unsupported for the action list.
        UnsupportedOrder = 11,
        /// Action uses an unsupported tag/encap.
        BadTag = 12,
        /// Unsupported type in SET_FIELD action.
        BadSetType = 13,
        /// Length problem in SET_FIELD action.
        BadSetLength = 14,
        /// Bad argument in SET_FIELD action.
        BadSetArgument = 15
    }
}

enum_with_unknown! {
    /// The code associated to a `BadInstruction` error.
    pub doc enum BadInstructionCode(u16) {
        /// Unknown instruction.
        UnknownInstruction = 0,
        /// Switch or table does not support the instruction.
        UnsupportedInstruction = 1,
        /// Invalid Table-ID specified.
        BadTableId = 2,
        /// Metadata value unsupported by datapath.
        UnsupportedMetadata = 3,
        /// Metadata mask value unsupported by datapath.
        UnsupportedMetadataMask = 4,
        /// Unknown experimenter id specified.
        BadExperimenterId = 5,
        /// Unknown instruction for experimenter id.
        BadExperimenterType = 6,
        /// Length problem in instructions.
        BadLength = 7,
        /// Permissions error.
        Permissions = 8
    }
}

enum_with_unknown! {
    /// The code associated to a `BadMatch` error.
    pub doc enum BadMatchCode(u16) {
        /// Unsupported match type specified by the match.
        BadType = 0,
        /// Length problem in match.
        BadLength = 1,
        /// Match uses an unsupported tag/encap.
        BadTag = 2,
        /// Unsupported datalink address mask.
        BadDataLinkAddressMask = 3,
        /// Unsupported network address mask.
        BadNetworkAddressMask = 4,
        /// Unsupported combination of fields masked or omitted in the match.
        BadWildcards = 5,
        /// Unsupported field type in the match.
        BadField = 6,
        /// Unsupported value in a match field.
        BadValue = 7,
        /// Unsupported mask specified in the match.
        BadMask = 8,
        /// A prerequisite was not met.
        BadPrerequisites = 9,
        /// A field type was duplicated.
        DuplicateField = 10,
        /// Permissions error.
        Permissions = 11
    }
}

enum_with_unknown! {
    /// The code associated to a `FlowModFailed` error.
    pub doc enum FlowModFailedCode(u16) {
        /// Unspecified error.
        Unknown = 0,
        /// Flow not added because table was full.
        TableFull = 1,
        /// Table does not exist.
        BadTableId = 2,
        /// Attempted to add overlapping flow with CHECK_OVERLAP flag set.
        Overlap = 3,
        /// Permissions error.
        Permissions = 4,
        /// Flow not added because of unsupported idle/hard timeout.
        BadTimeout = 5,
        /// Unsupported or unknown command.
        BadCommand = 6,
        /// Unsupported or unknown flags.
        BadFlags = 7
    }
}

enum_with_unknown! {
    /// The code associated to a `GroupModFailed` error.
    pub doc enum GroupModFailedCode(u16) {
        /// A group ADD attempted to replace an already-present group.
        GroupExists = 0,
        /// Group specified is invalid.
        InvalidGroup = 1,
        /// Switch does not support unequal load sharing with select groups.
        WeightUnsupported = 2,
        /// The group table is full.
        OutOfGroups = 3,
        /// The maximum number of action buckets for a group has been exceeded.
        OutOfBuckets = 4,
        /// Switch does not support groups that forward to groups.
        ChainingUnsupported = 5,
        /// This group cannot watch the watch_port or watch_group specified.
        WatchUnsupported = 6,
        /// Group entry would cause a loop.
        Loop = 7,
        /// A group MODIFY attempted to modify a non-existent group.
        UnknownGroup = 8,
        /// Group not deleted because another group is forwarding to it.
        ChainedGroup = 9,
        /// Unsupported or unknown group type.
        BadType = 10,
        /// Unsupported or unknown command.
        BadCommand = 11,
        /// Error in bucket.
        BadBucket = 12,
        /// Error in watch port/group.
        BadWatch = 13,
        /// Permissions error.
        Permissions = 14
    }
}

enum_with_unknown! {
    /// The code associated to a `PortModFailed` error.
    pub doc enum PortModFailedCode(u16) {
        /// Specified port number does not exist.
        BadPort = 0,
        /// Specified hardware address does not match the port number.
        BadHardwareAddress = 1,
        /// Specified config is invalid.
        BadConfig = 2,
        /// Specified advertise is invalid.
        BadAdvertise = 3,
        /// Permissions error.
        Permissions = 4
    }
}

enum_with_unknown! {
    /// The code associated to a `TableModFailed` error.
    pub doc enum TableModFailedCode(u16) {
        /// Specified table does not exist.
        BadTable = 0,
        /// Specified config is invalid.
        BadConfig = 1,
        /// Permissions error.
        Permissions = 2
    }
}

enum_with_unknown! {
    /// The code associated to a `QueueOpFailed` error.
    pub doc enum QueueOpFailedCode(u16) {
        /// Invalid port (or port does not exist).
        BadPort = 0,
        /// Queue does not exist.
        BadQueue = 1,
        /// Permissions error.
        Permissions = 2
    }
}

enum_with_unknown! {
    /// The code associated to a `SwitchConfigFailed` error.
    pub doc enum SwitchConfigFailedCode(u16) {
        /// Specified flags are invalid.
        BadFlags = 0,
        /// Specified miss send len is invalid.
        BadLength = 1,
        /// Permissions error.
        Permissions = 2
    }
}

enum_with_unknown! {
    /// The code associated to a `RoleRequestFailed` error.
    pub doc enum RoleRequestFailedCode(u16) {
        /// Stale message: old generation_id.
        Stale = 0,
        /// Controller role change unsupported.
        Unsupported = 1,
        /// Invalid role.
        BadRole = 2
    }
}

enum_with_unknown! {
    /// The code associated to a `MeterModFailed` error.
    pub doc enum MeterModFailedCode(u16) {
        /// Unspecified error.
        Unknown = 0,
        /// A meter ADD attempted to replace an existing meter.
        MeterExists = 1,
        /// Meter specified is invalid.
        InvalidMeter = 2,
        /// A meter MODIFY attempted to modify a non-existent meter.
        UnknownMeter = 3,
        /// Unsupported or unknown command.
        BadCommand = 4,
        /// Flag configuration unsupported.
        BadFlags = 5,
        /// Rate unsupported.
        BadRate = 6,
        /// Burst size unsupported.
        BadBurst = 7,
        /// Band unsupported.
        BadBand = 8,
        /// Band value unsupported.
        BadBandValue = 9,
        /// No more meters available.
        OutOfMeters = 10,
        /// The maximum number of properties for a meter has been exceeded.
        OutOfBands = 11
    }
}

enum_with_unknown! {
    /// The code associated to a `TableFeaturesFailed` error.
    pub doc enum TableFeaturesFailedCode(u16) {
        /// Specified table does not exist.
        BadTable = 0,
        /// Invalid metadata mask.
        BadMetadata = 1,
        /// Unknown property type.
        BadType = 2,
        /// Length problem in properties.
        BadLength = 3,
        /// Unsupported property value.
        BadArgument = 4,
        /// Permissions error.
        Permissions = 5
    }
}

/// ```no_rust
/// +--------+--------+--------+--------+
/// |       type      |      code       |
/// +--------+--------+--------+--------+
/// |               data                |
/// +--------+--------+--------+--------+
/// ```
///
/// An error message can be sent by either the switch or the controller and
/// indicates the failure of an operation. The data has variable length and
/// is interpreted based on the type of error.
#[derive(Debug)]
pub struct Packet<T: AsRef<[u8]>> {
    buffer: T,
}

mod field {
    use crate::field::*;

    pub const KIND: Field = 0..2;
    pub const CODE: Field = 2..4;
    pub const DATA: Rest = 4..;
}

impl<T: AsRef<[u8]>> Packet<T> {
    pub fn new(buffer: T) -> Self {
        Packet { buffer }
    }

    pub fn new_checked(buffer: T) -> Result<Self> {
        let packet = Self::new(buffer);
        packet.check_len()?;
        Ok(packet)
    }

    pub fn check_len(&self) -> Result<()> {
        if self.buffer.as_ref().len() < Self::header_len() {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    pub fn header_len() -> usize {
        field::CODE.end
    }

    /// Return the type field.
    #[inline]
    pub fn kind(&self) -> Kind {
        let data = self.buffer.as_ref();
        NetworkEndian::read_u16(&data[field::KIND]).into()
    }

    /// Return the code field.
    #[inline]
    pub fn code(&self) -> u16 {
        let data = self.buffer.as_ref();
        NetworkEndian::read_u16(&data[field::CODE])
    }

    /// Return the underlying buffer.
    pub fn into_inner(self) -> T {
        self.buffer
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Packet<&'a T> {
    /// Return a pointer to the error data.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        &self.buffer.as_ref()[field::DATA]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Packet<T> {
    /// Set the type field.
    #[inline]
    pub fn set_kind(&mut self, value: Kind) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u16(&mut data[field::KIND], value.into())
    }

    /// Set the code field.
    #[inline]
    pub fn set_code(&mut self, value: u16) {
        let data = self.buffer.as_mut();
        NetworkEndian::write_u16(&mut data[field::CODE], value)
    }
}

impl<'a, T: AsRef<[u8]> + AsMut<[u8]> + ?Sized> Packet<&'a mut T> {
    /// Return a mutable pointer to the error data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buffer.as_mut()[field::DATA]
    }
}

/// Represent the type and code of an error message.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Header {
    /// Hello protocol failed.
    HelloFailed(HelloFailedCode),
    /// Request was not understood.
    BadRequest(BadRequestCode),
    /// Error in action description.
    BadAction(BadActionCode),
    /// Error in instruction list.
    BadInstruction(BadInstructionCode),
    /// Error in match.
    BadMatch(BadMatchCode),
    /// Problem modifying flow entry.
    FlowModFailed(FlowModFailedCode),
    /// Problem modifying group entry.
    GroupModFailed(GroupModFailedCode),
    /// Port mod request failed.
    PortModFailed(PortModFailedCode),
    /// Table mod request failed.
    TableModFailed(TableModFailedCode),
    /// Queue operation failed.
    QueueOpFailed(QueueOpFailedCode),
    /// Switch config request failed.
    SwitchConfigFailed(SwitchConfigFailedCode),
    /// Controller role request failed (v1.3).
    RoleRequestFailed(RoleRequestFailedCode),
    /// Error in meter (v1.3).
    MeterModFailed(MeterModFailedCode),
    /// Setting table features failed (v1.3).
    TableFeaturesFailed(TableFeaturesFailedCode),
    /// Experimenter error message (v1.3); the value is the experimenter
    /// type, the experimenter id leads the data.
    Experimenter(u16),
}

impl Header {
    /// Return the lowest wire version that defines this error type.
    pub fn min_version(&self) -> u8 {
        match *self {
            Header::RoleRequestFailed(_)
            | Header::MeterModFailed(_)
            | Header::TableFeaturesFailed(_)
            | Header::Experimenter(_) => VERSION_OF13,
            _ => VERSION_OF11,
        }
    }
}

/// A high-level representation of an error message body.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ErrorMsgRepr {
    pub header: Header,
    /// Variable-length data interpreted based on the error type; for most
    /// types this is the beginning of the offending message.
    pub data: Vec<u8>,
}

impl Repr for ErrorMsgRepr {
    #[cfg_attr(rustfmt, rustfmt_skip)]
    fn parse(buffer: &[u8]) -> Result<Self> {
        use self::Kind::*;

        // Reject codes outside the per-type table.
        macro_rules! code {
            ($ty:ident, $value:expr) => {
                match $ty::from($value) {
                    $ty::_Unknown(_) => return Err(Error::UnknownTag),
                    code => code,
                }
            };
        }

        let packet = Packet::new_checked(buffer)?;
        let code = packet.code();
        let header = match packet.kind() {
            HelloFailed         => Header::HelloFailed(code!(HelloFailedCode, code)),
            BadRequest          => Header::BadRequest(code!(BadRequestCode, code)),
            BadAction           => Header::BadAction(code!(BadActionCode, code)),
            BadInstruction      => Header::BadInstruction(code!(BadInstructionCode, code)),
            BadMatch            => Header::BadMatch(code!(BadMatchCode, code)),
            FlowModFailed       => Header::FlowModFailed(code!(FlowModFailedCode, code)),
            GroupModFailed      => Header::GroupModFailed(code!(GroupModFailedCode, code)),
            PortModFailed       => Header::PortModFailed(code!(PortModFailedCode, code)),
            TableModFailed      => Header::TableModFailed(code!(TableModFailedCode, code)),
            QueueOpFailed       => Header::QueueOpFailed(code!(QueueOpFailedCode, code)),
            SwitchConfigFailed  => Header::SwitchConfigFailed(code!(SwitchConfigFailedCode, code)),
            RoleRequestFailed   => Header::RoleRequestFailed(code!(RoleRequestFailedCode, code)),
            MeterModFailed      => Header::MeterModFailed(code!(MeterModFailedCode, code)),
            TableFeaturesFailed => Header::TableFeaturesFailed(code!(TableFeaturesFailedCode, code)),
            Experimenter        => Header::Experimenter(code),
            _Unknown(_)         => return Err(Error::UnknownTag),
        };
        Ok(ErrorMsgRepr {
            header,
            data: packet.data().to_vec(),
        })
    }

    fn buffer_len(&self) -> usize {
        Packet::<&[u8]>::header_len() + self.data.len()
    }

    #[cfg_attr(rustfmt, rustfmt_skip)]
    fn emit(&self, buffer: &mut [u8]) -> Result<()> {
        use self::Header::*;

        if buffer.len() < self.buffer_len() {
            return Err(Error::Exhausted);
        }

        let mut packet = Packet::new(&mut buffer[..]);
        let (kind, code) = match self.header {
            HelloFailed(code)         => (Kind::HelloFailed,         u16::from(code)),
            BadRequest(code)          => (Kind::BadRequest,          u16::from(code)),
            BadAction(code)           => (Kind::BadAction,           u16::from(code)),
            BadInstruction(code)      => (Kind::BadInstruction,      u16::from(code)),
            BadMatch(code)            => (Kind::BadMatch,            u16::from(code)),
            FlowModFailed(code)       => (Kind::FlowModFailed,       u16::from(code)),
            GroupModFailed(code)      => (Kind::GroupModFailed,      u16::from(code)),
            PortModFailed(code)       => (Kind::PortModFailed,       u16::from(code)),
            TableModFailed(code)      => (Kind::TableModFailed,      u16::from(code)),
            QueueOpFailed(code)       => (Kind::QueueOpFailed,       u16::from(code)),
            SwitchConfigFailed(code)  => (Kind::SwitchConfigFailed,  u16::from(code)),
            RoleRequestFailed(code)   => (Kind::RoleRequestFailed,   u16::from(code)),
            MeterModFailed(code)      => (Kind::MeterModFailed,      u16::from(code)),
            TableFeaturesFailed(code) => (Kind::TableFeaturesFailed, u16::from(code)),
            Experimenter(code)        => (Kind::Experimenter,        code),
        };
        packet.set_kind(kind);
        packet.set_code(code);
        packet.data_mut()[..self.data.len()].copy_from_slice(&self.data);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip() {
        let repr = ErrorMsgRepr {
            header: Header::BadMatch(BadMatchCode::BadField),
            data: vec![0x06, 0x0e, 0x00, 0x08],
        };
        let mut bytes = vec![0; repr.buffer_len()];
        repr.emit(&mut bytes).unwrap();
        assert_eq!(&bytes[..4], &[0x00, 0x04, 0x00, 0x06]);
        assert_eq!(ErrorMsgRepr::parse(&bytes).unwrap(), repr);
    }

    #[test]
    fn unknown_kind() {
        assert_eq!(
            ErrorMsgRepr::parse(&[0x00, 0x20, 0x00, 0x00]),
            Err(Error::UnknownTag)
        );
    }

    #[test]
    fn unknown_code() {
        assert_eq!(
            ErrorMsgRepr::parse(&[0x00, 0x00, 0x00, 0x09]),
            Err(Error::UnknownTag)
        );
    }

    #[test]
    fn version_gate() {
        let of13_only = ErrorMsgRepr {
            header: Header::MeterModFailed(MeterModFailedCode::BadRate),
            data: vec![],
        };
        assert_eq!(of13_only.header.min_version(), VERSION_OF13);
        let common = ErrorMsgRepr {
            header: Header::HelloFailed(HelloFailedCode::Incompatible),
            data: vec![],
        };
        assert_eq!(common.header.min_version(), VERSION_OF11);
    }
}
