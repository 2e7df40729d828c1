//! HCI command opcodes
//!
//! An opcode packs a 6-bit group field (OGF) above a 10-bit command field
//! (OCF). On the wire it is a little-endian `u16`.

use crate::hci::constants::*;
use std::fmt;

/// A 16-bit HCI command opcode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpCode(pub u16);

impl OpCode {
    /// Builds an opcode from its group and command fields.
    ///
    /// Bits of `ogf` above the low six and of `ocf` above the low ten are
    /// discarded.
    pub const fn new(ogf: u8, ocf: u16) -> OpCode {
        OpCode((((ogf & 0x3f) as u16) << 10) | (ocf & 0x03ff))
    }

    /// Opcode Group Field
    pub const fn ogf(&self) -> u8 {
        (self.0 >> 10) as u8
    }

    /// Opcode Command Field
    pub const fn ocf(&self) -> u16 {
        self.0 & 0x03ff
    }

    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    pub const fn from_le_bytes(bytes: [u8; 2]) -> OpCode {
        OpCode(u16::from_le_bytes(bytes))
    }

    /// Whether this command belongs to the LE controller group
    pub const fn is_le(&self) -> bool {
        self.ogf() == OGF_LE_CTL
    }
}

impl From<u16> for OpCode {
    fn from(value: u16) -> Self {
        OpCode(value)
    }
}

impl From<OpCode> for u16 {
    fn from(value: OpCode) -> Self {
        value.0
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ogf=0x{:02x},ocf=0x{:04x}", self.ogf(), self.ocf())
    }
}

pub const RESET: OpCode = OpCode::new(OGF_HOST_CTL, OCF_RESET);
pub const READ_LOCAL_VERSION: OpCode = OpCode::new(OGF_INFO_PARAM, OCF_READ_LOCAL_VERSION);
pub const READ_BD_ADDR: OpCode = OpCode::new(OGF_INFO_PARAM, OCF_READ_BD_ADDR);
pub const READ_FAILED_CONTACT_COUNTER: OpCode =
    OpCode::new(OGF_STATUS_PARAM, OCF_READ_FAILED_CONTACT_COUNTER);
pub const RESET_FAILED_CONTACT_COUNTER: OpCode =
    OpCode::new(OGF_STATUS_PARAM, OCF_RESET_FAILED_CONTACT_COUNTER);
pub const READ_LINK_QUALITY: OpCode = OpCode::new(OGF_STATUS_PARAM, OCF_READ_LINK_QUALITY);
pub const READ_RSSI: OpCode = OpCode::new(OGF_STATUS_PARAM, OCF_READ_RSSI);
pub const READ_AFH_CHANNEL_MAP: OpCode = OpCode::new(OGF_STATUS_PARAM, OCF_READ_AFH_CHANNEL_MAP);
pub const READ_CLOCK: OpCode = OpCode::new(OGF_STATUS_PARAM, OCF_READ_CLOCK);
pub const READ_ENCRYPTION_KEY_SIZE: OpCode =
    OpCode::new(OGF_STATUS_PARAM, OCF_READ_ENCRYPTION_KEY_SIZE);
