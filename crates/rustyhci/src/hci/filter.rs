//! HCI socket receive filter
//!
//! Mirrors the kernel's `struct hci_ufilter`. The record crosses the socket
//! option boundary through [`HciFilter::to_sockopt_bytes`] and
//! [`HciFilter::from_sockopt_bytes`], never by reinterpreting memory.

use crate::hci::constants::*;
use crate::hci::opcode::OpCode;
use bitflags::bitflags;
use byteorder::{ByteOrder, LittleEndian, NativeEndian};

bitflags! {
    /// Packet kinds let through the filter, one bit per indicator
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PacketTypes: u32 {
        const COMMAND = 1 << HCI_COMMAND_PKT;
        const ACL_DATA = 1 << HCI_ACL_PKT;
        const SCO_DATA = 1 << HCI_SCO_PKT;
        const EVENT = 1 << HCI_EVENT_PKT;
        const VENDOR = 1 << (HCI_VENDOR_PKT & 31);
    }
}

/// Receive filter of an HCI socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HciFilter {
    pub packet_types: PacketTypes,
    /// One bit per event code 0..=63, split across two words
    pub event_mask: [u32; 2],
    /// Only Command Complete/Status events for this opcode pass; zero
    /// disables the check
    pub opcode: OpCode,
}

impl HciFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The filter installed while `opcode` is in flight: events only,
    /// Command Status and Command Complete, plus LE Meta for LE commands.
    pub fn for_command(opcode: OpCode) -> Self {
        let mut filter = Self {
            packet_types: PacketTypes::EVENT,
            event_mask: [0; 2],
            opcode,
        };
        filter.set_event(EVT_CMD_STATUS);
        filter.set_event(EVT_CMD_COMPLETE);
        if opcode.is_le() {
            filter.set_event(EVT_LE_META_EVENT);
        }
        filter
    }

    /// Lets `code` through. Codes above 63 are ignored.
    pub fn set_event(&mut self, code: u8) {
        if code < 64 {
            self.event_mask[(code / 32) as usize] |= 1 << (code % 32);
        }
    }

    pub fn clear_event(&mut self, code: u8) {
        if code < 64 {
            self.event_mask[(code / 32) as usize] &= !(1 << (code % 32));
        }
    }

    pub fn has_event(&self, code: u8) -> bool {
        code < 64 && self.event_mask[(code / 32) as usize] & (1 << (code % 32)) != 0
    }

    /// Builds a mask from a list of event codes
    pub fn event_mask_of(codes: &[u8]) -> [u32; 2] {
        let mut filter = Self::new();
        for &code in codes {
            filter.set_event(code);
        }
        filter.event_mask
    }

    /// Encodes the `hci_ufilter` socket option value.
    ///
    /// Masks are host-endian `u32`s; the opcode is little-endian as on the
    /// wire; two trailing pad bytes.
    pub fn to_sockopt_bytes(&self) -> [u8; HCI_FILTER_SIZE] {
        let mut buf = [0u8; HCI_FILTER_SIZE];
        NativeEndian::write_u32(&mut buf[0..4], self.packet_types.bits());
        NativeEndian::write_u32(&mut buf[4..8], self.event_mask[0]);
        NativeEndian::write_u32(&mut buf[8..12], self.event_mask[1]);
        LittleEndian::write_u16(&mut buf[12..14], self.opcode.0);
        buf
    }

    /// Decodes an `hci_ufilter` value. Returns `None` if `buf` is shorter
    /// than the 14 bytes of fields.
    pub fn from_sockopt_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < 14 {
            return None;
        }
        Some(Self {
            packet_types: PacketTypes::from_bits_retain(NativeEndian::read_u32(&buf[0..4])),
            event_mask: [
                NativeEndian::read_u32(&buf[4..8]),
                NativeEndian::read_u32(&buf[8..12]),
            ],
            opcode: OpCode(LittleEndian::read_u16(&buf[12..14])),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mask_bits() {
        let mask = HciFilter::event_mask_of(&[EVT_CMD_COMPLETE, EVT_CMD_STATUS]);
        assert_eq!(mask[0], (1 << 14) | (1 << 15));
        assert_eq!(mask[1], 0);

        let mask = HciFilter::event_mask_of(&[EVT_LE_META_EVENT]);
        assert_eq!(mask[0], 0);
        assert_eq!(mask[1], 1 << 30);
    }

    #[test]
    fn test_for_command_masks() {
        let filter = HciFilter::for_command(OpCode::new(OGF_STATUS_PARAM, OCF_READ_RSSI));
        assert_eq!(filter.packet_types, PacketTypes::EVENT);
        assert_eq!(filter.packet_types.bits(), 1 << 4);
        assert!(filter.has_event(EVT_CMD_STATUS));
        assert!(filter.has_event(EVT_CMD_COMPLETE));
        assert!(!filter.has_event(EVT_LE_META_EVENT));
        assert_eq!(filter.opcode, OpCode(0x1405));

        let filter = HciFilter::for_command(OpCode::new(OGF_LE_CTL, 0x000B));
        assert!(filter.has_event(EVT_LE_META_EVENT));
        assert_eq!(filter.event_mask, [(1 << 14) | (1 << 15), 1 << 30]);
    }

    #[test]
    fn test_out_of_range_event_codes_ignored() {
        let mut filter = HciFilter::new();
        filter.set_event(0xFF);
        assert_eq!(filter.event_mask, [0, 0]);
        assert!(!filter.has_event(0xFF));

        filter.set_event(63);
        assert!(filter.has_event(63));
        filter.clear_event(63);
        assert!(!filter.has_event(63));
    }

    #[test]
    fn test_sockopt_layout() {
        let filter = HciFilter::for_command(OpCode(0x200B));
        let bytes = filter.to_sockopt_bytes();

        assert_eq!(&bytes[0..4], &(1u32 << 4).to_ne_bytes());
        assert_eq!(&bytes[4..8], &((1u32 << 14) | (1 << 15)).to_ne_bytes());
        assert_eq!(&bytes[8..12], &(1u32 << 30).to_ne_bytes());
        assert_eq!(&bytes[12..14], &[0x0B, 0x20]);
        assert_eq!(&bytes[14..], &[0, 0]);

        assert_eq!(HciFilter::from_sockopt_bytes(&bytes), Some(filter));
        assert_eq!(HciFilter::from_sockopt_bytes(&bytes[..13]), None);
    }
}
