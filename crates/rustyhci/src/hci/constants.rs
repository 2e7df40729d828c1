//! HCI protocol constants
//!
//! This module contains constants used in the Bluetooth HCI protocol.

// HCI packet indicators
pub const HCI_COMMAND_PKT: u8 = 0x01;
pub const HCI_ACL_PKT: u8 = 0x02;
pub const HCI_SCO_PKT: u8 = 0x03;
pub const HCI_EVENT_PKT: u8 = 0x04;
pub const HCI_VENDOR_PKT: u8 = 0xff;

// Header sizes, indicator byte included
pub const HCI_COMMAND_HDR_SIZE: usize = 4;
pub const HCI_ACL_HDR_SIZE: usize = 5;
pub const HCI_SCO_HDR_SIZE: usize = 4;
pub const HCI_EVENT_HDR_SIZE: usize = 3;

// Maximum size of HCI command parameters
pub const HCI_MAX_PARAM_LEN: usize = 255;

// Largest single event frame: indicator + code + length + 255 bytes
pub const HCI_MAX_EVENT_SIZE: usize = HCI_EVENT_HDR_SIZE + 255;

// Largest single frame of any kind (ACL, 16-bit length)
pub const HCI_MAX_FRAME_SIZE: usize = HCI_ACL_HDR_SIZE + u16::MAX as usize;

// OGF (Opcode Group Field) values
pub const OGF_LINK_CTL: u8 = 0x01;
pub const OGF_LINK_POLICY: u8 = 0x02;
pub const OGF_HOST_CTL: u8 = 0x03;
pub const OGF_INFO_PARAM: u8 = 0x04;
pub const OGF_STATUS_PARAM: u8 = 0x05;
pub const OGF_TESTING: u8 = 0x06;
pub const OGF_LE_CTL: u8 = 0x08;

// Host Controller Commands (OGF: 0x03)
pub const OCF_RESET: u16 = 0x0003;

// Informational Parameters (OGF: 0x04)
pub const OCF_READ_LOCAL_VERSION: u16 = 0x0001;
pub const OCF_READ_BD_ADDR: u16 = 0x0009;

// Status Parameters (OGF: 0x05)
pub const OCF_READ_FAILED_CONTACT_COUNTER: u16 = 0x0001;
pub const OCF_RESET_FAILED_CONTACT_COUNTER: u16 = 0x0002;
pub const OCF_READ_LINK_QUALITY: u16 = 0x0003;
pub const OCF_READ_RSSI: u16 = 0x0005;
pub const OCF_READ_AFH_CHANNEL_MAP: u16 = 0x0006;
pub const OCF_READ_CLOCK: u16 = 0x0007;
pub const OCF_READ_ENCRYPTION_KEY_SIZE: u16 = 0x0008;

// HCI Events
pub const EVT_REMOTE_NAME_REQ_COMPLETE: u8 = 0x07;
pub const EVT_CMD_COMPLETE: u8 = 0x0E;
pub const EVT_CMD_STATUS: u8 = 0x0F;
pub const EVT_LE_META_EVENT: u8 = 0x3E;

// Remote Name Request Complete carries a fixed 255-byte payload
pub const EVT_REMOTE_NAME_REQ_COMPLETE_SIZE: usize = 255;
pub const HCI_MAX_NAME_LEN: usize = 248;

// Socket level constants
pub const AF_BLUETOOTH: i32 = 31;
pub const BTPROTO_HCI: i32 = 1;
pub const SOL_HCI: i32 = 0;
pub const HCI_CHANNEL_RAW: u16 = 0;

// HCI socket options
pub const HCI_FILTER: i32 = 2;

// struct hci_ufilter is 14 bytes of fields padded to 16
pub const HCI_FILTER_SIZE: usize = 16;
