//! HCI packet structures and framing
//!
//! [`Packet::parse`] extracts one frame from the front of a byte stream.
//! It keeps no state between calls: the caller owns the buffer and advances
//! it by the consumed length.

use crate::error::{HciError, Result};
use crate::hci::constants::*;
use crate::hci::opcode::OpCode;
use byteorder::{ByteOrder, LittleEndian};

/// The four packet kinds a raw HCI stream carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    Command,
    AclData,
    ScoData,
    Event,
}

impl PacketType {
    /// Maps a packet indicator byte, `None` if it is not one of the four
    pub fn from_indicator(indicator: u8) -> Option<Self> {
        match indicator {
            HCI_COMMAND_PKT => Some(PacketType::Command),
            HCI_ACL_PKT => Some(PacketType::AclData),
            HCI_SCO_PKT => Some(PacketType::ScoData),
            HCI_EVENT_PKT => Some(PacketType::Event),
            _ => None,
        }
    }

    pub fn indicator(&self) -> u8 {
        match self {
            PacketType::Command => HCI_COMMAND_PKT,
            PacketType::AclData => HCI_ACL_PKT,
            PacketType::ScoData => HCI_SCO_PKT,
            PacketType::Event => HCI_EVENT_PKT,
        }
    }
}

/// A single framed HCI packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Command {
        opcode: OpCode,
        params: Vec<u8>,
    },
    AclData {
        /// Connection handle, 12 bits
        handle: u16,
        /// Packet boundary flag, 2 bits
        pb_flag: u8,
        /// Broadcast flag, 2 bits
        bc_flag: u8,
        data: Vec<u8>,
    },
    ScoData {
        /// Connection handle, 12 bits
        handle: u16,
        /// Packet status flag, 2 bits
        status_flag: u8,
        data: Vec<u8>,
    },
    Event {
        code: u8,
        params: Vec<u8>,
    },
}

impl Packet {
    pub fn packet_type(&self) -> PacketType {
        match self {
            Packet::Command { .. } => PacketType::Command,
            Packet::AclData { .. } => PacketType::AclData,
            Packet::ScoData { .. } => PacketType::ScoData,
            Packet::Event { .. } => PacketType::Event,
        }
    }

    /// Parses one packet from the start of `buf`.
    ///
    /// Returns the packet and the number of bytes it occupies. `(None, 0)`
    /// means either more data is needed or the first byte is not a known
    /// indicator; [`PacketType::from_indicator`] tells the two apart.
    pub fn parse(buf: &[u8]) -> (Option<Packet>, usize) {
        let Some(&indicator) = buf.first() else {
            return (None, 0);
        };

        match indicator {
            HCI_COMMAND_PKT => {
                if buf.len() < HCI_COMMAND_HDR_SIZE {
                    return (None, 0);
                }
                let total = HCI_COMMAND_HDR_SIZE + buf[3] as usize;
                if buf.len() < total {
                    return (None, 0);
                }
                let packet = Packet::Command {
                    opcode: OpCode(LittleEndian::read_u16(&buf[1..3])),
                    params: buf[HCI_COMMAND_HDR_SIZE..total].to_vec(),
                };
                (Some(packet), total)
            }

            HCI_ACL_PKT => {
                if buf.len() < HCI_ACL_HDR_SIZE {
                    return (None, 0);
                }
                let total = HCI_ACL_HDR_SIZE + LittleEndian::read_u16(&buf[3..5]) as usize;
                if buf.len() < total {
                    return (None, 0);
                }
                let hdr = LittleEndian::read_u16(&buf[1..3]);
                let packet = Packet::AclData {
                    handle: hdr & 0x0fff,
                    pb_flag: ((hdr >> 12) & 0x3) as u8,
                    bc_flag: ((hdr >> 14) & 0x3) as u8,
                    data: buf[HCI_ACL_HDR_SIZE..total].to_vec(),
                };
                (Some(packet), total)
            }

            HCI_SCO_PKT => {
                if buf.len() < HCI_SCO_HDR_SIZE {
                    return (None, 0);
                }
                let total = HCI_SCO_HDR_SIZE + buf[3] as usize;
                if buf.len() < total {
                    return (None, 0);
                }
                let hdr = LittleEndian::read_u16(&buf[1..3]);
                let packet = Packet::ScoData {
                    handle: hdr & 0x0fff,
                    status_flag: ((hdr >> 12) & 0x3) as u8,
                    data: buf[HCI_SCO_HDR_SIZE..total].to_vec(),
                };
                (Some(packet), total)
            }

            HCI_EVENT_PKT => {
                if buf.len() < HCI_EVENT_HDR_SIZE {
                    return (None, 0);
                }
                let total = HCI_EVENT_HDR_SIZE + buf[2] as usize;
                if buf.len() < total {
                    return (None, 0);
                }
                let packet = Packet::Event {
                    code: buf[1],
                    params: buf[HCI_EVENT_HDR_SIZE..total].to_vec(),
                };
                (Some(packet), total)
            }

            _ => (None, 0),
        }
    }

    /// Serializes the packet, indicator byte included.
    ///
    /// Fails with [`HciError::PayloadTooLong`] when the payload does not fit
    /// the kind's length field.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let packet = match self {
            Packet::Command { opcode, params } => {
                let len = self.payload_len(params.len(), u8::MAX as usize)?;
                let mut packet = Vec::with_capacity(HCI_COMMAND_HDR_SIZE + len);
                packet.push(HCI_COMMAND_PKT);
                packet.extend_from_slice(&opcode.to_le_bytes());
                packet.push(len as u8);
                packet.extend_from_slice(params);
                packet
            }
            Packet::AclData {
                handle,
                pb_flag,
                bc_flag,
                data,
            } => {
                let len = self.payload_len(data.len(), u16::MAX as usize)?;
                let hdr = (handle & 0x0fff)
                    | (((*pb_flag as u16) & 0x3) << 12)
                    | (((*bc_flag as u16) & 0x3) << 14);
                let mut packet = Vec::with_capacity(HCI_ACL_HDR_SIZE + len);
                packet.push(HCI_ACL_PKT);
                packet.extend_from_slice(&hdr.to_le_bytes());
                packet.extend_from_slice(&(len as u16).to_le_bytes());
                packet.extend_from_slice(data);
                packet
            }
            Packet::ScoData {
                handle,
                status_flag,
                data,
            } => {
                let len = self.payload_len(data.len(), u8::MAX as usize)?;
                let hdr = (handle & 0x0fff) | (((*status_flag as u16) & 0x3) << 12);
                let mut packet = Vec::with_capacity(HCI_SCO_HDR_SIZE + len);
                packet.push(HCI_SCO_PKT);
                packet.extend_from_slice(&hdr.to_le_bytes());
                packet.push(len as u8);
                packet.extend_from_slice(data);
                packet
            }
            Packet::Event { code, params } => {
                let len = self.payload_len(params.len(), u8::MAX as usize)?;
                let mut packet = Vec::with_capacity(HCI_EVENT_HDR_SIZE + len);
                packet.push(HCI_EVENT_PKT);
                packet.push(*code);
                packet.push(len as u8);
                packet.extend_from_slice(params);
                packet
            }
        };
        Ok(packet)
    }

    fn payload_len(&self, len: usize, max: usize) -> Result<usize> {
        if len > max {
            return Err(HciError::PayloadTooLong {
                kind: self.packet_type(),
                len,
                max,
            });
        }
        Ok(len)
    }
}
