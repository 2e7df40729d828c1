//! HCI event decoding
//!
//! Turns the payload of an Event packet into one of the event records the
//! command engine understands.

use crate::address::BdAddr;
use crate::error::{HciError, Result};
use crate::hci::constants::*;
use crate::hci::opcode::OpCode;
use byteorder::{ByteOrder, LittleEndian};

/// A decoded HCI event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HciEvent {
    /// Command Complete (0x0E)
    CommandComplete {
        /// Num_HCI_Command_Packets
        allowed_commands: u8,
        opcode: OpCode,
        /// Return parameters, layout depends on `opcode`
        return_params: Vec<u8>,
    },
    /// Command Status (0x0F)
    CommandStatus {
        status: u8,
        allowed_commands: u8,
        opcode: OpCode,
    },
    /// LE Meta Event (0x3E), subevent payload left undecoded
    LeMeta { subevent: u8, data: Vec<u8> },
    /// Remote Name Request Complete (0x07)
    RemoteNameRequestComplete {
        status: u8,
        address: BdAddr,
        name: String,
    },
}

impl HciEvent {
    /// Decodes an event payload by event code
    pub fn decode(code: u8, params: &[u8]) -> Result<Self> {
        match code {
            EVT_CMD_COMPLETE => {
                require_len(code, params, 3)?;
                Ok(HciEvent::CommandComplete {
                    allowed_commands: params[0],
                    opcode: OpCode(LittleEndian::read_u16(&params[1..3])),
                    return_params: params[3..].to_vec(),
                })
            }

            EVT_CMD_STATUS => {
                require_len(code, params, 4)?;
                Ok(HciEvent::CommandStatus {
                    status: params[0],
                    allowed_commands: params[1],
                    opcode: OpCode(LittleEndian::read_u16(&params[2..4])),
                })
            }

            EVT_LE_META_EVENT => {
                require_len(code, params, 1)?;
                Ok(HciEvent::LeMeta {
                    subevent: params[0],
                    data: params[1..].to_vec(),
                })
            }

            EVT_REMOTE_NAME_REQ_COMPLETE => {
                require_len(code, params, EVT_REMOTE_NAME_REQ_COMPLETE_SIZE)?;
                let mut bytes = [0u8; 6];
                bytes.copy_from_slice(&params[1..7]);
                let raw_name = &params[7..7 + HCI_MAX_NAME_LEN];
                let end = raw_name.iter().position(|&b| b == 0).unwrap_or(raw_name.len());
                Ok(HciEvent::RemoteNameRequestComplete {
                    status: params[0],
                    address: BdAddr::new(bytes),
                    name: String::from_utf8_lossy(&raw_name[..end]).into_owned(),
                })
            }

            other => Err(HciError::UnknownEvent(other)),
        }
    }

    pub fn event_code(&self) -> u8 {
        match self {
            HciEvent::CommandComplete { .. } => EVT_CMD_COMPLETE,
            HciEvent::CommandStatus { .. } => EVT_CMD_STATUS,
            HciEvent::LeMeta { .. } => EVT_LE_META_EVENT,
            HciEvent::RemoteNameRequestComplete { .. } => EVT_REMOTE_NAME_REQ_COMPLETE,
        }
    }

    /// The opcode this event answers, for Command Complete and Command Status
    pub fn opcode(&self) -> Option<OpCode> {
        match self {
            HciEvent::CommandComplete { opcode, .. } | HciEvent::CommandStatus { opcode, .. } => {
                Some(*opcode)
            }
            _ => None,
        }
    }
}

fn require_len(code: u8, params: &[u8], expected: usize) -> Result<()> {
    if params.len() < expected {
        return Err(HciError::EventTooShort {
            code,
            expected,
            actual: params.len(),
        });
    }
    Ok(())
}
