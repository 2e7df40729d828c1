//! Error types for the rustyhci library
//!
//! This module defines the error types used throughout the library.

use crate::hci::opcode::OpCode;
use crate::hci::packet::PacketType;
use crate::hci::status::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to an HCI controller
#[derive(Error, Debug)]
pub enum HciError {
    #[error("Failed to open HCI socket: {0}")]
    SocketError(std::io::Error),

    #[error("Failed to bind to HCI device: {0}")]
    BindError(std::io::Error),

    #[error("Failed to send HCI command: {0}")]
    SendError(std::io::Error),

    #[error("Failed to receive HCI event: {0}")]
    ReceiveError(std::io::Error),

    #[error("Incomplete write: {written} of {expected} bytes accepted")]
    IncompleteWrite { written: usize, expected: usize },

    #[error("Failed to read HCI filter: {0}")]
    GetFilterError(std::io::Error),

    #[error("Failed to install HCI filter: {0}")]
    SetFilterError(std::io::Error),

    #[error("Invalid parameter length: {0}")]
    InvalidParamLength(usize),

    #[error("{kind:?} payload of {len} bytes exceeds the {max} byte length field")]
    PayloadTooLong {
        kind: PacketType,
        len: usize,
        max: usize,
    },

    #[error("Event 0x{code:02x} payload too short: need {expected} bytes, got {actual}")]
    EventTooShort {
        code: u8,
        expected: usize,
        actual: usize,
    },

    #[error("Unrecognized event code 0x{0:02x}")]
    UnknownEvent(u8),

    #[error("Unknown opcode ({0}): no response decoder registered")]
    UnknownOpcode(OpCode),

    #[error("Response to {opcode} too short: need {expected} bytes, got {actual}")]
    ResponseTooShort {
        opcode: OpCode,
        expected: usize,
        actual: usize,
    },

    #[error("Controller reported: {0}")]
    Status(#[from] StatusCode),

    #[error("Timed out waiting for response to {0}")]
    Timeout(OpCode),

    #[error("Request for {0} was cancelled")]
    Cancelled(OpCode),

    #[error("Receive buffer exceeded {0} bytes without a complete frame")]
    BufferOverflow(usize),
}

impl HciError {
    /// The controller status carried by this error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HciError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias using HciError
pub type Result<T> = std::result::Result<T, HciError>;
