//! RustyHCI - A Rust library for Bluetooth HCI command transport
//!
//! This library drives a Bluetooth controller directly over a raw HCI
//! channel on Unix systems, without a Bluetooth management daemon.
//! It covers packet framing, opcode and parameter encoding, event decoding
//! and the synchronous command/response exchange.

pub mod address;
pub mod error;
pub mod hci;

// Re-export common types for convenience
pub use address::BdAddr;
pub use error::{HciError, Result};
pub use hci::{
    CancelToken, CommandEngine, HciEvent, HciFilter, HciSocket, OpCode, Packet, Parameter,
    Parameters, RawChannel, RequestConfig, ResponseDecoders, StatusCode,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::io::AsRawFd;

    #[test]
    fn test_open_hci_socket() {
        // This test will only pass if run with sufficient privileges
        // and if a Bluetooth adapter is available
        let result = HciSocket::open(0);

        // We don't assert here because the test might fail in environments
        // without Bluetooth hardware or sufficient privileges
        if let Ok(socket) = result {
            assert!(socket.as_raw_fd() > 0);
            assert_eq!(socket.dev_id(), 0);
        }
    }
}
