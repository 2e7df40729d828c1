//! Bluetooth HCI (Host Controller Interface) implementation
//!
//! This module provides packet framing, the opcode and parameter codecs,
//! event decoding and the command/response engine.

pub mod channel;
pub mod constants;
pub mod engine;
pub mod event;
pub mod filter;
pub mod opcode;
pub mod packet;
pub mod params;
pub mod socket;
pub mod status;


pub use channel::RawChannel;
pub use engine::{CancelToken, CommandEngine, RequestConfig};
pub use event::HciEvent;
pub use filter::{HciFilter, PacketTypes};
pub use opcode::OpCode;
pub use packet::{Packet, PacketType};
pub use params::{Parameter, Parameters, ResponseDecoders};
pub use socket::HciSocket;
pub use status::StatusCode;
