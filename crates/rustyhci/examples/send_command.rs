//! Example: Sending HCI commands
//!
//! Resets the controller, then reads its address and version.

use rustyhci::hci::opcode;
use rustyhci::{BdAddr, CommandEngine, HciError, HciSocket, Parameters, RequestConfig};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Opening HCI socket for device 0...");
    let socket = HciSocket::open(0)?;
    let config = RequestConfig::default().with_timeout(Some(Duration::from_secs(2)));
    let engine = CommandEngine::with_config(socket, config);

    println!("Sending HCI Reset command...");
    match engine.request(opcode::RESET, &Parameters::new()) {
        Ok(_) => println!("Reset complete"),
        Err(HciError::Status(status)) => println!("Controller refused reset: {}", status),
        Err(e) => return Err(e.into()),
    }

    let response = engine.request(opcode::READ_BD_ADDR, &Parameters::new())?;
    if let Some(addr) = response.first().and_then(|p| p.as_bytes()).and_then(BdAddr::from_slice) {
        println!("Controller address: {}", addr);
    }

    let version = engine.request(opcode::READ_LOCAL_VERSION, &Parameters::new())?;
    println!("Local version: {:?}", version);

    Ok(())
}
