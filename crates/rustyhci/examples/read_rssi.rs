//! Example: Reading the RSSI of a connection
//!
//! Usage: read_rssi <connection handle> [device id]

use rustyhci::hci::opcode;
use rustyhci::{CommandEngine, HciSocket, Parameters};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let handle: u16 = match args.next() {
        Some(arg) => arg.parse()?,
        None => {
            eprintln!("usage: read_rssi <connection handle> [device id]");
            std::process::exit(2);
        }
    };
    let dev_id: u16 = args.next().map(|a| a.parse()).transpose()?.unwrap_or(0);

    println!("Opening HCI socket for device {}...", dev_id);
    let engine = CommandEngine::new(HciSocket::open(dev_id)?);

    let response = engine.request(opcode::READ_RSSI, &Parameters::new().with(handle))?;
    match (response[0].as_u16(), response[1].as_i8()) {
        (Some(handle), Some(rssi)) => println!("handle {}: RSSI {} dBm", handle, rssi),
        _ => println!("unexpected response: {:?}", response),
    }

    Ok(())
}
