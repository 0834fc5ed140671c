//! Example: Inspecting Multiaddrs
//!
//! Parses each argument (text form, or hex canonical bytes prefixed with `0x`)
//! and prints its structure.
//!
//! Run with: `cargo run --example inspect -- /ip4/127.0.0.1/tcp/4001 0x047f000001060fa1`

#![allow(clippy::uninlined_format_args)]

use multiaddr_core::config::MultiaddrConfig;
use multiaddr_core::utils::{global_metrics, logging};
use multiaddr_core::Multiaddr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = MultiaddrConfig::from_env()?;
    config.validate_strict()?;
    logging::init_logging(&config.logging)?;

    let mut inputs: Vec<String> = std::env::args().skip(1).collect();
    if inputs.is_empty() {
        inputs = vec![
            "/ip4/127.0.0.1/tcp/4001/p2p/QmNnooDu7bfjPFoTZYxMNLWUQJyrVwtbZg5gBMjTezGAJN".to_string(),
            "/dns4/example.com/tcp/443/wss".to_string(),
            "/unix/%2Ftmp%2Fsock".to_string(),
        ];
    }

    for input in inputs {
        let parsed = match input.strip_prefix("0x") {
            Some(hex_bytes) => hex::decode(hex_bytes)
                .map_err(|e| e.to_string())
                .and_then(|bytes| Multiaddr::from_bytes(bytes).map_err(|e| e.to_string())),
            None => input.parse::<Multiaddr>().map_err(|e| e.to_string()),
        };

        let addr = match parsed {
            Ok(addr) => addr,
            Err(e) => {
                println!("{}\n   ✗ {}\n", input, e);
                continue;
            }
        };

        println!("{:?}", addr);
        println!("   - Text:       {}", addr);
        println!("   - Bytes:      {} ({} bytes)", hex::encode(addr.as_bytes()), addr.as_bytes().len());
        println!("   - Protocols:  {}", addr.proto_names().join(" -> "));
        for (code, value) in addr.string_tuples() {
            match value {
                Some(value) => println!("     [{:>4}] {}", code, value),
                None => println!("     [{:>4}]", code),
            }
        }
        if let Some(peer) = addr.peer_id() {
            println!("   - Peer id:    {}", peer);
        }
        if let Some(path) = addr.path() {
            println!("   - Path:       {}", path);
        }
        println!("   - Name:       {}", addr.is_name());
        match addr.to_options() {
            Ok(options) => println!(
                "   - Options:    {} {}:{} ({})",
                options.transport,
                options.host,
                options.port,
                options.family.as_str()
            ),
            Err(e) => println!("   - Options:    {}", e),
        }
        if addr.is_thin_waist() {
            println!("   - Socket:     {}", addr.node_address()?.to_socket_addr()?);
        }
        println!("   - JSON:       {}\n", addr.to_json()?);
    }

    global_metrics().log_metrics();
    Ok(())
}
