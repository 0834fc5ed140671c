#![no_main]

use libfuzzer_sys::fuzz_target;
use multiaddr_core::Multiaddr;

fuzz_target!(|data: &[u8]| {
    // Any accepted input must be canonical and have a text form that parses back
    if let Ok(addr) = Multiaddr::from_bytes(data.to_vec()) {
        assert_eq!(addr.as_bytes(), data);
        let text = addr.to_string();
        let reparsed: Multiaddr = text.parse().expect("text form of a valid address parses");
        assert_eq!(reparsed, addr);
    }
});
