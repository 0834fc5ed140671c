#![no_main]

use libfuzzer_sys::fuzz_target;
use multiaddr_core::Multiaddr;

fuzz_target!(|text: &str| {
    if let Ok(addr) = text.parse::<Multiaddr>() {
        let canonical = addr.to_string();
        let reparsed: Multiaddr = canonical.parse().expect("canonical text parses");
        assert_eq!(reparsed.to_string(), canonical);
        assert_eq!(Multiaddr::from_bytes(addr.to_bytes()).ok(), Some(addr));
    }
});
