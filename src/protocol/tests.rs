// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::error::MultiaddrError;
use crate::protocol::registry::*;
use crate::protocol::table::*;
use std::collections::HashSet;

#[test]
fn test_builtin_lookups() {
    let registry = Registry::builtin();

    let ip4 = registry.by_name("ip4").expect("ip4 registered");
    assert_eq!(ip4.code, IP4);
    assert_eq!(ip4.size, AddressSize::Fixed(32));
    assert_eq!(ip4.format, ValueFormat::Ip4);
    assert!(!ip4.resolvable);

    let udp = registry.by_code(UDP).expect("udp registered");
    assert_eq!(udp.name, "udp");
    assert_eq!(udp.format, ValueFormat::Port);

    let unix = registry.by_name("unix").expect("unix registered");
    assert!(unix.path);
    assert_eq!(unix.size, AddressSize::Variable);
    assert_eq!(unix.format, ValueFormat::Path);

    let quic = registry.by_name("quic").expect("quic registered");
    assert_eq!(quic.size, AddressSize::Zero);
    assert!(!quic.has_value());
}

#[test]
fn test_resolvable_protocols() {
    let registry = Registry::builtin();
    let resolvable: HashSet<&str> = registry
        .iter()
        .filter(|p| p.resolvable)
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(
        resolvable,
        HashSet::from(["dns", "dns4", "dns6", "dnsaddr"])
    );
}

#[test]
fn test_ipfs_alias_maps_to_p2p() {
    let registry = Registry::builtin();
    let ipfs = registry.by_name("ipfs").expect("alias registered");
    let p2p = registry.by_name("p2p").expect("p2p registered");
    assert_eq!(ipfs, p2p);
    assert_eq!(ipfs.name, "p2p");
    assert_eq!(registry.aliases(), vec![("ipfs", P2P)]);
}

#[test]
fn test_unknown_lookups_fail() {
    let registry = Registry::builtin();
    assert!(matches!(
        registry.by_name("nope"),
        Err(MultiaddrError::UnknownProtocol(name)) if name == "nope"
    ));
    assert!(matches!(
        registry.by_code(9999),
        Err(MultiaddrError::UnknownProtocol(_))
    ));
}

#[test]
fn test_builtin_table_is_consistent() {
    // Every row yields exactly one descriptor, codes and names are unique.
    let registry = Registry::builtin();
    assert_eq!(registry.len(), BUILTIN_TABLE.len());

    let from_entries = Registry::from_entries(&builtin_entries()).expect("no duplicates");
    assert_eq!(from_entries.len(), registry.len());
    for protocol in registry.iter() {
        assert_eq!(from_entries.by_code(protocol.code).unwrap(), protocol);
    }
}

#[test]
fn test_register_duplicate_code() {
    let mut registry = Registry::new();
    registry.register(4, 32, "ip4", false, false).unwrap();
    let result = registry.register(4, 32, "other", false, false);
    assert!(matches!(result, Err(MultiaddrError::DuplicateProtocol(_))));
}

#[test]
fn test_register_duplicate_name() {
    let mut registry = Registry::new();
    registry.register(4, 32, "ip4", false, false).unwrap();
    let result = registry.register(5, 32, "ip4", false, false);
    assert!(matches!(result, Err(MultiaddrError::DuplicateProtocol(_))));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_alias_conflicts() {
    let mut registry = Registry::builtin();
    assert!(matches!(
        registry.register_alias("tcp", P2P),
        Err(MultiaddrError::DuplicateProtocol(_))
    ));
    assert!(matches!(
        registry.register_alias("peer", 12345),
        Err(MultiaddrError::UnknownProtocol(_))
    ));
    let protocol = registry.register_alias("peer", P2P).unwrap();
    assert_eq!(protocol.code, P2P);
}

#[test]
fn test_invalid_size_rejected() {
    let mut registry = Registry::new();
    assert!(matches!(
        registry.register(900, -7, "weird", false, false),
        Err(MultiaddrError::ConfigError(_))
    ));
}

#[test]
fn test_fixed_len() {
    let registry = Registry::builtin();
    assert_eq!(registry.by_code(IP6).unwrap().fixed_len().unwrap(), Some(16));
    assert_eq!(registry.by_code(ONION3).unwrap().fixed_len().unwrap(), Some(37));
    assert_eq!(registry.by_code(DNS4).unwrap().fixed_len().unwrap(), None);
    assert_eq!(registry.by_code(WS).unwrap().fixed_len().unwrap(), Some(0));

    let odd = Protocol::new(901, 12, "odd", false, false).unwrap();
    assert!(matches!(
        odd.fixed_len(),
        Err(MultiaddrError::InvalidAddressLength(_))
    ));
}

#[test]
fn test_entries_roundtrip_through_toml() {
    let registry = Registry::builtin();
    let entries = registry.entries();
    let p2p = entries.iter().find(|e| e.code == P2P).unwrap();
    assert_eq!(p2p.aliases, vec!["ipfs".to_string()]);

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Table {
        protocols: Vec<ProtocolEntry>,
    }
    let text = toml::to_string(&Table { protocols: entries }).expect("serialize table");
    let table: Table = toml::from_str(&text).expect("parse table");
    let rebuilt = Registry::from_entries(&table.protocols).expect("rebuild");
    assert_eq!(rebuilt.len(), registry.len());
    assert_eq!(rebuilt.by_name("ipfs").unwrap().code, P2P);
}
