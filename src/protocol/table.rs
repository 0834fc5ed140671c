//! Built-in protocol table.
//!
//! Rows follow the `[code, size_in_bits, name, resolvable, path]` shape, with
//! [`VARIABLE_SIZE`] marking length-prefixed values.

use super::registry::{AddressSize, Protocol, Registry, ValueFormat, VARIABLE_SIZE};
use serde::{Deserialize, Serialize};

const V: i32 = VARIABLE_SIZE;

pub const IP4: u32 = 4;
pub const TCP: u32 = 6;
pub const DCCP: u32 = 33;
pub const IP6: u32 = 41;
pub const IP6ZONE: u32 = 42;
pub const DNS: u32 = 53;
pub const DNS4: u32 = 54;
pub const DNS6: u32 = 55;
pub const DNSADDR: u32 = 56;
pub const SCTP: u32 = 132;
pub const UDP: u32 = 273;
pub const P2P_CIRCUIT: u32 = 290;
pub const UNIX: u32 = 400;
pub const P2P: u32 = 421;
pub const ONION: u32 = 444;
pub const ONION3: u32 = 445;
pub const GARLIC64: u32 = 446;
pub const QUIC: u32 = 460;
pub const WS: u32 = 477;
pub const WSS: u32 = 478;

/// Codes whose value is a peer identity.
pub const PEER_ID_CODES: &[u32] = &[P2P];

pub const BUILTIN_TABLE: &[(u32, i32, &str, bool, bool)] = &[
    (IP4, 32, "ip4", false, false),
    (TCP, 16, "tcp", false, false),
    (DCCP, 16, "dccp", false, false),
    (IP6, 128, "ip6", false, false),
    (IP6ZONE, V, "ip6zone", false, false),
    (DNS, V, "dns", true, false),
    (DNS4, V, "dns4", true, false),
    (DNS6, V, "dns6", true, false),
    (DNSADDR, V, "dnsaddr", true, false),
    (SCTP, 16, "sctp", false, false),
    (UDP, 16, "udp", false, false),
    (275, 0, "p2p-webrtc-star", false, false),
    (276, 0, "p2p-webrtc-direct", false, false),
    (277, 0, "p2p-stardust", false, false),
    (P2P_CIRCUIT, 0, "p2p-circuit", false, false),
    (301, 0, "udt", false, false),
    (302, 0, "utp", false, false),
    (UNIX, V, "unix", false, true),
    (P2P, V, "p2p", false, false),
    (443, 0, "https", false, false),
    (ONION, 96, "onion", false, false),
    (ONION3, 296, "onion3", false, false),
    (GARLIC64, V, "garlic64", false, false),
    (QUIC, 0, "quic", false, false),
    (WS, 0, "ws", false, false),
    (WSS, 0, "wss", false, false),
    (479, 0, "p2p-websocket-star", false, false),
    (480, 0, "http", false, false),
];

/// Legacy names still accepted when parsing.
pub const BUILTIN_ALIASES: &[(&str, u32)] = &[("ipfs", P2P)];

/// One row of a protocol table, as loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolEntry {
    pub code: u32,
    /// Size in bits; 0 for none, -1 for variable
    pub size: i32,
    pub name: String,
    #[serde(default)]
    pub resolvable: bool,
    #[serde(default)]
    pub path: bool,
    /// Value codec; inferred from name and size when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ValueFormat>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl ProtocolEntry {
    pub fn to_protocol(&self) -> crate::error::Result<Protocol> {
        let mut protocol =
            Protocol::new(self.code, self.size, &self.name, self.resolvable, self.path)?;
        if let Some(format) = self.format {
            protocol.format = format;
        }
        protocol.format.check_size(&protocol.name, protocol.size)?;
        Ok(protocol)
    }
}

impl From<&Protocol> for ProtocolEntry {
    fn from(protocol: &Protocol) -> Self {
        Self {
            code: protocol.code,
            size: protocol.size.bits(),
            name: protocol.name.clone(),
            resolvable: protocol.resolvable,
            path: protocol.path,
            format: Some(protocol.format),
            aliases: Vec::new(),
        }
    }
}

impl Registry {
    /// Registry holding the built-in table.
    pub fn builtin() -> Self {
        let mut registry = Registry::new();
        for &(code, size, name, resolvable, path) in BUILTIN_TABLE {
            // Sizes in the built-in table are all valid sentinels or positive bit counts.
            let size = match size {
                0 => AddressSize::Zero,
                V => AddressSize::Variable,
                bits => AddressSize::Fixed(bits as u32),
            };
            registry.insert(Protocol {
                code,
                size,
                name: name.to_string(),
                resolvable,
                path,
                format: ValueFormat::infer(name, size, path),
            });
        }
        for &(alias, code) in BUILTIN_ALIASES {
            registry.insert_alias(alias, code);
        }
        registry
    }

    /// Build a registry from table rows, rejecting duplicates.
    pub fn from_entries<'a, I>(entries: I) -> crate::error::Result<Self>
    where
        I: IntoIterator<Item = &'a ProtocolEntry>,
    {
        let mut registry = Registry::new();
        registry.extend_entries(entries)?;
        Ok(registry)
    }

    /// Register every row (and its aliases) on top of the current contents.
    pub fn extend_entries<'a, I>(&mut self, entries: I) -> crate::error::Result<()>
    where
        I: IntoIterator<Item = &'a ProtocolEntry>,
    {
        for entry in entries {
            self.register_protocol(entry.to_protocol()?)?;
            for alias in &entry.aliases {
                self.register_alias(alias, entry.code)?;
            }
        }
        Ok(())
    }

    /// The registry contents as table rows, aliases attached to their code.
    pub fn entries(&self) -> Vec<ProtocolEntry> {
        let aliases = self.aliases();
        self.iter()
            .map(|protocol| {
                let mut entry = ProtocolEntry::from(protocol);
                entry.aliases = aliases
                    .iter()
                    .filter(|(_, code)| *code == protocol.code)
                    .map(|(name, _)| name.to_string())
                    .collect();
                entry
            })
            .collect()
    }
}

/// The built-in table as configuration rows.
pub fn builtin_entries() -> Vec<ProtocolEntry> {
    BUILTIN_TABLE
        .iter()
        .map(|&(code, size, name, resolvable, path)| ProtocolEntry {
            code,
            size,
            name: name.to_string(),
            resolvable,
            path,
            format: None,
            aliases: BUILTIN_ALIASES
                .iter()
                .filter(|(_, target)| *target == code)
                .map(|(alias, _)| alias.to_string())
                .collect(),
        })
        .collect()
}
