//! # Protocol Descriptors
//!
//! [`Protocol`] rows and the [`Registry`] that maps codes and names to them.
//!
//! Sizes follow the table convention: bits for fixed values, `0` for none,
//! `-1` for a varint length prefix.

use crate::error::{MultiaddrError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

/// Size sentinel in table entries meaning "variable, length-prefixed".
pub const VARIABLE_SIZE: i32 = -1;

/// How many address bytes follow a protocol code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressSize {
    /// The protocol carries no address value.
    Zero,
    /// A fixed number of bits, no length prefix on the wire.
    Fixed(u32),
    /// A varint byte length precedes the value.
    Variable,
}

impl AddressSize {
    /// Interpret a table size in bits.
    pub fn from_bits(bits: i32) -> Result<Self> {
        match bits {
            0 => Ok(AddressSize::Zero),
            VARIABLE_SIZE => Ok(AddressSize::Variable),
            n if n > 0 => Ok(AddressSize::Fixed(n as u32)),
            n => Err(MultiaddrError::ConfigError(format!(
                "Invalid protocol size: {n} (expected bits, 0, or {VARIABLE_SIZE})"
            ))),
        }
    }

    /// Size in bits as written in the table.
    pub fn bits(self) -> i32 {
        match self {
            AddressSize::Zero => 0,
            AddressSize::Fixed(bits) => bits as i32,
            AddressSize::Variable => VARIABLE_SIZE,
        }
    }
}

/// Textual codec applied to a protocol's address value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    None,
    Ip4,
    Ip6,
    /// Big-endian u16, decimal text
    Port,
    /// UTF-8 text without `/`
    Text,
    /// Base58btc, used for peer ids
    Base58,
    Onion,
    Onion3,
    Garlic64,
    /// Percent-encoded remainder of the address
    Path,
    Hex,
}

impl ValueFormat {
    /// Pick the codec for a protocol that does not name one explicitly.
    pub fn infer(name: &str, size: AddressSize, path: bool) -> Self {
        match name {
            "ip4" => ValueFormat::Ip4,
            "ip6" => ValueFormat::Ip6,
            "tcp" | "udp" | "dccp" | "sctp" => ValueFormat::Port,
            "p2p" | "ipfs" => ValueFormat::Base58,
            "onion" => ValueFormat::Onion,
            "onion3" => ValueFormat::Onion3,
            "garlic64" => ValueFormat::Garlic64,
            _ if path => ValueFormat::Path,
            _ => match size {
                AddressSize::Zero => ValueFormat::None,
                AddressSize::Variable => ValueFormat::Text,
                AddressSize::Fixed(_) => ValueFormat::Hex,
            },
        }
    }

    /// Size in bits the codec requires, `None` for any fixed or variable size.
    fn required_size(self) -> Option<AddressSize> {
        match self {
            ValueFormat::None => Some(AddressSize::Zero),
            ValueFormat::Ip4 => Some(AddressSize::Fixed(32)),
            ValueFormat::Ip6 => Some(AddressSize::Fixed(128)),
            ValueFormat::Port => Some(AddressSize::Fixed(16)),
            ValueFormat::Onion => Some(AddressSize::Fixed(96)),
            ValueFormat::Onion3 => Some(AddressSize::Fixed(296)),
            ValueFormat::Text | ValueFormat::Base58 | ValueFormat::Garlic64 | ValueFormat::Path => {
                Some(AddressSize::Variable)
            }
            ValueFormat::Hex => None,
        }
    }

    /// Verify the codec can carry values of `size`.
    ///
    /// # Errors
    /// Returns `ConfigError` when values of that size would not survive a
    /// text round trip.
    pub fn check_size(self, name: &str, size: AddressSize) -> Result<()> {
        let fits = match self.required_size() {
            Some(required) => required == size,
            None => size != AddressSize::Zero,
        };
        if fits {
            Ok(())
        } else {
            Err(MultiaddrError::ConfigError(format!(
                "Protocol '{name}': value format {self:?} cannot carry size {}",
                size.bits()
            )))
        }
    }
}

/// Immutable protocol descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Protocol {
    pub code: u32,
    pub size: AddressSize,
    pub name: String,
    pub resolvable: bool,
    pub path: bool,
    pub format: ValueFormat,
}

impl Protocol {
    /// Build a descriptor from a table row, inferring the value format.
    pub fn new(code: u32, size: i32, name: &str, resolvable: bool, path: bool) -> Result<Self> {
        let size = AddressSize::from_bits(size)?;
        Ok(Self {
            code,
            size,
            name: name.to_string(),
            resolvable,
            path,
            format: ValueFormat::infer(name, size, path),
        })
    }

    /// Byte length of a fixed-size value.
    ///
    /// Returns `None` for variable-size protocols.
    ///
    /// # Errors
    /// Returns `InvalidAddressLength` if the declared size is not a whole number of bytes.
    pub fn fixed_len(&self) -> Result<Option<usize>> {
        match self.size {
            AddressSize::Zero => Ok(Some(0)),
            AddressSize::Variable => Ok(None),
            AddressSize::Fixed(bits) if bits % 8 == 0 => Ok(Some((bits / 8) as usize)),
            AddressSize::Fixed(bits) => Err(MultiaddrError::InvalidAddressLength(format!(
                "{}: {bits} bits is not a whole number of bytes",
                self.name
            ))),
        }
    }

    /// Verify that a value of `len` bytes fits this protocol.
    pub fn check_len(&self, len: usize) -> Result<()> {
        match self.fixed_len()? {
            Some(expected) if expected != len => Err(MultiaddrError::InvalidAddressLength(
                format!("{}: expected {expected} bytes, got {len}", self.name),
            )),
            _ => Ok(()),
        }
    }

    /// Whether the protocol carries an address value at all.
    pub fn has_value(&self) -> bool {
        self.size != AddressSize::Zero
    }
}

/// Lookup table from protocol code and name to descriptor.
///
/// Built once at startup, read-only afterwards. Names include aliases, which
/// resolve to the descriptor registered under the aliased code.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    by_code: HashMap<u32, Protocol>,
    by_name: HashMap<Cow<'static, str>, u32>,
    order: Vec<u32>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a protocol from the classic table row shape.
    ///
    /// # Errors
    /// Returns `DuplicateProtocol` if the code or name is already taken.
    pub fn register(
        &mut self,
        code: u32,
        size: i32,
        name: &str,
        resolvable: bool,
        path: bool,
    ) -> Result<&Protocol> {
        let protocol = Protocol::new(code, size, name, resolvable, path)?;
        self.register_protocol(protocol)
    }

    /// Register a fully specified descriptor.
    pub fn register_protocol(&mut self, protocol: Protocol) -> Result<&Protocol> {
        if self.by_code.contains_key(&protocol.code) {
            return Err(MultiaddrError::DuplicateProtocol(format!(
                "code {} already registered",
                protocol.code
            )));
        }
        if self.by_name.contains_key(protocol.name.as_str()) {
            return Err(MultiaddrError::DuplicateProtocol(format!(
                "name '{}' already registered",
                protocol.name
            )));
        }

        debug!(code = protocol.code, name = %protocol.name, "Registering protocol");
        Ok(self.insert(protocol))
    }

    /// Register an additional name for an existing code.
    ///
    /// The alias parses to the same descriptor; text output always uses the
    /// descriptor's primary name.
    pub fn register_alias(&mut self, alias: &str, code: u32) -> Result<&Protocol> {
        if self.by_name.contains_key(alias) {
            return Err(MultiaddrError::DuplicateProtocol(format!(
                "name '{alias}' already registered"
            )));
        }
        if !self.by_code.contains_key(&code) {
            return Err(MultiaddrError::UnknownProtocol(code.to_string()));
        }

        debug!(alias, code, "Registering protocol alias");
        self.by_name.insert(Cow::Owned(alias.to_string()), code);
        self.by_code(code)
    }

    pub(crate) fn insert(&mut self, protocol: Protocol) -> &Protocol {
        let code = protocol.code;
        self.by_name.insert(Cow::Owned(protocol.name.clone()), code);
        self.order.push(code);
        self.by_code.entry(code).or_insert(protocol)
    }

    pub(crate) fn insert_alias(&mut self, alias: &'static str, code: u32) {
        self.by_name.insert(Cow::Borrowed(alias), code);
    }

    /// Look up a descriptor by code.
    pub fn by_code(&self, code: u32) -> Result<&Protocol> {
        self.by_code
            .get(&code)
            .ok_or_else(|| MultiaddrError::UnknownProtocol(code.to_string()))
    }

    /// Look up a descriptor by name or alias.
    pub fn by_name(&self, name: &str) -> Result<&Protocol> {
        self.by_name
            .get(name)
            .and_then(|code| self.by_code.get(code))
            .ok_or_else(|| MultiaddrError::UnknownProtocol(name.to_string()))
    }

    pub(crate) fn get(&self, code: u64) -> Option<&Protocol> {
        u32::try_from(code).ok().and_then(|c| self.by_code.get(&c))
    }

    /// Protocols in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Protocol> {
        self.order.iter().filter_map(|code| self.by_code.get(code))
    }

    /// Names registered as aliases, paired with their code.
    pub fn aliases(&self) -> Vec<(&str, u32)> {
        let mut aliases: Vec<(&str, u32)> = Vec::new();
        for (name, &code) in &self.by_name {
            let name: &str = name;
            if self.by_code.get(&code).is_some_and(|p| p.name != name) {
                aliases.push((name, code));
            }
        }
        aliases.sort_unstable();
        aliases
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
