//! # Serialization Formats
//!
//! serde support for [`Multiaddr`] and format selection for the crate's
//! serializable types.
//!
//! A multiaddr serializes as its text form in human-readable formats (JSON,
//! TOML) and as its canonical bytes in binary formats (bincode).
//!
//! ## Usage
//! ```rust
//! use multiaddr_core::core::serialization::{MultiFormat, SerializationFormat};
//! use multiaddr_core::Multiaddr;
//!
//! let addr: Multiaddr = "/ip4/127.0.0.1/tcp/80".parse().unwrap();
//! let json = addr.serialize_format(SerializationFormat::Json).unwrap();
//! assert_eq!(json, br#""/ip4/127.0.0.1/tcp/80""#);
//! ```

use crate::error::{MultiaddrError, Result};
use crate::multiaddr::Multiaddr;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerializationFormat {
    /// Binary compact format (default)
    #[default]
    Bincode,
    /// Human-readable JSON format
    Json,
}

impl SerializationFormat {
    /// Get the format identifier byte
    pub fn format_byte(self) -> u8 {
        match self {
            SerializationFormat::Bincode => 0x01,
            SerializationFormat::Json => 0x02,
        }
    }

    /// Detect format from identifier byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(SerializationFormat::Bincode),
            0x02 => Some(SerializationFormat::Json),
            _ => None,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            SerializationFormat::Bincode => "Bincode",
            SerializationFormat::Json => "JSON",
        }
    }
}

/// Trait for types that support multiple serialization formats
pub trait MultiFormat: Serialize + for<'de> Deserialize<'de> + Sized {
    /// Serialize to bytes using the specified format
    fn serialize_format(&self, format: SerializationFormat) -> Result<Vec<u8>> {
        match format {
            SerializationFormat::Bincode => bincode::serialize(self)
                .map_err(|e| MultiaddrError::SerializationError(e.to_string())),
            SerializationFormat::Json => serde_json::to_vec(self)
                .map_err(|e| MultiaddrError::SerializationError(e.to_string())),
        }
    }

    /// Serialize to bytes with format header
    fn serialize_with_header(&self, format: SerializationFormat) -> Result<Vec<u8>> {
        let mut data = vec![format.format_byte()];
        data.extend(self.serialize_format(format)?);
        Ok(data)
    }

    /// Deserialize from bytes using the specified format
    fn deserialize_format(data: &[u8], format: SerializationFormat) -> Result<Self> {
        match format {
            SerializationFormat::Bincode => bincode::deserialize(data)
                .map_err(|e| MultiaddrError::SerializationError(e.to_string())),
            SerializationFormat::Json => serde_json::from_slice(data)
                .map_err(|e| MultiaddrError::SerializationError(e.to_string())),
        }
    }

    /// Deserialize from bytes with format header
    fn deserialize_with_header(data: &[u8]) -> Result<(Self, SerializationFormat)> {
        let (&first, rest) = data
            .split_first()
            .ok_or_else(|| MultiaddrError::SerializationError("Empty data".to_string()))?;

        let format = SerializationFormat::from_byte(first).ok_or_else(|| {
            MultiaddrError::SerializationError(format!("Unknown format byte: {first}"))
        })?;

        let value = Self::deserialize_format(rest, format)?;
        Ok((value, format))
    }
}

impl MultiFormat for Multiaddr {}
impl MultiFormat for crate::multiaddr::NodeAddress {}
impl MultiFormat for crate::multiaddr::NetOptions {}

impl Serialize for Multiaddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_bytes(self.as_bytes())
        }
    }
}

struct MultiaddrVisitor;

impl<'de> Visitor<'de> for MultiaddrVisitor {
    type Value = Multiaddr;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a multiaddr string or its canonical bytes")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Multiaddr, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<Multiaddr, E> {
        Multiaddr::from_bytes(v.to_vec()).map_err(E::custom)
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> std::result::Result<Multiaddr, E> {
        Multiaddr::from_bytes(v).map_err(E::custom)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Multiaddr, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        Multiaddr::from_bytes(bytes).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Multiaddr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(MultiaddrVisitor)
        } else {
            deserializer.deserialize_byte_buf(MultiaddrVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::expect_used)]
    fn test_format_byte_roundtrip() {
        for format in &[SerializationFormat::Bincode, SerializationFormat::Json] {
            let byte = format.format_byte();
            let recovered = SerializationFormat::from_byte(byte).expect("valid format byte");
            assert_eq!(*format, recovered);
        }
        assert_eq!(SerializationFormat::from_byte(0x03), None);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(SerializationFormat::Bincode.name(), "Bincode");
        assert_eq!(SerializationFormat::Json.name(), "JSON");
    }

    #[test]
    fn test_default_format() {
        assert_eq!(SerializationFormat::default(), SerializationFormat::Bincode);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_json_is_text_form() {
        let addr: Multiaddr = "/ip4/10.0.0.1/udp/53".parse().expect("parse");
        let json = serde_json::to_string(&addr).expect("serialize");
        assert_eq!(json, "\"/ip4/10.0.0.1/udp/53\"");
        let recovered: Multiaddr = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(addr, recovered);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_bincode_is_canonical_bytes() {
        let addr: Multiaddr = "/ip4/10.0.0.1/udp/53".parse().expect("parse");
        let encoded = bincode::serialize(&addr).expect("serialize");
        // u64 length prefix, then the canonical bytes
        assert_eq!(&encoded[8..], addr.as_bytes());
        let recovered: Multiaddr = bincode::deserialize(&encoded).expect("deserialize");
        assert_eq!(addr, recovered);
    }

    #[test]
    fn test_invalid_payloads_rejected() {
        assert!(serde_json::from_str::<Multiaddr>("\"/nope/1\"").is_err());
        assert!(Multiaddr::deserialize_with_header(&[]).is_err());
        assert!(Multiaddr::deserialize_with_header(&[0x09, 0x00]).is_err());
    }
}
