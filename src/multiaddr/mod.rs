//! # Multiaddr Value
//!
//! Immutable, self-describing network address.
//!
//! A [`Multiaddr`] holds only its canonical bytes. Segments, the text form and
//! every structural view are derived on demand through the codecs in
//! [`crate::core`], using the process-wide protocol registry. Operations that
//! "modify" an address return a new value.
//!
//! ```rust
//! use multiaddr_core::Multiaddr;
//!
//! let base: Multiaddr = "/ip4/127.0.0.1/tcp/4001".parse().unwrap();
//! let peer: Multiaddr = "/p2p/QmNnooDu7bfjPFoTZYxMNLWUQJyrVwtbZg5gBMjTezGAJN".parse().unwrap();
//!
//! let full = base.encapsulate(&peer);
//! assert_eq!(full.peer_id().as_deref(), Some("QmNnooDu7bfjPFoTZYxMNLWUQJyrVwtbZg5gBMjTezGAJN"));
//! assert_eq!(full.decapsulate_code(421), base);
//! ```

mod net;

pub use net::{Family, NetOptions, NodeAddress};

use crate::core::{binary, convert, text, Segment};
use crate::error::{MultiaddrError, Result};
use crate::protocol::table::PEER_ID_CODES;
use crate::protocol::{self, Protocol, Registry, ValueFormat};
use crate::utils::metrics::global_metrics;
use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Self-describing composed network address.
///
/// Equality, ordering and hashing use the canonical bytes.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Multiaddr {
    bytes: Bytes,
}

/// Value half of a [`Multiaddr::string_tuples`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TupleValue {
    Number(u64),
    Text(String),
}

impl fmt::Display for TupleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TupleValue::Number(n) => write!(f, "{n}"),
            TupleValue::Text(s) => f.write_str(s),
        }
    }
}

impl Multiaddr {
    /// The address with no segments.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the text form.
    pub fn parse(text: &str) -> Result<Self> {
        record(Self::parse_with(protocol::registry(), text))
    }

    /// Validate and wrap canonical bytes.
    ///
    /// Every value must also have a text form, so [`fmt::Display`] cannot fail
    /// on a constructed address.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Result<Self> {
        record(Self::from_bytes_with(protocol::registry(), bytes.into()))
    }

    fn parse_with(registry: &Registry, text: &str) -> Result<Self> {
        let segments = text::string_to_segments(registry, text)?;
        let bytes = binary::segments_to_bytes(&segments)?;
        Ok(Self {
            bytes: Bytes::from(bytes),
        })
    }

    fn from_bytes_with(registry: &Registry, bytes: Bytes) -> Result<Self> {
        for segment in binary::bytes_to_segments(registry, &bytes)? {
            segment.value_string()?;
        }
        Ok(Self { bytes })
    }

    /// Encode segments resolved against the process-wide registry.
    ///
    /// Each segment's descriptor must be the one the registry holds for its
    /// code, and each value must have a text form.
    ///
    /// # Errors
    /// - `InvalidProtocol` for a descriptor the registry does not hold
    /// - the value codec's error for a value with no text form
    pub fn from_segments(segments: &[Segment<'_>]) -> Result<Self> {
        let registry = protocol::registry();
        for segment in segments {
            if registry.get(u64::from(segment.code())) != Some(segment.protocol) {
                return Err(MultiaddrError::InvalidProtocol(u64::from(segment.code())));
            }
        }
        let bytes = binary::segments_to_bytes(segments)?;
        Self::from_bytes_with(registry, Bytes::from(bytes))
    }

    /// Canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Canonical bytes as an owned buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Canonical bytes without copying.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Segments in left-to-right order.
    pub fn iter(&self) -> Segments<'_> {
        Segments {
            bytes: &self.bytes,
            offset: 0,
            registry: protocol::registry(),
        }
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Descriptors of every segment, left to right.
    pub fn protos(&self) -> Vec<&'static Protocol> {
        self.iter().map(|s| s.protocol).collect()
    }

    pub fn proto_codes(&self) -> Vec<u32> {
        self.iter().map(|s| s.code()).collect()
    }

    pub fn proto_names(&self) -> Vec<&'static str> {
        self.iter().map(|s| s.protocol.name.as_str()).collect()
    }

    /// `(code, raw value)` pairs, left to right.
    pub fn tuples(&self) -> Vec<(u32, Bytes)> {
        self.iter().map(|s| (s.code(), s.value)).collect()
    }

    /// `(code, value)` pairs with values in their text or numeric form.
    ///
    /// Ports are numbers; every other value is text. Protocols without a value
    /// carry `None`.
    pub fn string_tuples(&self) -> Vec<(u32, Option<TupleValue>)> {
        self.iter()
            .map(|s| (s.code(), tuple_value(&s)))
            .collect()
    }

    /// Append `other`'s segments after this address's segments.
    ///
    /// Any two valid addresses concatenate to a valid address; whether the
    /// resulting protocol stack makes sense is not checked.
    pub fn encapsulate(&self, other: &Multiaddr) -> Multiaddr {
        let mut buf = BytesMut::with_capacity(self.bytes.len() + other.bytes.len());
        buf.extend_from_slice(&self.bytes);
        buf.extend_from_slice(&other.bytes);
        Multiaddr {
            bytes: buf.freeze(),
        }
    }

    /// Remove the last textual occurrence of `other` and everything after it.
    ///
    /// The match is a substring search on the text forms, not a structural
    /// comparison: `/ip4/1.2.3.4/tcp/8080` decapsulated by `/tcp/80` leaves
    /// `/ip4/1.2.3.4`. If `other` does not occur, a copy of `self` is returned.
    ///
    /// # Errors
    /// Fails when the text before the match does not parse as a multiaddr.
    pub fn decapsulate(&self, other: &Multiaddr) -> Result<Multiaddr> {
        let this = self.to_string();
        let needle = other.to_string();
        match this.rfind(&needle) {
            Some(index) => Multiaddr::parse(&this[..index]),
            None => Ok(self.clone()),
        }
    }

    /// Drop the last segment with protocol `code` and every segment after it.
    ///
    /// Returns a copy of `self` when `code` does not occur.
    pub fn decapsulate_code(&self, code: u32) -> Multiaddr {
        let mut cut = None;
        for (start, segment) in self.iter_offsets() {
            if segment.code() == code {
                cut = Some(start);
            }
        }
        match cut {
            Some(start) => Multiaddr {
                bytes: self.bytes.slice(..start),
            },
            None => self.clone(),
        }
    }

    /// Base58btc peer id from the last peer-identity segment.
    pub fn peer_id(&self) -> Option<String> {
        self.iter()
            .filter(|s| PEER_ID_CODES.contains(&s.code()))
            .last()
            .map(|s| bs58::encode(&s.value).into_string())
    }

    /// Value of the last path segment.
    pub fn path(&self) -> Option<String> {
        self.iter()
            .filter(|s| s.protocol.path)
            .last()
            .and_then(|s| String::from_utf8(s.value.to_vec()).ok())
    }

    /// Whether any segment needs external name resolution.
    pub fn is_name(&self) -> bool {
        self.iter().any(|s| s.protocol.resolvable)
    }

    /// Whether `other`'s segments form a prefix of this address.
    pub fn starts_with(&self, other: &Multiaddr) -> bool {
        // Both are canonical, so a byte prefix always ends on a segment boundary.
        self.bytes.starts_with(&other.bytes)
    }

    /// Whether `other`'s segments form a suffix of this address.
    pub fn ends_with(&self, other: &Multiaddr) -> bool {
        let ours: Vec<Segment<'_>> = self.iter().collect();
        let theirs: Vec<Segment<'_>> = other.iter().collect();
        ours.ends_with(&theirs)
    }

    /// JSON form (a string).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| MultiaddrError::SerializationError(e.to_string()))
    }

    fn iter_offsets(&self) -> impl Iterator<Item = (usize, Segment<'static>)> + '_ {
        let registry = protocol::registry();
        let mut offset = 0;
        std::iter::from_fn(move || {
            if offset >= self.bytes.len() {
                return None;
            }
            let start = offset;
            let (segment, next) = binary::decode_segment(registry, &self.bytes, offset).ok()?;
            offset = next;
            Some((start, segment))
        })
    }
}

fn tuple_value(segment: &Segment<'_>) -> Option<TupleValue> {
    if !segment.protocol.has_value() {
        return None;
    }
    if segment.protocol.format == ValueFormat::Port {
        return convert::port_from_bytes(segment.protocol, &segment.value)
            .ok()
            .map(|port| TupleValue::Number(u64::from(port)));
    }
    convert::value_to_string(segment.protocol, &segment.value)
        .ok()
        .map(TupleValue::Text)
}

fn record(result: Result<Multiaddr>) -> Result<Multiaddr> {
    let metrics = global_metrics();
    match &result {
        Ok(_) => metrics.address_parsed(),
        Err(_) => metrics.parse_error(),
    }
    result
}

/// Iterator over the segments of a [`Multiaddr`].
///
/// Bytes are validated when the address is built, so decoding here cannot
/// fail; iteration simply ends at the last segment.
pub struct Segments<'a> {
    bytes: &'a Bytes,
    offset: usize,
    registry: &'static Registry,
}

impl Iterator for Segments<'_> {
    type Item = Segment<'static>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.bytes.len() {
            return None;
        }
        let (segment, next) = binary::decode_segment(self.registry, self.bytes, self.offset).ok()?;
        self.offset = next;
        Some(segment)
    }
}

impl<'a> IntoIterator for &'a Multiaddr {
    type Item = Segment<'static>;
    type IntoIter = Segments<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Multiaddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self {
            text::write_segment(f, &segment).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Multiaddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Multiaddr {} - {}>", hex::encode(&self.bytes), self)
    }
}

impl FromStr for Multiaddr {
    type Err = MultiaddrError;

    fn from_str(s: &str) -> Result<Self> {
        Multiaddr::parse(s)
    }
}

impl TryFrom<&str> for Multiaddr {
    type Error = MultiaddrError;

    fn try_from(value: &str) -> Result<Self> {
        Multiaddr::parse(value)
    }
}

impl TryFrom<String> for Multiaddr {
    type Error = MultiaddrError;

    fn try_from(value: String) -> Result<Self> {
        Multiaddr::parse(&value)
    }
}

impl TryFrom<&[u8]> for Multiaddr {
    type Error = MultiaddrError;

    fn try_from(value: &[u8]) -> Result<Self> {
        Multiaddr::from_bytes(value.to_vec())
    }
}

impl TryFrom<Vec<u8>> for Multiaddr {
    type Error = MultiaddrError;

    fn try_from(value: Vec<u8>) -> Result<Self> {
        Multiaddr::from_bytes(value)
    }
}

impl TryFrom<Bytes> for Multiaddr {
    type Error = MultiaddrError;

    fn try_from(value: Bytes) -> Result<Self> {
        Multiaddr::from_bytes(value)
    }
}

impl AsRef<[u8]> for Multiaddr {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Multiaddr> for Vec<u8> {
    fn from(addr: Multiaddr) -> Self {
        addr.to_bytes()
    }
}
