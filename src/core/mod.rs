//! # Core Codecs
//!
//! Transcoding between the two canonical representations of a multiaddr and
//! the ordered segment sequence both describe.
//!
//! ## Components
//! - **Varint**: unsigned LEB128-style integers for codes and length prefixes
//! - **Binary**: canonical bytes <-> segments
//! - **Text**: `/name/value/...` <-> segments
//! - **Convert**: per-protocol value codecs (IP literals, ports, base58, paths, ...)
//! - **Serialization**: serde support and format selection
//!
//! ## Wire Format
//! ```text
//! [varint(code)] [varint(len)]? [value(len)] ... repeated per segment
//! ```
//! The length prefix is present only for variable-size protocols.

pub mod binary;
pub mod convert;
pub mod serialization;
pub mod text;
pub mod varint;

use crate::protocol::Protocol;
use bytes::Bytes;

/// One `(protocol, raw value)` unit of a multiaddr.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment<'r> {
    pub protocol: &'r Protocol,
    pub value: Bytes,
}

impl<'r> Segment<'r> {
    pub fn new(protocol: &'r Protocol, value: impl Into<Bytes>) -> Self {
        Self {
            protocol,
            value: value.into(),
        }
    }

    pub fn code(&self) -> u32 {
        self.protocol.code
    }

    /// Text form of the value; `None` for protocols without a value.
    pub fn value_string(&self) -> crate::error::Result<Option<String>> {
        if !self.protocol.has_value() {
            return Ok(None);
        }
        convert::value_to_string(self.protocol, &self.value).map(Some)
    }
}
