//! Per-protocol value codecs.
//!
//! Each [`ValueFormat`] maps one textual spelling to raw value bytes and back.
//! Normalization rules:
//! - IPv4 literals must be plain dotted-quad; leading zeros are rejected.
//! - IPv6 literals are case-insensitive and printed in compressed lowercase form.
//! - Ports accept leading zeros (`0080` parses as `80`) but no sign.
//! - Paths are percent-decoded on input and percent-encoded as a single
//!   component on output, so `/` is written as `%2F`.

use crate::error::{constants, MultiaddrError, Result};
use crate::protocol::{Protocol, ValueFormat};
use data_encoding::{Encoding, BASE32_NOPAD};
use once_cell::sync::Lazy;
use std::net::{Ipv4Addr, Ipv6Addr};

const ONION_HOST_CHARS: usize = 16;
const ONION_HOST_BYTES: usize = 10;
const ONION3_HOST_CHARS: usize = 56;
const ONION3_HOST_BYTES: usize = 35;

/// Smallest decoded I2P destination accepted for garlic64.
pub const GARLIC64_MIN_BYTES: usize = 386;

static GARLIC64: Lazy<Option<Encoding>> = Lazy::new(|| {
    let mut spec = data_encoding::Specification::new();
    spec.symbols
        .push_str("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-~");
    spec.padding = Some('=');
    spec.encoding().ok()
});

fn invalid(protocol: &Protocol, reason: impl std::fmt::Display) -> MultiaddrError {
    MultiaddrError::InvalidFormat(format!("{}: {reason}", protocol.name))
}

/// Parse the textual value of `protocol` into raw bytes.
pub fn value_from_str(protocol: &Protocol, text: &str) -> Result<Vec<u8>> {
    match protocol.format {
        ValueFormat::None => {
            if text.is_empty() {
                Ok(Vec::new())
            } else {
                Err(invalid(protocol, "protocol takes no value"))
            }
        }
        ValueFormat::Ip4 => text
            .parse::<Ipv4Addr>()
            .map(|ip| ip.octets().to_vec())
            .map_err(|e| invalid(protocol, format!("'{text}': {e}"))),
        ValueFormat::Ip6 => text
            .parse::<Ipv6Addr>()
            .map(|ip| ip.octets().to_vec())
            .map_err(|e| invalid(protocol, format!("'{text}': {e}"))),
        ValueFormat::Port => parse_port(text)
            .map(|port| port.to_be_bytes().to_vec())
            .ok_or_else(|| invalid(protocol, format!("'{text}': {}", constants::ERR_INVALID_PORT))),
        ValueFormat::Text => {
            if text.is_empty() {
                return Err(invalid(protocol, constants::ERR_EMPTY_VALUE));
            }
            Ok(text.as_bytes().to_vec())
        }
        ValueFormat::Base58 => {
            if text.is_empty() {
                return Err(invalid(protocol, constants::ERR_EMPTY_VALUE));
            }
            bs58::decode(text)
                .into_vec()
                .map_err(|e| invalid(protocol, format!("'{text}': {e}")))
        }
        ValueFormat::Onion => onion_from_str(protocol, text, ONION_HOST_CHARS),
        ValueFormat::Onion3 => onion_from_str(protocol, text, ONION3_HOST_CHARS),
        ValueFormat::Garlic64 => {
            let encoding = GARLIC64
                .as_ref()
                .ok_or_else(|| invalid(protocol, "garlic64 alphabet unavailable"))?;
            let bytes = encoding
                .decode(text.as_bytes())
                .map_err(|e| invalid(protocol, e))?;
            if bytes.len() < GARLIC64_MIN_BYTES {
                return Err(invalid(
                    protocol,
                    format!("destination too short ({} bytes)", bytes.len()),
                ));
            }
            Ok(bytes)
        }
        ValueFormat::Path => {
            if text.is_empty() {
                return Err(invalid(protocol, constants::ERR_EMPTY_VALUE));
            }
            let decoded = percent_decode(text).map_err(|reason| invalid(protocol, reason))?;
            std::str::from_utf8(&decoded)
                .map_err(|_| invalid(protocol, constants::ERR_INVALID_UTF8))?;
            Ok(decoded)
        }
        ValueFormat::Hex => hex::decode(text).map_err(|e| invalid(protocol, e)),
    }
}

/// Render raw value bytes of `protocol` as text.
///
/// Fails on bytes that no textual spelling maps to, so a value accepted here
/// always parses back to the same bytes.
pub fn value_to_string(protocol: &Protocol, value: &[u8]) -> Result<String> {
    match protocol.format {
        ValueFormat::None => {
            if value.is_empty() {
                Ok(String::new())
            } else {
                Err(invalid(protocol, "protocol takes no value"))
            }
        }
        ValueFormat::Ip4 => {
            let octets: [u8; 4] = value.try_into().map_err(|_| len_error(protocol, 4, value))?;
            Ok(Ipv4Addr::from(octets).to_string())
        }
        ValueFormat::Ip6 => {
            let octets: [u8; 16] = value
                .try_into()
                .map_err(|_| len_error(protocol, 16, value))?;
            Ok(Ipv6Addr::from(octets).to_string())
        }
        ValueFormat::Port => Ok(port_from_bytes(protocol, value)?.to_string()),
        ValueFormat::Text => {
            let text = std::str::from_utf8(value)
                .map_err(|_| invalid(protocol, constants::ERR_INVALID_UTF8))?;
            if text.is_empty() {
                return Err(invalid(protocol, constants::ERR_EMPTY_VALUE));
            }
            if text.contains('/') {
                return Err(invalid(protocol, constants::ERR_SLASH_IN_VALUE));
            }
            Ok(text.to_string())
        }
        ValueFormat::Base58 => {
            if value.is_empty() {
                return Err(invalid(protocol, constants::ERR_EMPTY_VALUE));
            }
            Ok(bs58::encode(value).into_string())
        }
        ValueFormat::Onion => onion_to_string(protocol, value, ONION_HOST_BYTES),
        ValueFormat::Onion3 => onion_to_string(protocol, value, ONION3_HOST_BYTES),
        ValueFormat::Garlic64 => {
            if value.len() < GARLIC64_MIN_BYTES {
                return Err(invalid(
                    protocol,
                    format!("destination too short ({} bytes)", value.len()),
                ));
            }
            let encoding = GARLIC64
                .as_ref()
                .ok_or_else(|| invalid(protocol, "garlic64 alphabet unavailable"))?;
            Ok(encoding.encode(value))
        }
        ValueFormat::Path => {
            let path = std::str::from_utf8(value)
                .map_err(|_| invalid(protocol, constants::ERR_INVALID_UTF8))?;
            if path.is_empty() {
                return Err(invalid(protocol, constants::ERR_EMPTY_VALUE));
            }
            Ok(percent_encode(path))
        }
        ValueFormat::Hex => {
            if value.is_empty() {
                return Err(invalid(protocol, constants::ERR_EMPTY_VALUE));
            }
            Ok(hex::encode(value))
        }
    }
}

/// Decimal port number, leading zeros allowed, no sign.
pub fn parse_port(text: &str) -> Option<u16> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

pub(crate) fn port_from_bytes(protocol: &Protocol, value: &[u8]) -> Result<u16> {
    let raw: [u8; 2] = value.try_into().map_err(|_| len_error(protocol, 2, value))?;
    Ok(u16::from_be_bytes(raw))
}

fn len_error(protocol: &Protocol, expected: usize, value: &[u8]) -> MultiaddrError {
    MultiaddrError::InvalidAddressLength(format!(
        "{}: expected {expected} bytes, got {}",
        protocol.name,
        value.len()
    ))
}

fn onion_from_str(protocol: &Protocol, text: &str, host_chars: usize) -> Result<Vec<u8>> {
    let (host, port) = text
        .split_once(':')
        .ok_or_else(|| invalid(protocol, format!("'{text}' does not contain a port number")))?;

    if host.len() != host_chars {
        return Err(invalid(
            protocol,
            format!("host must be {host_chars} characters, got {}", host.len()),
        ));
    }

    let mut bytes = BASE32_NOPAD
        .decode(host.to_ascii_uppercase().as_bytes())
        .map_err(|e| invalid(protocol, e))?;

    let port = parse_port(port)
        .filter(|p| *p >= 1)
        .ok_or_else(|| invalid(protocol, constants::ERR_ONION_PORT))?;
    bytes.extend_from_slice(&port.to_be_bytes());
    Ok(bytes)
}

fn onion_to_string(protocol: &Protocol, value: &[u8], host_bytes: usize) -> Result<String> {
    if value.len() != host_bytes + 2 {
        return Err(len_error(protocol, host_bytes + 2, value));
    }
    let (host, port) = value.split_at(host_bytes);
    let port = u16::from_be_bytes([port[0], port[1]]);
    if port == 0 {
        return Err(invalid(protocol, constants::ERR_ONION_PORT));
    }
    Ok(format!(
        "{}:{port}",
        BASE32_NOPAD.encode(host).to_ascii_lowercase()
    ))
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(byte, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
}

/// Percent-encode everything outside the URI component unreserved set.
pub fn percent_encode(text: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(text.len());
    for &byte in text.as_bytes() {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX[(byte >> 4) as usize] as char);
            out.push(HEX[(byte & 0x0f) as usize] as char);
        }
    }
    out
}

/// Decode `%XX` escapes; other bytes pass through unchanged.
pub fn percent_decode(text: &str) -> std::result::Result<Vec<u8>, &'static str> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes
                .get(i + 1..i + 3)
                .ok_or(constants::ERR_INVALID_PERCENT)?;
            let decoded = hex::decode(escape).map_err(|_| constants::ERR_INVALID_PERCENT)?;
            out.extend_from_slice(&decoded);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}
