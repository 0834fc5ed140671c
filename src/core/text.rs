//! `/name/value/...` text form <-> segment sequence.

use super::{convert, Segment};
use crate::error::{constants, MultiaddrError, Result};
use crate::protocol::Registry;
use bytes::Bytes;
use std::fmt::Write;

/// Parse the text form into segments.
///
/// The empty string and `/` yield no segments. Empty components (doubled or
/// trailing slashes) are skipped. A path protocol consumes the rest of the
/// input as its value.
pub fn string_to_segments<'r>(registry: &'r Registry, text: &str) -> Result<Vec<Segment<'r>>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let rest = text.strip_prefix('/').ok_or_else(|| {
        MultiaddrError::InvalidFormat(format!("'{text}': {}", constants::ERR_MISSING_LEADING_SLASH))
    })?;

    let parts: Vec<&str> = rest.split('/').filter(|p| !p.is_empty()).collect();
    let mut segments = Vec::with_capacity(parts.len().div_ceil(2));

    let mut i = 0;
    while i < parts.len() {
        let name = parts[i];
        let protocol = registry.by_name(name)?;
        i += 1;

        if !protocol.has_value() {
            segments.push(Segment::new(protocol, Bytes::new()));
            continue;
        }

        if i >= parts.len() {
            return Err(MultiaddrError::InvalidFormat(format!(
                "{name}: {}",
                constants::ERR_MISSING_VALUE
            )));
        }

        let value = if protocol.path {
            let joined = parts[i..].join("/");
            i = parts.len();
            convert::value_from_str(protocol, &joined)?
        } else {
            i += 1;
            convert::value_from_str(protocol, parts[i - 1])?
        };

        protocol.check_len(value.len())?;
        segments.push(Segment::new(protocol, value));
    }

    Ok(segments)
}

/// Write the text form of `segments` into `out`.
pub fn write_segments<W: Write>(out: &mut W, segments: &[Segment<'_>]) -> Result<()> {
    for segment in segments {
        write_segment(out, segment)?;
    }
    Ok(())
}

pub(crate) fn write_segment<W: Write>(out: &mut W, segment: &Segment<'_>) -> Result<()> {
    let fmt_err = |_| MultiaddrError::Custom("Failed to write multiaddr text".to_string());

    write!(out, "/{}", segment.protocol.name).map_err(fmt_err)?;
    if let Some(value) = segment.value_string()? {
        write!(out, "/{value}").map_err(fmt_err)?;
    }
    Ok(())
}

/// Render segments as text.
pub fn segments_to_string(segments: &[Segment<'_>]) -> Result<String> {
    let mut out = String::new();
    write_segments(&mut out, segments)?;
    Ok(out)
}
