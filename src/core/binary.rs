//! Canonical binary form <-> segment sequence.

use super::{varint, Segment};
use crate::error::{MultiaddrError, Result};
use crate::protocol::{AddressSize, Registry};
use bytes::Bytes;

/// Decode the segment starting at `offset`.
///
/// Returns the segment and the offset just past it. Values are zero-copy
/// slices of `buf`.
pub fn decode_segment<'r>(
    registry: &'r Registry,
    buf: &Bytes,
    offset: usize,
) -> Result<(Segment<'r>, usize)> {
    let (code, consumed) = varint::decode(buf, offset)?;
    let protocol = registry
        .get(code)
        .ok_or(MultiaddrError::InvalidProtocol(code))?;

    let mut start = offset + consumed;
    let len = match protocol.size {
        AddressSize::Variable => {
            let (len, consumed) = varint::decode(buf, start)?;
            start += consumed;
            usize::try_from(len).map_err(|_| MultiaddrError::Overflow)?
        }
        _ => protocol.fixed_len()?.unwrap_or(0),
    };

    let end = start.checked_add(len).ok_or(MultiaddrError::Overflow)?;
    if end > buf.len() {
        return Err(MultiaddrError::Truncated);
    }

    Ok((Segment::new(protocol, buf.slice(start..end)), end))
}

/// Decode a full byte string into its segments.
pub fn bytes_to_segments<'r>(registry: &'r Registry, buf: &Bytes) -> Result<Vec<Segment<'r>>> {
    let mut segments = Vec::new();
    let mut offset = 0;
    while offset < buf.len() {
        let (segment, next) = decode_segment(registry, buf, offset)?;
        segments.push(segment);
        offset = next;
    }
    Ok(segments)
}

/// Append one segment's wire encoding to `out`.
pub fn encode_segment(segment: &Segment<'_>, out: &mut Vec<u8>) -> Result<()> {
    let protocol = segment.protocol;
    varint::encode_into(u64::from(protocol.code), out)?;

    match protocol.size {
        AddressSize::Variable => {
            varint::encode_into(segment.value.len() as u64, out)?;
        }
        _ => protocol.check_len(segment.value.len())?,
    }

    out.extend_from_slice(&segment.value);
    Ok(())
}

/// Encode segments into canonical bytes.
pub fn segments_to_bytes(segments: &[Segment<'_>]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(segments.iter().map(|s| s.value.len() + 4).sum());
    for segment in segments {
        encode_segment(segment, &mut out)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::protocol::table::{IP4, TCP, UNIX};

    fn registry() -> Registry {
        Registry::builtin()
    }

    #[test]
    fn test_decode_ip4_tcp() {
        let registry = registry();
        let buf = Bytes::from_static(&[0x04, 127, 0, 0, 1, 0x06, 0x00, 0x50]);
        let segments = bytes_to_segments(&registry, &buf).expect("valid bytes");

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].code(), IP4);
        assert_eq!(&segments[0].value[..], &[127, 0, 0, 1]);
        assert_eq!(segments[1].code(), TCP);
        assert_eq!(&segments[1].value[..], &[0x00, 0x50]);

        assert_eq!(segments_to_bytes(&segments).unwrap(), buf.to_vec());
    }

    #[test]
    fn test_variable_length_prefix() {
        let registry = registry();
        let unix = registry.by_code(UNIX).unwrap();
        let segment = Segment::new(unix, Bytes::from_static(b"/tmp/sock"));
        let bytes = segments_to_bytes(std::slice::from_ref(&segment)).unwrap();

        // 400 = 0x90 0x03, then length 9
        assert_eq!(&bytes[..3], &[0x90, 0x03, 9]);
        assert_eq!(&bytes[3..], b"/tmp/sock");

        let decoded = bytes_to_segments(&registry, &Bytes::from(bytes)).unwrap();
        assert_eq!(decoded, vec![segment]);
    }

    #[test]
    fn test_unknown_code() {
        let registry = registry();
        let buf = Bytes::from_static(&[0x7f, 0x00]);
        assert!(matches!(
            bytes_to_segments(&registry, &buf),
            Err(MultiaddrError::InvalidProtocol(127))
        ));
    }

    #[test]
    fn test_truncated_fixed_value() {
        let registry = registry();
        let buf = Bytes::from_static(&[0x04, 127, 0, 0]);
        assert!(matches!(
            bytes_to_segments(&registry, &buf),
            Err(MultiaddrError::Truncated)
        ));
    }

    #[test]
    fn test_truncated_variable_value() {
        let registry = registry();
        // dns4 with a declared length of 10 but only 3 bytes present
        let buf = Bytes::from_static(&[0x36, 10, b'a', b'b', b'c']);
        assert!(matches!(
            bytes_to_segments(&registry, &buf),
            Err(MultiaddrError::Truncated)
        ));

        // dns4 with the length prefix missing entirely
        let buf = Bytes::from_static(&[0x36]);
        assert!(matches!(
            bytes_to_segments(&registry, &buf),
            Err(MultiaddrError::Truncated)
        ));
    }

    #[test]
    fn test_non_byte_fixed_size() {
        let mut registry = Registry::new();
        registry.register(900, 12, "odd", false, false).unwrap();
        let buf = Bytes::from_static(&[0x84, 0x07, 0xff, 0xff]);
        assert!(matches!(
            bytes_to_segments(&registry, &buf),
            Err(MultiaddrError::InvalidAddressLength(_))
        ));
    }

    #[test]
    fn test_encode_rejects_wrong_fixed_length() {
        let registry = registry();
        let ip4 = registry.by_code(IP4).unwrap();
        let segment = Segment::new(ip4, vec![1u8, 2, 3]);
        assert!(matches!(
            segments_to_bytes(&[segment]),
            Err(MultiaddrError::InvalidAddressLength(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        let registry = registry();
        let segments = bytes_to_segments(&registry, &Bytes::new()).unwrap();
        assert!(segments.is_empty());
        assert!(segments_to_bytes(&segments).unwrap().is_empty());
    }
}
