//! Unsigned varint codec.
//!
//! Thin layer over `unsigned-varint`: 7 data bits per byte, least-significant
//! group first, at most 9 bytes. Decoding rejects non-minimal encodings, so
//! every value has exactly one byte representation.

use crate::error::{MultiaddrError, Result};
use unsigned_varint::{decode as uvar_decode, encode as uvar_encode};

/// Largest value the codec accepts.
pub const MAX_VALUE: u64 = (1 << 63) - 1;

/// Maximum number of bytes a single varint may occupy.
pub const MAX_LEN: usize = 9;

/// Number of bytes `value` occupies once encoded.
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Encode `value` into a fresh buffer.
///
/// # Errors
/// Returns `MultiaddrError::Overflow` if `value` exceeds [`MAX_VALUE`].
pub fn encode(value: u64) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(encoded_len(value));
    encode_into(value, &mut out)?;
    Ok(out)
}

/// Append the encoding of `value` to `out`.
pub fn encode_into(value: u64, out: &mut Vec<u8>) -> Result<()> {
    // the crate encodes all 64 bits; the wire format stops at 63
    if value > MAX_VALUE {
        return Err(MultiaddrError::Overflow);
    }
    out.extend_from_slice(uvar_encode::u64(value, &mut uvar_encode::u64_buffer()));
    Ok(())
}

/// Decode a varint starting at `offset`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
/// - `Truncated` if the buffer ends before the terminating byte
/// - `Overflow` if the value needs more than [`MAX_LEN`] bytes
/// - `NonMinimalVarint` if the encoding carries redundant trailing zero groups
pub fn decode(buf: &[u8], offset: usize) -> Result<(u64, usize)> {
    let input = buf.get(offset..).ok_or(MultiaddrError::Truncated)?;
    let (value, rest) = uvar_decode::u64(input).map_err(from_decode_error)?;
    Ok((value, input.len() - rest.len()))
}

fn from_decode_error(err: uvar_decode::Error) -> MultiaddrError {
    match err {
        uvar_decode::Error::Insufficient => MultiaddrError::Truncated,
        uvar_decode::Error::NotMinimal => MultiaddrError::NonMinimalVarint,
        _ => MultiaddrError::Overflow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_known_encodings() {
        assert_eq!(encode(0).unwrap(), vec![0x00]);
        assert_eq!(encode(1).unwrap(), vec![0x01]);
        assert_eq!(encode(127).unwrap(), vec![0x7f]);
        assert_eq!(encode(128).unwrap(), vec![0x80, 0x01]);
        assert_eq!(encode(300).unwrap(), vec![0xac, 0x02]);
        assert_eq!(encode(421).unwrap(), vec![0xa5, 0x03]);
        assert_eq!(encode(16384).unwrap(), vec![0x80, 0x80, 0x01]);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_decode_at_offset() {
        let buf = [0xff, 0xac, 0x02, 0x06];
        assert_eq!(decode(&buf, 1).unwrap(), (300, 2));
        assert_eq!(decode(&buf, 3).unwrap(), (6, 1));
    }

    #[test]
    fn test_encoded_len_matches_encoding() {
        for value in [0u64, 1, 127, 128, 16383, 16384, u32::MAX as u64, MAX_VALUE] {
            let encoded = encode(value).expect("encodable");
            assert_eq!(encoded.len(), encoded_len(value), "value {value}");
        }
        assert_eq!(encoded_len(MAX_VALUE), MAX_LEN);
    }

    #[test]
    fn test_overflow_on_encode() {
        assert!(matches!(encode(MAX_VALUE + 1), Err(MultiaddrError::Overflow)));
        assert!(matches!(encode(u64::MAX), Err(MultiaddrError::Overflow)));
    }

    #[test]
    fn test_overflow_on_decode() {
        let too_long = [0x80u8; 10];
        assert!(matches!(decode(&too_long, 0), Err(MultiaddrError::Overflow)));

        // Nine bytes carry exactly 63 bits.
        let mut widest = vec![0xffu8; 8];
        widest.push(0x7f);
        assert_eq!(decode(&widest, 0).expect("max value"), (MAX_VALUE, 9));
    }

    #[test]
    fn test_truncated() {
        assert!(matches!(decode(&[], 0), Err(MultiaddrError::Truncated)));
        assert!(matches!(decode(&[0x80, 0x80], 0), Err(MultiaddrError::Truncated)));
        assert!(matches!(decode(&[0x01], 5), Err(MultiaddrError::Truncated)));
    }

    #[test]
    fn test_non_minimal_rejected() {
        assert!(matches!(
            decode(&[0x80, 0x00], 0),
            Err(MultiaddrError::NonMinimalVarint)
        ));
        assert!(matches!(
            decode(&[0x81, 0x80, 0x00], 0),
            Err(MultiaddrError::NonMinimalVarint)
        ));
    }
}
