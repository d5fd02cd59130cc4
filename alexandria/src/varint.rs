// SPDX-License-Identifier: MIT OR Apache-2.0

//! Variable-length encoding of the recipient count field.
//!
//! Little-endian base-128: seven data bits per byte, high bit set on every
//! byte except the last. The field is budgeted at three encoded bytes and
//! decoding refuses anything which terminates on the third byte or later,
//! which caps the trusted recipient count at [`MAX_RECIPIENTS`].
use thiserror::Error;

/// Maximum encoded size of the count field in bytes.
pub const MAX_COUNT_SIZE: usize = 3;

/// Largest recipient count the decoder accepts (two full data bytes).
pub const MAX_RECIPIENTS: usize = 0x3FFF;

/// Encodes a recipient count, returning the buffer and the number of bytes
/// used (1 below 128, at most 3).
pub fn encode_count(count: u16) -> ([u8; MAX_COUNT_SIZE], usize) {
    let mut out = [0u8; MAX_COUNT_SIZE];
    let mut x = count;
    let mut i = 0;
    while x >= 0x80 {
        out[i] = (x as u8) | 0x80;
        x >>= 7;
        i += 1;
    }
    out[i] = x as u8;
    (out, i + 1)
}

/// Decodes a recipient count, returning the value and the number of bytes
/// consumed.
///
/// A terminating byte on the third position or later exceeds the field
/// budget and is reported as [`CountError::Overflow`]; callers must not
/// trust any slot count beyond it. Running out of input while a
/// continuation bit is set is [`CountError::UnexpectedEnd`].
pub fn decode_count(buf: &[u8]) -> Result<(u16, usize), CountError> {
    let mut x: u16 = 0;
    let mut s = 0;
    for i in 0..MAX_COUNT_SIZE {
        let b = *buf.get(i).ok_or(CountError::UnexpectedEnd)?;
        if b < 0x80 {
            if i >= MAX_COUNT_SIZE - 1 {
                return Err(CountError::Overflow);
            }
            return Ok((x | u16::from(b) << s, i + 1));
        }
        x |= u16::from(b & 0x7f) << s;
        s += 7;
    }
    Err(CountError::Overflow)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CountError {
    #[error("recipient count exceeds the field budget")]
    Overflow,

    #[error("unexpected end of recipient count field")]
    UnexpectedEnd,
}

#[cfg(test)]
mod tests {
    use super::{CountError, MAX_RECIPIENTS, decode_count, encode_count};

    #[test]
    fn single_byte_counts() {
        assert_eq!(encode_count(0), ([0x00, 0, 0], 1));
        assert_eq!(encode_count(1), ([0x01, 0, 0], 1));
        assert_eq!(encode_count(127), ([0x7F, 0, 0], 1));
        assert_eq!(decode_count(&[0x01]), Ok((1, 1)));
        assert_eq!(decode_count(&[0x7F]), Ok((127, 1)));
    }

    #[test]
    fn two_byte_counts() {
        assert_eq!(encode_count(128), ([0x80, 0x01, 0], 2));
        assert_eq!(encode_count(255), ([0xFF, 0x01, 0], 2));
        assert_eq!(decode_count(&[0xFF, 0x01]), Ok((255, 2)));
        assert_eq!(
            decode_count(&[0xFF, 0x7F]),
            Ok((MAX_RECIPIENTS as u16, 2))
        );
    }

    #[test]
    fn round_trip_all_decodable_counts() {
        for count in 0..=MAX_RECIPIENTS as u16 {
            let (buf, len) = encode_count(count);
            assert_eq!(decode_count(&buf[..len]), Ok((count, len)));
        }
    }

    #[test]
    fn third_byte_terminator_overflows() {
        assert_eq!(
            decode_count(&[0x80, 0x80, 0x01]),
            Err(CountError::Overflow)
        );
        assert_eq!(
            decode_count(&[0xFF, 0xFF, 0x01]),
            Err(CountError::Overflow)
        );
        // Continuation bit still set after three bytes.
        assert_eq!(
            decode_count(&[0x80, 0x80, 0x80, 0x01]),
            Err(CountError::Overflow)
        );
    }

    #[test]
    fn truncated_field() {
        assert_eq!(decode_count(&[]), Err(CountError::UnexpectedEnd));
        assert_eq!(decode_count(&[0x80]), Err(CountError::UnexpectedEnd));
        assert_eq!(decode_count(&[0x80, 0x80]), Err(CountError::UnexpectedEnd));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        assert_eq!(decode_count(&[0x02, 0xAA, 0xBB]), Ok((2, 1)));
    }
}
