//! Elias universal codes over the bit streams.
//!
//! Both codes are defined for strictly positive integers only. Fields that
//! are naturally zero-allowed are encoded as `value + 1` by the section
//! codecs and decoded with the bias removed; a stream in which a code cannot
//! be completed is malformed.

use crate::{BitReader, BitWriter, CodecError};
use std::io::{self, Write};

/// Elias-gamma encodes `value`: `n = ⌊log₂ value⌋` zero bits, a one bit,
/// then the low `n` bits of `value`.
///
/// # Panics
///
/// Panics when `value` is zero (caller bug).
///
/// # Errors
///
/// Fails only when the underlying sink fails.
pub fn encode_gamma<W: Write>(bits: &mut BitWriter<'_, W>, value: u64) -> io::Result<()> {
    assert!(value > 0, "gamma codes are defined for positive values only");
    let n = (63 - value.leading_zeros()) as u8;
    bits.write(1u64 << n, n + 1)?;
    bits.write(value, n)
}

/// Decodes one Elias-gamma code.
///
/// # Errors
///
/// Fails with [`CodecError::MalformedStream`] on a truncated stream or a
/// zero run too long to encode any value.
pub fn decode_gamma(bits: &mut BitReader<'_, '_>) -> Result<u64, CodecError> {
    let mut n = 0u8;
    while bits.read(1)? == 0 {
        n += 1;
        if n > 63 {
            return Err(CodecError::MalformedStream("over-long gamma code"));
        }
    }
    let low = bits.read(n)?;
    Ok((1u64 << n) | low)
}

/// Elias-delta encodes `value`: `gamma(⌊log₂ value⌋ + 1)`, then the low
/// `⌊log₂ value⌋` bits of `value`.
///
/// # Panics
///
/// Panics when `value` is zero (caller bug).
///
/// # Errors
///
/// Fails only when the underlying sink fails.
pub fn encode_delta<W: Write>(bits: &mut BitWriter<'_, W>, value: u64) -> io::Result<()> {
    assert!(value > 0, "delta codes are defined for positive values only");
    let n = (63 - value.leading_zeros()) as u8;
    encode_gamma(bits, u64::from(n) + 1)?;
    bits.write(value, n)
}

/// Decodes one Elias-delta code.
///
/// # Errors
///
/// Fails with [`CodecError::MalformedStream`] on a truncated stream or a
/// length prefix wider than 64 bits.
pub fn decode_delta(bits: &mut BitReader<'_, '_>) -> Result<u64, CodecError> {
    let n_plus_one = decode_gamma(bits)?;
    if n_plus_one > 64 {
        return Err(CodecError::MalformedStream("over-long delta code"));
    }
    let n = (n_plus_one - 1) as u8;
    let low = bits.read(n)?;
    Ok((1u64 << n) | low)
}
