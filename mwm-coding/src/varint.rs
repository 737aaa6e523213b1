//! Unsigned LEB128 varints (7-bit groups, high-bit continuation), adapted
//! from the `integer-encoding` crate to the section sources and sinks.

use crate::{ByteSource, CodecError};
use integer_encoding::{VarIntReader, VarIntWriter};
use std::io::{self, Write};

/// Appends `value` as an unsigned varint.
///
/// # Errors
///
/// Fails only when the underlying sink fails.
pub fn write_varuint<W: Write>(sink: &mut W, value: u64) -> io::Result<()> {
    sink.write_varint(value).map(|_| ())
}

/// Reads one unsigned varint.
///
/// # Errors
///
/// Fails with [`CodecError::MalformedStream`] on a truncated or over-long
/// encoding.
pub fn read_varuint(src: &mut ByteSource<'_>) -> Result<u64, CodecError> {
    src.read_varint::<u64>()
        .map_err(|_| CodecError::MalformedStream("unexpected end of input"))
}
