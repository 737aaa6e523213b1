//! # Binary coding primitives for MWM side sections
//!
//! The routing-restriction and traffic codecs share a small toolbox:
//! LSB-first bit streams, Elias universal codes, the zig-zag mapping,
//! LEB128 varints, and a deflate wrapper. Everything operates on in-memory
//! buffers; encoders append to any [`std::io::Write`] sink, decoders consume
//! a positioned [`ByteSource`] and are expected to drain it completely.

mod bit_streams;
mod deflate;
mod elias;
mod varint;
mod zigzag;

pub use bit_streams::{BitReader, BitWriter};
pub use deflate::{deflate, inflate};
pub use elias::{decode_delta, decode_gamma, encode_delta, encode_gamma};
pub use varint::{read_varuint, write_varuint};
pub use zigzag::{zig_zag_decode, zig_zag_encode};

use std::io;
use thiserror::Error;

/// Errors produced while decoding a binary section.
///
/// Encoders write through [`std::io::Write`] and surface plain I/O errors;
/// a decode failure is always one of these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Truncated input, an over-long code, leftover bytes after the section
    /// body, or a failed inflate.
    #[error("Malformed stream: {0}.")]
    MalformedStream(&'static str),
    /// The section declares a version this build does not understand.
    #[error("Unsupported section version {0}.")]
    UnsupportedVersion(u16),
}

/// A positioned read-only view over a byte buffer.
///
/// Short reads are decode errors, not panics. After a successful section
/// decode, [`ByteSource::remaining`] must report zero.
pub struct ByteSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteSource<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// The number of bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Reads the next byte.
    ///
    /// # Errors
    ///
    /// Fails with [`CodecError::MalformedStream`] at the end of the buffer.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(CodecError::MalformedStream("unexpected end of input"))?;
        self.pos += 1;
        Ok(byte)
    }
}

impl io::Read for ByteSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.remaining());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_source_tracks_remaining() {
        let data = [1u8, 2, 3];
        let mut src = ByteSource::new(&data);
        assert_eq!(src.remaining(), 3);
        assert_eq!(src.read_u8(), Ok(1));
        assert_eq!(src.read_u8(), Ok(2));
        assert_eq!(src.remaining(), 1);
        assert_eq!(src.read_u8(), Ok(3));
        assert_eq!(src.remaining(), 0);
        assert_eq!(
            src.read_u8(),
            Err(CodecError::MalformedStream("unexpected end of input"))
        );
    }
}
