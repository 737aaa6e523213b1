//! Deflate wrapper used by the traffic value payload.
//!
//! zlib framing at best compression; there is no framing beyond what the
//! compression format itself provides.

use crate::CodecError;
use flate2::Compression;
use flate2::write::{ZlibDecoder, ZlibEncoder};
use std::io::{self, Write};

/// Compresses `bytes` at maximum compression.
///
/// # Errors
///
/// Fails only on I/O errors from the compressor, which cannot occur when
/// writing to memory.
pub fn deflate(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(bytes)?;
    encoder.finish()
}

/// Decompresses a buffer produced by [`deflate`].
///
/// # Errors
///
/// A corrupted stream fails with [`CodecError::MalformedStream`].
pub fn inflate(bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut decoder = ZlibDecoder::new(Vec::new());
    decoder
        .write_all(bytes)
        .map_err(|_| CodecError::MalformedStream("inflate failed"))?;
    decoder
        .finish()
        .map_err(|_| CodecError::MalformedStream("inflate failed"))
}
