//! LSB-first bit streams over byte sinks and sources.
//!
//! The first bit written lands in the least significant bit of the first
//! byte. There are no alignment markers; a writer and a reader of the same
//! stream agree on the layout by position alone. Closing a writer zero-pads
//! the final byte; dropping a reader discards any partially consumed byte,
//! which re-aligns the underlying source to the next byte boundary.

use crate::{ByteSource, CodecError};
use std::io::{self, Write};

/// Appends bits to a byte sink, least significant bit first.
pub struct BitWriter<'a, W: Write> {
    sink: &'a mut W,
    buf: u8,
    filled: u8,
}

impl<'a, W: Write> BitWriter<'a, W> {
    pub fn new(sink: &'a mut W) -> Self {
        Self {
            sink,
            buf: 0,
            filled: 0,
        }
    }

    /// Appends the low `width` bits of `value`, LSB first.
    ///
    /// # Errors
    ///
    /// Fails only when the underlying sink fails.
    pub fn write(&mut self, value: u64, width: u8) -> io::Result<()> {
        debug_assert!(width <= 64, "bit width out of range");
        let mut value = value;
        let mut remaining = width;
        while remaining > 0 {
            let take = u8::min(8 - self.filled, remaining);
            let mask = ((1u16 << take) - 1) as u8;
            self.buf |= ((value as u8) & mask) << self.filled;
            self.filled += take;
            value >>= take;
            remaining -= take;
            if self.filled == 8 {
                self.sink.write_all(&[self.buf])?;
                self.buf = 0;
                self.filled = 0;
            }
        }
        Ok(())
    }

    /// Closes the bit scope, zero-padding the final byte.
    ///
    /// # Errors
    ///
    /// Fails only when the underlying sink fails.
    pub fn finish(self) -> io::Result<()> {
        if self.filled > 0 {
            self.sink.write_all(&[self.buf])?;
        }
        Ok(())
    }
}

/// Reads bits from a [`ByteSource`], least significant bit first.
///
/// Bytes are pulled from the source lazily, so a reader that stops mid-byte
/// leaves the source positioned immediately after the last byte it touched.
pub struct BitReader<'a, 'b> {
    src: &'a mut ByteSource<'b>,
    buf: u8,
    avail: u8,
}

impl<'a, 'b> BitReader<'a, 'b> {
    pub fn new(src: &'a mut ByteSource<'b>) -> Self {
        Self {
            src,
            buf: 0,
            avail: 0,
        }
    }

    /// Reads `width` bits as an unsigned integer.
    ///
    /// # Errors
    ///
    /// Fails with [`CodecError::MalformedStream`] when the source runs dry.
    pub fn read(&mut self, width: u8) -> Result<u64, CodecError> {
        debug_assert!(width <= 64, "bit width out of range");
        let mut out = 0u64;
        let mut got = 0u8;
        while got < width {
            if self.avail == 0 {
                self.buf = self.src.read_u8()?;
                self.avail = 8;
            }
            let take = u8::min(self.avail, width - got);
            let mask = ((1u16 << take) - 1) as u8;
            out |= u64::from(self.buf & mask) << got;
            self.buf >>= take;
            self.avail -= take;
            got += take;
        }
        Ok(out)
    }
}
