//! On-disk codec for the restriction section.
//!
//! The section is a 12-byte little-endian header followed by two bit-packed
//! buckets written back to back: all `No` restrictions, then all `Only`
//! restrictions. Within a bucket, each restriction opens its own bit scope
//! (so its code words are zero-padded to the next byte boundary) and is
//! encoded as an Elias-delta link count followed by zig-zag link-id deltas.
//! The delta baseline chains through the *first* link of the previous
//! restriction, which tracks the bucket's sort order far better than the
//! last link would.

use crate::{Restriction, RestrictionKind};
use mwm_coding::{
    BitReader, BitWriter, ByteSource, CodecError, decode_delta, encode_delta, zig_zag_decode,
    zig_zag_encode,
};
use std::io::{self, Write};
use zerocopy::{FromBytes as _, IntoBytes as _, LE, U16, U32};
use zerocopy_derive::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// The restriction section format version this build reads and writes.
/// Any other value is a hard decode error.
pub const RESTRICTION_SECTION_VERSION: u16 = 0;

/// Fixed header at the start of the restriction section.
///
/// All fields are little-endian; the two counts size the body buckets that
/// follow the header back to back.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned, Copy, Clone, Debug)]
#[repr(C)]
pub struct RestrictionSectionHeader {
    version: U16<LE>,
    reserved: U16<LE>,
    no_count: U32<LE>,
    only_count: U32<LE>,
}

const _: () = assert!(size_of::<RestrictionSectionHeader>() == 12);

impl RestrictionSectionHeader {
    fn new(no_count: u32, only_count: u32) -> Self {
        Self {
            version: U16::new(RESTRICTION_SECTION_VERSION),
            reserved: U16::new(0),
            no_count: U32::new(no_count),
            only_count: U32::new(only_count),
        }
    }

    #[must_use]
    pub fn version(&self) -> u16 {
        self.version.get()
    }

    #[must_use]
    pub fn no_count(&self) -> u32 {
        self.no_count.get()
    }

    #[must_use]
    pub fn only_count(&self) -> u32 {
        self.only_count.get()
    }
}

/// Serializes a sorted restriction collection, split at `first_only` into
/// the `No` bucket `[0, first_only)` and the `Only` bucket
/// `[first_only, len)`.
///
/// # Panics
///
/// Sortedness, the bucket split, and restriction validity are caller
/// contracts; violations panic.
///
/// # Errors
///
/// Fails only when the underlying sink fails.
pub fn serialize_restrictions<W: Write>(
    restrictions: &[Restriction],
    first_only: usize,
    sink: &mut W,
) -> io::Result<()> {
    assert!(first_only <= restrictions.len());
    assert!(u32::try_from(restrictions.len()).is_ok());
    let (no_bucket, only_bucket) = restrictions.split_at(first_only);

    let header = RestrictionSectionHeader::new(no_bucket.len() as u32, only_bucket.len() as u32);
    sink.write_all(header.as_bytes())?;
    serialize_bucket(no_bucket, RestrictionKind::No, sink)?;
    serialize_bucket(only_bucket, RestrictionKind::Only, sink)
}

fn serialize_bucket<W: Write>(
    bucket: &[Restriction],
    kind: RestrictionKind,
    sink: &mut W,
) -> io::Result<()> {
    debug_assert!(bucket.is_sorted());

    let mut prev_first_fid = 0u32;
    for restriction in bucket {
        assert_eq!(restriction.kind, kind, "bucket contains a mixed restriction kind");
        assert!(restriction.is_valid(), "restrictions must chain at least two valid links");

        let mut bits = BitWriter::new(&mut *sink);
        // Link count is two or more, so the payload is already positive.
        encode_delta(&mut bits, (restriction.feature_ids.len() - 1) as u64)?;
        let mut prev_fid = prev_first_fid;
        for &fid in &restriction.feature_ids {
            let delta = zig_zag_encode((fid as i32).wrapping_sub(prev_fid as i32));
            encode_delta(&mut bits, u64::from(delta) + 1)?;
            prev_fid = fid;
        }
        bits.finish()?;
        prev_first_fid = restriction.feature_ids[0];
    }
    Ok(())
}

/// Decodes a complete restriction section: `No` bucket first, then `Only`,
/// each in encoded order.
///
/// # Errors
///
/// Truncation, over-long codes, and leftover bytes fail with
/// [`CodecError::MalformedStream`]; a non-zero header version fails with
/// [`CodecError::UnsupportedVersion`]. Nothing is returned on failure.
pub fn deserialize_restrictions(data: &[u8]) -> Result<Vec<Restriction>, CodecError> {
    const HEADER_SIZE: usize = size_of::<RestrictionSectionHeader>();
    let Some(header_bytes) = data.get(..HEADER_SIZE) else {
        return Err(CodecError::MalformedStream("unexpected end of input"));
    };
    let header = RestrictionSectionHeader::read_from_bytes(header_bytes)
        .map_err(|_| CodecError::MalformedStream("unexpected end of input"))?;
    if header.version() != RESTRICTION_SECTION_VERSION {
        return Err(CodecError::UnsupportedVersion(header.version()));
    }

    let mut src = ByteSource::new(&data[HEADER_SIZE..]);
    let mut restrictions = Vec::new();
    deserialize_bucket(RestrictionKind::No, header.no_count(), &mut src, &mut restrictions)?;
    deserialize_bucket(RestrictionKind::Only, header.only_count(), &mut src, &mut restrictions)?;
    if src.remaining() != 0 {
        return Err(CodecError::MalformedStream("trailing bytes after section body"));
    }
    Ok(restrictions)
}

fn deserialize_bucket(
    kind: RestrictionKind,
    count: u32,
    src: &mut ByteSource<'_>,
    out: &mut Vec<Restriction>,
) -> Result<(), CodecError> {
    let mut prev_first_fid = 0u32;
    for _ in 0..count {
        let mut bits = BitReader::new(&mut *src);
        let biased_link_count = decode_delta(&mut bits)?;

        let mut feature_ids = Vec::new();
        let mut prev_fid = prev_first_fid;
        // The decoded value is the link count minus one.
        for _ in 0..=biased_link_count {
            let biased_delta = decode_delta(&mut bits)?;
            let delta = (biased_delta - 1) as u32;
            let fid = prev_fid.wrapping_add(zig_zag_decode(delta) as u32);
            feature_ids.push(fid);
            prev_fid = fid;
        }
        // Dropping the reader discards the restriction's padding bits.
        drop(bits);

        prev_first_fid = feature_ids[0];
        out.push(Restriction { kind, feature_ids });
    }
    Ok(())
}
