//! Codec for the traffic keys section.
//!
//! The section is a version byte, a varint feature-group count `n`, and one
//! bit scope holding three parallel arrays: `n` Elias-gamma fid deltas
//! (biased by one), `n` Elias-gamma segment counts (biased by one, so
//! zero-segment features are representable), and `n` one-way flag bits.
//!
//! Keys are not stored individually. A maximal run of keys sharing a fid is
//! one feature group; the group is one-way when no key travels backward, and
//! the stored segment count is the group size divided by the direction
//! count. Decoding expands each group back to `(fid, idx, dir)` keys in
//! lexicographic order, which makes the codec lossless exactly on canonical
//! key vectors.

use crate::{Direction, RoadSegmentId};
use mwm_coding::{
    BitReader, BitWriter, ByteSource, CodecError, decode_gamma, encode_gamma, read_varuint,
    write_varuint,
};
use std::io::{self, Write};

/// The keys section format version this build reads and writes.
pub const TRAFFIC_KEYS_VERSION: u8 = 0;

/// Serializes a canonical key vector.
///
/// # Panics
///
/// The input must be sorted and in canonical layout (dense segment indices,
/// both directions present iff the feature is two-way); a group whose size
/// is not divisible by its direction count panics.
///
/// # Errors
///
/// Fails only when the underlying sink fails.
pub fn serialize_traffic_keys<W: Write>(
    keys: &[RoadSegmentId],
    sink: &mut W,
) -> io::Result<()> {
    debug_assert!(keys.is_sorted());

    let mut fids = Vec::new();
    let mut num_segs = Vec::new();
    let mut one_way = Vec::new();
    let mut i = 0;
    while i < keys.len() {
        let mut j = i;
        while j < keys.len() && keys[j].fid == keys[i].fid {
            j += 1;
        }

        let ow = keys[i..j].iter().all(|key| key.dir != Direction::Backward);
        let num_dirs = if ow { 1 } else { 2 };
        let group_size = j - i;
        assert_eq!(group_size % num_dirs, 0, "key vector is not in canonical layout");

        fids.push(keys[i].fid);
        num_segs.push((group_size / num_dirs) as u64);
        one_way.push(ow);
        i = j;
    }

    sink.write_all(&[TRAFFIC_KEYS_VERSION])?;
    write_varuint(sink, fids.len() as u64)?;

    let mut bits = BitWriter::new(&mut *sink);
    let mut prev_fid = 0u32;
    for &fid in &fids {
        let fid_delta = fid - prev_fid;
        encode_gamma(&mut bits, u64::from(fid_delta) + 1)?;
        prev_fid = fid;
    }
    for &segs in &num_segs {
        encode_gamma(&mut bits, segs + 1)?;
    }
    for &ow in &one_way {
        bits.write(u64::from(ow), 1)?;
    }
    bits.finish()
}

/// Decodes a keys section into the expanded canonical key vector.
///
/// # Errors
///
/// Truncation, over-long codes, a segment count that does not fit the index
/// range, and leftover bytes fail with [`CodecError::MalformedStream`]; a
/// non-zero version byte fails with [`CodecError::UnsupportedVersion`].
pub fn deserialize_traffic_keys(data: &[u8]) -> Result<Vec<RoadSegmentId>, CodecError> {
    let mut src = ByteSource::new(data);
    let version = src.read_u8()?;
    if version != TRAFFIC_KEYS_VERSION {
        return Err(CodecError::UnsupportedVersion(u16::from(version)));
    }
    let n = read_varuint(&mut src)?;

    let mut fids = Vec::new();
    let mut num_segs = Vec::new();
    let mut one_way = Vec::new();
    {
        let mut bits = BitReader::new(&mut src);
        let mut prev_fid = 0u32;
        for _ in 0..n {
            let delta = decode_gamma(&mut bits)? - 1;
            prev_fid = prev_fid.wrapping_add(delta as u32);
            fids.push(prev_fid);
        }
        for _ in 0..n {
            let segs = decode_gamma(&mut bits)? - 1;
            if segs > u64::from(u16::MAX) {
                return Err(CodecError::MalformedStream(
                    "segment count exceeds the index range",
                ));
            }
            num_segs.push(segs as u16);
        }
        for _ in 0..n {
            one_way.push(bits.read(1)? == 1);
        }
    }
    if src.remaining() != 0 {
        return Err(CodecError::MalformedStream("trailing bytes after section body"));
    }

    let mut keys = Vec::new();
    for i in 0..fids.len() {
        let num_dirs = if one_way[i] { 1 } else { 2 };
        for idx in 0..num_segs[i] {
            for dir in 0..num_dirs {
                keys.push(RoadSegmentId::new(fids[i], idx, Direction::from_index(dir)));
            }
        }
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode(keys: &[RoadSegmentId]) -> Vec<u8> {
        let mut out = Vec::new();
        serialize_traffic_keys(keys, &mut out).unwrap();
        out
    }

    #[test]
    fn test_empty_vector() {
        let encoded = encode(&[]);
        assert_eq!(encoded, [0x00, 0x00]);
        assert!(deserialize_traffic_keys(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_one_way_feature_bytes() {
        // Feature 7, three segments, one way:
        // gamma(7+1), gamma(3+1), a one bit -> 13 bits in two bytes.
        let keys = [
            RoadSegmentId::new(7, 0, Direction::Forward),
            RoadSegmentId::new(7, 1, Direction::Forward),
            RoadSegmentId::new(7, 2, Direction::Forward),
        ];
        let encoded = encode(&keys);
        assert_eq!(encoded, [0x00, 0x01, 0x08, 0x12]);
        assert_eq!(deserialize_traffic_keys(&encoded).unwrap(), keys);
    }

    #[test]
    fn test_two_way_feature_bytes() {
        // Feature 4, one segment, both directions.
        let keys = [
            RoadSegmentId::new(4, 0, Direction::Forward),
            RoadSegmentId::new(4, 0, Direction::Backward),
        ];
        let encoded = encode(&keys);
        assert_eq!(encoded, [0x00, 0x01, 0x4C, 0x00]);
        assert_eq!(deserialize_traffic_keys(&encoded).unwrap(), keys);
    }

    #[test]
    fn test_fid_zero_is_representable() {
        let keys = [RoadSegmentId::new(0, 0, Direction::Forward)];
        let encoded = encode(&keys);
        assert_eq!(deserialize_traffic_keys(&encoded).unwrap(), keys);
    }

    #[test]
    fn test_zero_segment_feature_decodes_to_nothing() {
        // A hand-built section: one feature, zero segments, one way.
        // Such groups are legal on the wire even though a key vector never
        // produces them.
        let mut out = vec![0x00, 0x01];
        let mut bits = mwm_coding::BitWriter::new(&mut out);
        mwm_coding::encode_gamma(&mut bits, 43).unwrap(); // fid 42
        mwm_coding::encode_gamma(&mut bits, 1).unwrap(); // zero segments
        bits.write(1, 1).unwrap();
        bits.finish().unwrap();
        assert!(deserialize_traffic_keys(&out).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        assert_eq!(
            deserialize_traffic_keys(&[0x01, 0x00]),
            Err(CodecError::UnsupportedVersion(1))
        );
    }

    #[test]
    fn test_truncated_stream_is_malformed() {
        // Claims one feature but carries no bit stream at all.
        assert_eq!(
            deserialize_traffic_keys(&[0x00, 0x01]),
            Err(CodecError::MalformedStream("unexpected end of input"))
        );
    }

    #[test]
    fn test_trailing_bytes_are_malformed() {
        let keys = [RoadSegmentId::new(7, 0, Direction::Forward)];
        let mut encoded = encode(&keys);
        encoded.push(0xFF);
        assert_eq!(
            deserialize_traffic_keys(&encoded),
            Err(CodecError::MalformedStream("trailing bytes after section body"))
        );
    }

    #[test]
    #[should_panic(expected = "canonical layout")]
    fn test_non_canonical_group_panics() {
        // Two-way feature with an odd group size.
        let keys = [
            RoadSegmentId::new(4, 0, Direction::Forward),
            RoadSegmentId::new(4, 0, Direction::Backward),
            RoadSegmentId::new(4, 1, Direction::Forward),
        ];
        let mut out = Vec::new();
        let _ = serialize_traffic_keys(&keys, &mut out);
    }

    fn arb_canonical_keys() -> impl Strategy<Value = Vec<RoadSegmentId>> {
        prop::collection::vec((1u32..10_000, 0u16..40, any::<bool>()), 0..20).prop_map(
            |groups| {
                let mut keys = Vec::new();
                let mut fid = 0u32;
                for (fid_step, segs, one_way) in groups {
                    fid += fid_step;
                    let num_dirs = if one_way { 1 } else { 2 };
                    for idx in 0..segs {
                        for dir in 0..num_dirs {
                            keys.push(RoadSegmentId::new(fid, idx, Direction::from_index(dir)));
                        }
                    }
                }
                keys
            },
        )
    }

    proptest! {
        #[test]
        fn canonical_keys_round_trip(keys in arb_canonical_keys()) {
            let encoded = encode(&keys);
            prop_assert_eq!(deserialize_traffic_keys(&encoded).unwrap(), keys);
        }
    }
}
