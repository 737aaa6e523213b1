//! Codec for the traffic values payload.
//!
//! The inner image is a version byte, a varint count, and three bits per
//! speed group; the on-disk image is the deflate of that buffer. Values are
//! positional: the i-th group colors the i-th key of the tile's canonical
//! key vector.

use crate::SpeedGroup;
use mwm_coding::{
    BitReader, BitWriter, ByteSource, CodecError, deflate, inflate, read_varuint, write_varuint,
};
use std::io::{self, Write};

/// The values payload format version this build reads and writes.
pub const TRAFFIC_VALUES_VERSION: u8 = 0;

const SPEED_GROUP_BITS: u8 = 3;

/// Serializes a speed-group vector, deflate-wrapped.
///
/// # Errors
///
/// Fails only when the underlying sink fails.
pub fn serialize_traffic_values<W: Write>(
    values: &[SpeedGroup],
    sink: &mut W,
) -> io::Result<()> {
    let mut inner = Vec::new();
    inner.push(TRAFFIC_VALUES_VERSION);
    write_varuint(&mut inner, values.len() as u64)?;
    let mut bits = BitWriter::new(&mut inner);
    for &value in values {
        bits.write(u64::from(value.into_bits()), SPEED_GROUP_BITS)?;
    }
    bits.finish()?;

    sink.write_all(&deflate(&inner)?)
}

/// Decodes a values payload.
///
/// # Errors
///
/// Inflate failures, truncation, and leftover bytes fail with
/// [`CodecError::MalformedStream`]; a non-zero version byte fails with
/// [`CodecError::UnsupportedVersion`].
pub fn deserialize_traffic_values(data: &[u8]) -> Result<Vec<SpeedGroup>, CodecError> {
    let inflated = inflate(data)?;
    let mut src = ByteSource::new(&inflated);
    let version = src.read_u8()?;
    if version != TRAFFIC_VALUES_VERSION {
        return Err(CodecError::UnsupportedVersion(u16::from(version)));
    }
    let n = read_varuint(&mut src)?;

    let mut values = Vec::new();
    {
        let mut bits = BitReader::new(&mut src);
        for _ in 0..n {
            values.push(SpeedGroup::from_bits(bits.read(SPEED_GROUP_BITS)? as u8));
        }
    }
    if src.remaining() != 0 {
        return Err(CodecError::MalformedStream("trailing bytes after section body"));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode(values: &[SpeedGroup]) -> Vec<u8> {
        let mut out = Vec::new();
        serialize_traffic_values(values, &mut out).unwrap();
        out
    }

    #[test]
    fn test_inner_image_bytes() {
        let values = [
            SpeedGroup::G0,
            SpeedGroup::G3,
            SpeedGroup::Unknown,
            SpeedGroup::Unknown,
            SpeedGroup::G1,
        ];
        let encoded = encode(&values);
        // Version, count, then five 3-bit groups packed LSB first.
        assert_eq!(inflate(&encoded).unwrap(), [0x00, 0x05, 0xD8, 0x1F]);
        assert_eq!(deserialize_traffic_values(&encoded).unwrap(), values);
    }

    #[test]
    fn test_empty_vector() {
        let encoded = encode(&[]);
        assert_eq!(inflate(&encoded).unwrap(), [0x00, 0x00]);
        assert!(deserialize_traffic_values(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_fails_to_inflate() {
        assert_eq!(
            deserialize_traffic_values(&[0x42; 16]),
            Err(CodecError::MalformedStream("inflate failed"))
        );
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let payload = deflate(&[0x01, 0x00]).unwrap();
        assert_eq!(
            deserialize_traffic_values(&payload),
            Err(CodecError::UnsupportedVersion(1))
        );
    }

    #[test]
    fn test_trailing_inner_bytes_are_malformed() {
        // One value declared, two bytes of packed bits supplied.
        let payload = deflate(&[0x00, 0x01, 0x07, 0x00]).unwrap();
        assert_eq!(
            deserialize_traffic_values(&payload),
            Err(CodecError::MalformedStream("trailing bytes after section body"))
        );
    }

    proptest! {
        #[test]
        fn values_round_trip(ordinals in prop::collection::vec(0u8..8, 0..200)) {
            let values: Vec<_> =
                ordinals.into_iter().map(SpeedGroup::from_bits).collect();
            let encoded = encode(&values);
            prop_assert_eq!(deserialize_traffic_values(&encoded).unwrap(), values);
        }
    }
}
