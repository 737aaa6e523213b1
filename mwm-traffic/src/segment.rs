#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of travel along a feature's polyline.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Direction {
    Forward = 0,
    Backward = 1,
}

impl Direction {
    pub(crate) const fn from_index(value: u8) -> Self {
        if value == 0 {
            Self::Forward
        } else {
            Self::Backward
        }
    }
}

/// A directed micro-segment of a road feature.
///
/// `idx` addresses the segment whose start point is point `idx` of the
/// feature's polyline, so a feature with `P` points carries segments
/// `0..P-1` per direction. Ordering is lexicographic by `(fid, idx, dir)`,
/// which is also the canonical layout of a tile's key vector.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct RoadSegmentId {
    pub fid: u32,
    pub idx: u16,
    pub dir: Direction,
}

impl RoadSegmentId {
    #[must_use]
    pub const fn new(fid: u32, idx: u16, dir: Direction) -> Self {
        Self { fid, idx, dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_fid_idx_dir() {
        let keys = [
            RoadSegmentId::new(1, 0, Direction::Forward),
            RoadSegmentId::new(1, 0, Direction::Backward),
            RoadSegmentId::new(1, 1, Direction::Forward),
            RoadSegmentId::new(2, 0, Direction::Forward),
        ];
        assert!(keys.is_sorted());
    }
}
