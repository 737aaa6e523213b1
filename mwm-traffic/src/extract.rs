//! Derivation of the canonical key vector from a map-tile scan.
//!
//! The tile container and the vehicle model live outside this crate; the
//! seam is a pair of small traits. Features must be visited in ascending fid
//! order, which makes the derived vector sorted by construction.

use crate::{Direction, RoadSegmentId};

/// A road feature's geometry, as far as key derivation is concerned.
pub trait RoadFeature {
    /// Number of points in the feature's polyline. `P` points make `P − 1`
    /// segments per direction.
    fn point_count(&self) -> u16;
}

/// Vehicle-model predicates classifying features.
///
/// Injected by the consumer (typically backed by the car model) rather than
/// read from process-wide state.
pub trait RoadModel<F> {
    fn is_road(&self, feature: &F) -> bool;
    fn is_one_way(&self, feature: &F) -> bool;
}

/// Walks `features` — visited in ascending fid order — and derives the
/// canonical key vector: for every road feature, keys `(fid, idx, dir)` for
/// each segment index and each permitted direction, in lexicographic order.
///
/// This is the only layout the keys codec accepts; fixtures and producers
/// alike must build their vectors through this pass.
pub fn extract_traffic_keys<F: RoadFeature>(
    model: &impl RoadModel<F>,
    features: impl IntoIterator<Item = (F, u32)>,
) -> Vec<RoadSegmentId> {
    let mut keys = Vec::new();
    for (feature, fid) in features {
        if !model.is_road(&feature) {
            continue;
        }
        let num_points = feature.point_count();
        let num_dirs = if model.is_one_way(&feature) { 1 } else { 2 };
        for idx in 0..num_points.saturating_sub(1) {
            for dir in 0..num_dirs {
                keys.push(RoadSegmentId::new(fid, idx, Direction::from_index(dir)));
            }
        }
    }
    debug_assert!(keys.is_sorted());
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{deserialize_traffic_keys, serialize_traffic_keys};

    struct TestFeature {
        points: u16,
        road: bool,
        one_way: bool,
    }

    impl RoadFeature for TestFeature {
        fn point_count(&self) -> u16 {
            self.points
        }
    }

    struct TestModel;

    impl RoadModel<TestFeature> for TestModel {
        fn is_road(&self, feature: &TestFeature) -> bool {
            feature.road
        }

        fn is_one_way(&self, feature: &TestFeature) -> bool {
            feature.one_way
        }
    }

    fn feature(points: u16, road: bool, one_way: bool) -> TestFeature {
        TestFeature { points, road, one_way }
    }

    #[test]
    fn test_extraction() {
        let features = [
            (feature(3, true, true), 1u32),   // two one-way segments
            (feature(4, false, false), 2),    // not a road
            (feature(2, true, false), 5),     // one segment, both directions
            (feature(1, true, true), 6),      // degenerate polyline
        ];
        let keys = extract_traffic_keys(&TestModel, features);
        assert_eq!(
            keys,
            [
                RoadSegmentId::new(1, 0, Direction::Forward),
                RoadSegmentId::new(1, 1, Direction::Forward),
                RoadSegmentId::new(5, 0, Direction::Forward),
                RoadSegmentId::new(5, 0, Direction::Backward),
            ]
        );
    }

    #[test]
    fn test_derived_keys_round_trip_through_the_codec() {
        let features = [
            (feature(10, true, false), 3u32),
            (feature(2, true, true), 8),
            (feature(7, true, false), 2_000_000),
        ];
        let keys = extract_traffic_keys(&TestModel, features);
        let mut encoded = Vec::new();
        serialize_traffic_keys(&keys, &mut encoded).unwrap();
        assert_eq!(deserialize_traffic_keys(&encoded).unwrap(), keys);
    }
}
