#![doc = include_str!("../README.md")]

mod extract;
mod keys;
mod overlay;
mod remote;
mod segment;
mod values;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use extract::{RoadFeature, RoadModel, extract_traffic_keys};
pub use keys::{TRAFFIC_KEYS_VERSION, deserialize_traffic_keys, serialize_traffic_keys};
pub use overlay::{Availability, Coloring, TrafficInfo, combine_colorings};
pub use remote::{
    NetworkError, RemoteBlobSource, RemoteContext, RemoteResponse, traffic_keys_url,
    traffic_values_url,
};
pub use segment::{Direction, RoadSegmentId};
pub use values::{TRAFFIC_VALUES_VERSION, deserialize_traffic_values, serialize_traffic_values};

/// Coarse classification of traffic speed on a road segment.
///
/// `G0` is the most congested class and `G5` free flow; `TempBlock` marks a
/// temporarily impassable segment. The wire encoding is the ordinal in three
/// bits, so this enum can never grow beyond eight members.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum SpeedGroup {
    G0,
    G1,
    G2,
    G3,
    G4,
    G5,
    TempBlock,
    #[default]
    Unknown,
}

impl SpeedGroup {
    pub(crate) const fn into_bits(self) -> u8 {
        self as _
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & 0b111 {
            0 => Self::G0,
            1 => Self::G1,
            2 => Self::G2,
            3 => Self::G3,
            4 => Self::G4,
            5 => Self::G5,
            6 => Self::TempBlock,
            7 => Self::Unknown,
            _ => unreachable!(),
        }
    }

    /// The wire ordinal of this group.
    #[must_use]
    pub const fn discriminant(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_group_fits_three_bits() {
        for ordinal in 0..8u8 {
            assert_eq!(SpeedGroup::from_bits(ordinal).into_bits(), ordinal);
        }
        assert_eq!(SpeedGroup::Unknown.into_bits(), 7);
    }
}
