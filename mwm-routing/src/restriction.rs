#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reserved feature id; never appears in a valid restriction.
pub const INVALID_FEATURE_ID: u32 = u32::MAX;

/// The two categories of turn restriction.
///
/// OSM carries a dozen-plus restriction tags (`no_left_turn`,
/// `only_straight_on`, and so on), but every one of them reduces to either
/// "traversing this chain is forbidden" or "this chain is the only permitted
/// continuation".
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum RestrictionKind {
    /// Traversing the chain is forbidden.
    No,
    /// The chain is the only permitted continuation.
    Only,
}

/// A turn rule over an ordered chain of road features.
///
/// The chain order is the direction of traversal, so the same feature id may
/// legitimately appear more than once (a U-turn rule, for instance).
/// Restrictions are totally ordered by `(kind, feature_ids)` with
/// `No < Only`; collections handed to the serializer must be sorted in this
/// order.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Restriction {
    pub kind: RestrictionKind,
    /// Links of the restriction, as feature ids, in traversal order.
    pub feature_ids: Vec<u32>,
}

impl Restriction {
    #[must_use]
    pub fn new(kind: RestrictionKind, feature_ids: Vec<u32>) -> Self {
        Self { kind, feature_ids }
    }

    /// A restriction is valid when it chains at least two links and none of
    /// them is the reserved sentinel. Zero- and one-link restrictions carry
    /// no meaning.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.feature_ids.len() >= 2
            && self.feature_ids.iter().all(|&fid| fid != INVALID_FEATURE_ID)
    }
}
