//! # Turn restrictions for the routing graph
//!
//! A restriction is a short ordered chain of road features tagged as either
//! forbidden (`No`) or mandatory (`Only`). Map tiles persist them in a
//! compact bit-packed side section; this crate holds the in-memory model and
//! the section codec.

mod restriction;
mod section;

pub use restriction::{INVALID_FEATURE_ID, Restriction, RestrictionKind};
pub use section::{
    RESTRICTION_SECTION_VERSION, RestrictionSectionHeader, deserialize_restrictions,
    serialize_restrictions,
};
