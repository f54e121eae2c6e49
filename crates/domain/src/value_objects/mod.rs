//! Value objects - immutable domain concepts with identity by value.

pub mod stats;

pub use stats::{
    parse_score_key, Stat, StatType, SubFacet, SubFacetType, MAX_LEVEL,
};
