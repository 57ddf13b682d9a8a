//! # Metric Index
//!
//! Generic BK-tree over any `Metric`, plus the result queue its range
//! queries produce.

pub mod matches;
pub mod metric;
pub mod tree;

pub use matches::{Match, Matches};
pub use metric::{EditDistance, HammingDistance, Metric};
pub use tree::BkTree;

/// Tree of words under Damerau-Levenshtein distance
pub type WordTree = BkTree<EditDistance>;

/// Tree of images under perceptual-hash Hamming distance
pub type ImageTree = BkTree<HammingDistance>;
