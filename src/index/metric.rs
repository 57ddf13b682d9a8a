//! Distance metrics that parameterize a `BkTree`

use crate::config::{IMAGE_BUCKETS, WORD_BUCKETS};
use crate::core::{edit_distance, ImageItem};

/// A metric space the tree can index.
///
/// `BUCKETS` is the fan-out of every node. A distance `d` selects child slot
/// `d % BUCKETS`, so distances at or above `BUCKETS` fold onto lower slots.
pub trait Metric {
	type Item;

	const BUCKETS: usize;

	fn distance(a: &Self::Item, b: &Self::Item) -> usize;

	/// Items for which this returns true are never inserted.
	fn is_null(_item: &Self::Item) -> bool {
		false
	}
}

/// Damerau-Levenshtein distance over the raw bytes of a word. Words are
/// stored as bytes, so lists in any single-byte or UTF-8 encoding compare
/// exactly as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistance;

impl Metric for EditDistance {
	type Item = Vec<u8>;

	const BUCKETS: usize = WORD_BUCKETS;

	fn distance(a: &Vec<u8>, b: &Vec<u8>) -> usize {
		edit_distance(a, b)
	}

	fn is_null(item: &Vec<u8>) -> bool {
		item.is_empty()
	}
}

/// Hamming distance between the perceptual hashes of two images
#[derive(Debug, Clone, Copy, Default)]
pub struct HammingDistance;

impl Metric for HammingDistance {
	type Item = ImageItem;

	const BUCKETS: usize = IMAGE_BUCKETS;

	fn distance(a: &ImageItem, b: &ImageItem) -> usize {
		a.hash.distance(&b.hash)
	}
}
