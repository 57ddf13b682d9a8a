//! BK-tree engine
//!
//! Nodes live in an arena and are addressed by index; the root is always
//! index 0. Each node keeps only its occupied child slots, sorted by bucket,
//! which behaves exactly like a `BUCKETS`-long slot array.

use std::marker::PhantomData;

use super::matches::{Match, Matches};
use super::metric::Metric;

pub(crate) type NodeId = usize;

const ROOT: NodeId = 0;

struct Node<T> {
	item: T,
	/// Occupied slots as `(bucket, child)`, ascending by bucket.
	children: Vec<(usize, NodeId)>,
}

impl<T> Node<T> {
	fn new(item: T) -> Self {
		Self { item, children: Vec::new() }
	}

	fn child(&self, bucket: usize) -> Option<NodeId> {
		self.children
			.binary_search_by_key(&bucket, |&(b, _)| b)
			.ok()
			.map(|pos| self.children[pos].1)
	}

	/// Children whose bucket lies in `lower..=upper`, ascending.
	fn children_in(&self, lower: usize, upper: usize) -> impl Iterator<Item = NodeId> + '_ {
		let start = self.children.partition_point(|&(b, _)| b < lower);
		self.children[start..]
			.iter()
			.take_while(move |&&(b, _)| b <= upper)
			.map(|&(_, id)| id)
	}
}

/// Unbalanced metric tree supporting insertion and radius queries.
///
/// Insertion order determines the shape. Items at distance 0 from an existing
/// node are treated as duplicates and dropped.
pub struct BkTree<M: Metric> {
	nodes: Vec<Node<M::Item>>,
	_metric: PhantomData<fn() -> M>,
}

impl<M: Metric> BkTree<M> {
	pub fn new() -> Self {
		Self { nodes: Vec::new(), _metric: PhantomData }
	}

	/// Fan-out of every node
	pub fn buckets(&self) -> usize {
		M::BUCKETS
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Release every node. The tree stays usable and empty.
	pub fn clear(&mut self) {
		self.nodes = Vec::new();
	}

	/// Insert `item`, returning `false` when it was null or a duplicate.
	pub fn insert(&mut self, item: M::Item) -> bool {
		if M::is_null(&item) {
			return false;
		}
		if self.nodes.is_empty() {
			self.nodes.push(Node::new(item));
			return true;
		}

		let mut current = ROOT;
		loop {
			let distance = M::distance(&self.nodes[current].item, &item);
			if distance == 0 {
				return false;
			}
			let bucket = distance % M::BUCKETS;
			match self.nodes[current].child(bucket) {
				Some(next) => current = next,
				None => {
					self.graft(Some(current), bucket, item);
					return true;
				}
			}
		}
	}

	/// True if an item at distance 0 from `item` is stored
	pub fn contains(&self, item: &M::Item) -> bool {
		if self.nodes.is_empty() {
			return false;
		}
		let mut current = ROOT;
		loop {
			let distance = M::distance(&self.nodes[current].item, item);
			if distance == 0 {
				return true;
			}
			match self.nodes[current].child(distance % M::BUCKETS) {
				Some(next) => current = next,
				None => return false,
			}
		}
	}

	/// Items within `radius` of `query`, nearest first, at most `max_results`.
	///
	/// Children are pruned on their bucket index, which equals the true
	/// distance only below `BUCKETS`. Items at the same distance come out in
	/// reverse discovery order.
	pub fn search(&self, query: &M::Item, radius: usize, max_results: usize) -> Matches<'_, M::Item> {
		let mut found = Matches::new();
		if self.nodes.is_empty() || max_results == 0 {
			return found;
		}

		// Slot d collects everything found at distance d; grown on demand so
		// a huge radius does not allocate up front.
		let mut by_distance: Vec<Matches<'_, M::Item>> = Vec::new();
		let mut stack = vec![ROOT];

		while let Some(id) = stack.pop() {
			let node = &self.nodes[id];
			let distance = M::distance(&node.item, query);
			if distance <= radius {
				if by_distance.len() <= distance {
					by_distance.resize_with(distance + 1, Matches::new);
				}
				by_distance[distance].push_front(Match { item: &node.item, distance });
			}

			let lower = distance.saturating_sub(radius);
			let upper = distance.saturating_add(radius).min(M::BUCKETS - 1);
			stack.extend(node.children_in(lower, upper));
		}

		for slot in by_distance {
			for candidate in slot {
				if found.len() == max_results {
					return found;
				}
				found.push_back(candidate);
			}
		}
		found
	}

	/// Length of the longest root-to-leaf path, 0 for an empty tree
	pub fn depth(&self) -> usize {
		if self.nodes.is_empty() {
			return 0;
		}
		let mut deepest = 0;
		let mut stack = vec![(ROOT, 1)];
		while let Some((id, depth)) = stack.pop() {
			deepest = deepest.max(depth);
			stack.extend(self.nodes[id].children.iter().map(|&(_, child)| (child, depth + 1)));
		}
		deepest
	}

	/// Every stored item, in insertion order
	pub fn iter(&self) -> impl Iterator<Item = &M::Item> + '_ {
		self.nodes.iter().map(|node| &node.item)
	}

	pub(crate) fn root(&self) -> Option<NodeId> {
		if self.nodes.is_empty() {
			None
		} else {
			Some(ROOT)
		}
	}

	pub(crate) fn item(&self, id: NodeId) -> &M::Item {
		&self.nodes[id].item
	}

	pub(crate) fn children(&self, id: NodeId) -> &[(usize, NodeId)] {
		&self.nodes[id].children
	}

	pub(crate) fn child(&self, id: NodeId, bucket: usize) -> Option<NodeId> {
		self.nodes[id].child(bucket)
	}

	/// Place `item` in slot `bucket` of `parent`, or as the root when
	/// `parent` is `None`. The caller guarantees the slot is free and
	/// `bucket < BUCKETS`.
	pub(crate) fn graft(&mut self, parent: Option<NodeId>, bucket: usize, item: M::Item) -> NodeId {
		let id = self.nodes.len();
		self.nodes.push(Node::new(item));
		if let Some(parent) = parent {
			let children = &mut self.nodes[parent].children;
			let pos = children.partition_point(|&(b, _)| b < bucket);
			debug_assert!(children.get(pos).map_or(true, |&(b, _)| b != bucket));
			children.insert(pos, (bucket, id));
		}
		id
	}
}

impl<M: Metric> Default for BkTree<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M: Metric> std::fmt::Debug for BkTree<M> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BkTree")
			.field("buckets", &M::BUCKETS)
			.field("len", &self.nodes.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::edit_distance;
	use crate::index::WordTree;
	use rand::Rng;

	/// Integers under absolute difference, with a tiny fan-out so folding shows.
	struct Absolute;

	impl Metric for Absolute {
		type Item = i64;
		const BUCKETS: usize = 4;

		fn distance(a: &i64, b: &i64) -> usize {
			(a - b).unsigned_abs() as usize
		}
	}

	fn words(list: &[&str]) -> WordTree {
		let mut tree = WordTree::new();
		for word in list {
			tree.insert(word.as_bytes().to_vec());
		}
		tree
	}

	fn word(text: &str) -> Vec<u8> {
		text.as_bytes().to_vec()
	}

	fn found(tree: &WordTree, query: &str, radius: usize, max: usize) -> Vec<String> {
		tree.search(&word(query), radius, max)
			.map(|m| String::from_utf8_lossy(m.item).into_owned())
			.collect()
	}

	#[test]
	fn empty_tree() {
		let tree = WordTree::new();
		assert!(tree.is_empty());
		assert_eq!(tree.depth(), 0);
		assert!(tree.search(&word("a"), 5, 10).is_empty());
	}

	#[test]
	fn duplicates_and_empty_words_are_ignored() {
		let mut tree = WordTree::new();
		assert!(tree.insert(word("book")));
		assert!(tree.insert(word("books")));
		assert!(!tree.insert(word("book")));
		assert!(!tree.insert(Vec::new()));
		assert_eq!(tree.len(), 2);
		assert!(tree.contains(&word("books")));
		assert!(!tree.contains(&word("boo")));
	}

	#[test]
	fn raw_bytes_are_distinct_words() {
		let mut tree = WordTree::new();
		assert!(tree.insert(b"caf\xe9".to_vec()));
		assert!(tree.insert(b"caf\xe8".to_vec()));
		assert_eq!(tree.len(), 2);
		let near: Vec<usize> = tree.search(&word("cafe"), 1, 10).map(|m| m.distance).collect();
		assert_eq!(near, [1, 1]);
	}

	#[test]
	fn first_insert_becomes_root() {
		let tree = words(&["root", "rot", "rooted"]);
		assert_eq!(tree.root().map(|id| tree.item(id).as_slice()), Some(&b"root"[..]));
		assert_eq!(tree.children(ROOT).len(), 2);
	}

	#[test]
	fn exact_lookup() {
		let tree = words(&["hello", "help", "hell", "shell", "yellow"]);
		assert_eq!(found(&tree, "hell", 0, 10), ["hell"]);
		assert!(found(&tree, "hallo", 0, 10).is_empty());
	}

	#[test]
	fn nearest_first() {
		let tree = words(&["book", "books", "cake", "boo", "cook", "boon", "cape"]);
		let results: Vec<usize> = tree
			.search(&word("book"), 2, 20)
			.map(|m| m.distance)
			.collect();
		assert!(!results.is_empty());
		assert_eq!(results[0], 0);
		assert!(results.windows(2).all(|w| w[0] <= w[1]));
	}

	#[test]
	fn same_distance_in_reverse_discovery_order() {
		// "baa" collides with "aab" in bucket 1 of the root and hangs below it,
		// so it is discovered after "aab".
		let tree = words(&["aaa", "aab", "baa"]);
		assert_eq!(found(&tree, "aaa", 1, 10), ["aaa", "baa", "aab"]);
	}

	#[test]
	fn max_results_caps_output() {
		let tree = words(&["cat", "bat", "rat", "hat", "mat", "sat"]);
		assert_eq!(tree.search(&word("cat"), 1, 3).len(), 3);
		assert!(tree.search(&word("cat"), 1, 0).is_empty());
		assert_eq!(found(&tree, "cat", 1, 1), ["cat"]);
	}

	#[test]
	fn matches_brute_force() {
		let mut rng = rand::rng();
		let alphabet = b"abcd";
		let mut tree = WordTree::new();
		let mut all = Vec::new();
		for _ in 0..400 {
			let len = rng.random_range(1..7);
			let item: Vec<u8> = (0..len)
				.map(|_| alphabet[rng.random_range(0..alphabet.len())])
				.collect();
			if tree.insert(item.clone()) {
				all.push(item);
			}
		}
		assert_eq!(tree.len(), all.len());

		for query in ["abc", "dddd", "a", "bacd"] {
			for radius in 0..3 {
				let mut expected: Vec<&Vec<u8>> = all
					.iter()
					.filter(|w| edit_distance(w, query.as_bytes()) <= radius)
					.collect();
				let mut actual = tree.search(&word(query), radius, usize::MAX).into_items();
				expected.sort();
				actual.sort();
				assert_eq!(actual, expected, "query {query} radius {radius}");
			}
		}
	}

	#[test]
	fn distances_fold_modulo_buckets() {
		let mut tree: BkTree<Absolute> = BkTree::new();
		for n in [0, 4, 8, 1] {
			assert!(tree.insert(n));
		}
		// 4 and 8 both land in slot 0 of their parent.
		assert_eq!(tree.child(ROOT, 0).map(|id| *tree.item(id)), Some(4));
		assert_eq!(tree.depth(), 3);
		assert_eq!(tree.len(), 4);
	}

	#[test]
	fn folded_search_stays_within_radius() {
		let mut tree: BkTree<Absolute> = BkTree::new();
		for n in [10, 3, 17, 11, 25, 9, 40, 12, 0] {
			tree.insert(n);
		}
		for query in [0, 10, 20, 33] {
			for m in tree.search(&query, 3, 100) {
				assert!(Absolute::distance(m.item, &query) <= 3);
				assert_eq!(m.distance, Absolute::distance(m.item, &query));
			}
		}
	}

	#[test]
	fn clear_releases_everything() {
		let mut tree = words(&["one", "two", "three"]);
		tree.clear();
		assert!(tree.is_empty());
		tree.clear();
		assert!(tree.insert(word("four")));
		assert_eq!(tree.len(), 1);
	}
}
