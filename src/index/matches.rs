//! Range query results

use std::collections::VecDeque;

/// One item found by a range query, with the distance it was recorded at
#[derive(Debug)]
pub struct Match<'a, T> {
	pub item: &'a T,
	pub distance: usize,
}

impl<T> Clone for Match<'_, T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for Match<'_, T> {}

/// Ordered, length-tracked queue of matches.
///
/// Iterating pops from the front, so a `Matches` can be walked only once;
/// collect it first if the results are needed again.
#[derive(Debug)]
pub struct Matches<'a, T> {
	queue: VecDeque<Match<'a, T>>,
}

impl<'a, T> Matches<'a, T> {
	pub fn new() -> Self {
		Self { queue: VecDeque::new() }
	}

	pub fn push_front(&mut self, found: Match<'a, T>) {
		self.queue.push_front(found);
	}

	pub fn push_back(&mut self, found: Match<'a, T>) {
		self.queue.push_back(found);
	}

	pub fn len(&self) -> usize {
		self.queue.len()
	}

	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}

	/// Drop the distances and keep the items in order
	pub fn into_items(self) -> Vec<&'a T> {
		self.map(|m| m.item).collect()
	}
}

impl<T> Default for Matches<'_, T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<'a, T> Iterator for Matches<'a, T> {
	type Item = Match<'a, T>;

	fn next(&mut self) -> Option<Self::Item> {
		self.queue.pop_front()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.queue.len(), Some(self.queue.len()))
	}
}

impl<T> ExactSizeIterator for Matches<'_, T> {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn front_and_back_ordering() {
		let (a, b, c) = ("a".to_string(), "b".to_string(), "c".to_string());
		let mut matches = Matches::new();
		matches.push_back(Match { item: &b, distance: 1 });
		matches.push_front(Match { item: &a, distance: 0 });
		matches.push_back(Match { item: &c, distance: 2 });

		assert_eq!(matches.len(), 3);
		let items: Vec<&str> = matches.into_items().into_iter().map(String::as_str).collect();
		assert_eq!(items, ["a", "b", "c"]);
	}

	#[test]
	fn iteration_consumes() {
		let word = "x".to_string();
		let mut matches = Matches::new();
		matches.push_back(Match { item: &word, distance: 0 });
		assert_eq!(matches.next().map(|m| m.distance), Some(0));
		assert!(matches.is_empty());
		assert!(matches.next().is_none());
	}
}
