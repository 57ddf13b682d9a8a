//! Text codec for word trees
//!
//! A node is written as its word and a `\n`, then one `bucket:` prefix plus
//! the full child encoding for every occupied slot in ascending order, then
//! the end-of-children marker (the empty token) and a `\n`. An empty tree is
//! a lone `\n`. Nothing may follow the root's end marker.
//!
//! Words are raw bytes, written as-is. They can never be empty, which is
//! what reserves the empty token. Bucket indices are meaningful, so a file
//! only loads into a tree with the same fan-out.
//!
//! Both directions walk the tree with an explicit stack; tree depth never
//! touches the call stack.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::index::WordTree;
use crate::jobs::Progress;

pub const FIELD_SEP: u8 = b'\n';
pub const CHILD_SEP: u8 = b':';
pub const END_MARKER: &[u8] = b"";

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	#[error("word {0:?} cannot be stored (empty or contains a newline)")]
	Unencodable(String),

	#[error("unexpected data after the root node at byte {offset}")]
	TrailingData { offset: u64 },

	#[error("expected end-of-children marker at byte {offset}, found {found:?}")]
	ExpectedEndMarker { offset: u64, found: String },

	#[error("invalid bucket index {found:?} at byte {offset}")]
	BadBucket { offset: u64, found: String },

	#[error("bucket {bucket} appears twice under one node (byte {offset})")]
	DuplicateSlot { offset: u64, bucket: usize },

	#[error("unexpected end of input at byte {offset}")]
	UnexpectedEof { offset: u64 },
}

/// Write `tree` in preorder to `out`
pub fn encode<W: Write>(tree: &WordTree, mut out: W) -> Result<(), CodecError> {
	let Some(root) = tree.root() else {
		out.write_all(END_MARKER)?;
		out.write_all(&[FIELD_SEP])?;
		out.flush()?;
		return Ok(());
	};

	write_word(&mut out, tree.item(root))?;

	// (node, index of the next child slot to emit)
	let mut stack = vec![(root, 0usize)];
	while let Some((id, next)) = stack.last_mut() {
		match tree.children(*id).get(*next) {
			Some(&(bucket, child)) => {
				*next += 1;
				write!(out, "{}", bucket)?;
				out.write_all(&[CHILD_SEP])?;
				write_word(&mut out, tree.item(child))?;
				stack.push((child, 0));
			}
			None => {
				out.write_all(END_MARKER)?;
				out.write_all(&[FIELD_SEP])?;
				stack.pop();
			}
		}
	}

	out.flush()?;
	Ok(())
}

/// Rebuild a tree from `input`.
///
/// `progress.completed` tracks the byte offset. If cancellation is requested
/// the tree read so far is returned; it is valid, just incomplete.
pub fn decode<R: BufRead>(input: R, progress: &Progress) -> Result<WordTree, CodecError> {
	let mut reader = TokenReader { input, offset: 0 };
	let mut token = Vec::new();
	let mut tree = WordTree::new();

	let Some(word) = reader.word(&mut token)? else {
		return finish(&mut reader, progress, tree);
	};
	let root = tree.graft(None, 0, word);

	let mut stack = vec![root];
	while let Some(&parent) = stack.last() {
		progress.set_completed(reader.offset);
		if progress.is_cancelled() {
			break;
		}

		let start = reader.offset;
		match reader.token(&mut token, true)? {
			CHILD_SEP => {
				let bucket = std::str::from_utf8(&token)
					.ok()
					.and_then(|s| s.parse::<usize>().ok())
					.filter(|&b| b < tree.buckets())
					.ok_or_else(|| CodecError::BadBucket {
						offset: start,
						found: String::from_utf8_lossy(&token).into_owned(),
					})?;
				if tree.child(parent, bucket).is_some() {
					return Err(CodecError::DuplicateSlot { offset: start, bucket });
				}
				// An end marker in place of the child leaves the slot empty.
				if let Some(word) = reader.word(&mut token)? {
					let child = tree.graft(Some(parent), bucket, word);
					stack.push(child);
				}
			}
			_ => {
				if token != END_MARKER {
					return Err(CodecError::ExpectedEndMarker {
						offset: start,
						found: String::from_utf8_lossy(&token).into_owned(),
					});
				}
				stack.pop();
			}
		}
	}

	finish(&mut reader, progress, tree)
}

/// Report the final offset. A stream that was read to completion must end
/// with the root's end marker.
fn finish<R: BufRead>(reader: &mut TokenReader<R>, progress: &Progress, tree: WordTree) -> Result<WordTree, CodecError> {
	progress.set_completed(reader.offset);
	if !progress.is_cancelled() && !reader.at_end()? {
		return Err(CodecError::TrailingData { offset: reader.offset });
	}
	Ok(tree)
}

/// Save a word tree to `path`
pub fn save(tree: &WordTree, path: &Path) -> Result<()> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent).context("Failed to create index directory")?;
	}
	let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
	encode(tree, BufWriter::new(file)).with_context(|| format!("Failed to write {}", path.display()))?;
	Ok(())
}

/// Load a word tree from `path`
pub fn load(path: &Path) -> Result<WordTree> {
	load_with(path, &Progress::new())
}

/// Load a word tree, reporting file size as `total` and bytes read as `completed`
pub fn load_with(path: &Path, progress: &Progress) -> Result<WordTree> {
	let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
	let size = file.metadata().map(|m| m.len()).unwrap_or(0);
	progress.set_total(size);

	decode(BufReader::new(file), progress).with_context(|| format!("Failed to load index {}", path.display()))
}

fn write_word<W: Write>(out: &mut W, word: &[u8]) -> Result<(), CodecError> {
	if word.is_empty() || word.contains(&FIELD_SEP) {
		return Err(CodecError::Unencodable(String::from_utf8_lossy(word).into_owned()));
	}
	out.write_all(word)?;
	out.write_all(&[FIELD_SEP])?;
	Ok(())
}

struct TokenReader<R> {
	input: R,
	offset: u64,
}

impl<R: BufRead> TokenReader<R> {
	/// Read up to the next separator into `buf`, returning the separator.
	/// `CHILD_SEP` only terminates the token when `child` is set.
	fn token(&mut self, buf: &mut Vec<u8>, child: bool) -> Result<u8, CodecError> {
		buf.clear();
		loop {
			let available = self.input.fill_buf()?;
			if available.is_empty() {
				return Err(CodecError::UnexpectedEof { offset: self.offset });
			}

			let hit = available
				.iter()
				.position(|&b| b == FIELD_SEP || (child && b == CHILD_SEP));
			match hit {
				Some(pos) => {
					let sep = available[pos];
					buf.extend_from_slice(&available[..pos]);
					self.input.consume(pos + 1);
					self.offset += pos as u64 + 1;
					return Ok(sep);
				}
				None => {
					let n = available.len();
					buf.extend_from_slice(available);
					self.input.consume(n);
					self.offset += n as u64;
				}
			}
		}
	}

	/// Read a word, or `None` for the end marker
	fn word(&mut self, buf: &mut Vec<u8>) -> Result<Option<Vec<u8>>, CodecError> {
		self.token(buf, false)?;
		if buf.as_slice() == END_MARKER {
			return Ok(None);
		}
		Ok(Some(std::mem::take(buf)))
	}

	fn at_end(&mut self) -> Result<bool, CodecError> {
		Ok(self.input.fill_buf()?.is_empty())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::BTreeSet;

	fn tree_of(words: &[&str]) -> WordTree {
		let mut tree = WordTree::new();
		for w in words {
			tree.insert(w.as_bytes().to_vec());
		}
		tree
	}

	fn to_bytes(tree: &WordTree) -> Vec<u8> {
		let mut out = Vec::new();
		encode(tree, &mut out).unwrap();
		out
	}

	fn from_bytes(bytes: &[u8]) -> Result<WordTree, CodecError> {
		decode(bytes, &Progress::new())
	}

	#[test]
	fn encodes_preorder_with_bucket_prefixes() {
		let tree = tree_of(&["aaa", "aab", "baa"]);
		assert_eq!(to_bytes(&tree), b"aaa\n1:aab\n2:baa\n\n\n\n");
	}

	#[test]
	fn empty_tree_is_a_single_marker() {
		let tree = WordTree::new();
		assert_eq!(to_bytes(&tree), b"\n");
		assert!(from_bytes(b"\n").unwrap().is_empty());
	}

	#[test]
	fn round_trip_preserves_search_results() {
		let words = [
			"apple", "apply", "ample", "maple", "applet", "apples", "pale", "peal", "leap", "plea",
			"a:b", "colon:word", "with space", "ümlaut",
		];
		let original = tree_of(&words);
		let restored = from_bytes(&to_bytes(&original)).unwrap();

		assert_eq!(restored.len(), original.len());
		assert_eq!(to_bytes(&restored), to_bytes(&original));

		for query in ["apple", "pale", "a:c", "xyz"] {
			for radius in 0..4 {
				let q = query.as_bytes().to_vec();
				let a: BTreeSet<&Vec<u8>> = original.search(&q, radius, 50).into_items().into_iter().collect();
				let b: BTreeSet<&Vec<u8>> = restored.search(&q, radius, 50).into_items().into_iter().collect();
				assert_eq!(a, b, "query {query} radius {radius}");
			}
		}
	}

	#[test]
	fn missing_end_marker_is_fatal() {
		let err = from_bytes(b"aaa\n1:aab\nxyz\n").unwrap_err();
		assert!(matches!(err, CodecError::ExpectedEndMarker { offset: 10, .. }), "{err}");
	}

	#[test]
	fn non_utf8_words_survive_unchanged() {
		let mut tree = WordTree::new();
		tree.insert(b"caf\xe9".to_vec());
		tree.insert(b"caf\xe8".to_vec());
		let bytes = to_bytes(&tree);
		assert_eq!(bytes, b"caf\xe9\n1:caf\xe8\n\n\n");

		let restored = from_bytes(&bytes).unwrap();
		assert_eq!(restored.len(), 2);
		assert!(restored.contains(&b"caf\xe8".to_vec()));
	}

	#[test]
	fn trailing_bytes_are_rejected() {
		let mut bytes = to_bytes(&tree_of(&["one", "two"]));
		let end = bytes.len() as u64;
		bytes.extend_from_slice(b"three\n\n");
		assert!(matches!(from_bytes(&bytes), Err(CodecError::TrailingData { offset }) if offset == end));
		assert!(matches!(from_bytes(b"\n\n"), Err(CodecError::TrailingData { offset: 1 })));
	}

	#[test]
	fn bad_bucket_indices() {
		assert!(matches!(from_bytes(b"aaa\n256:b\n\n\n"), Err(CodecError::BadBucket { .. })));
		assert!(matches!(from_bytes(b"aaa\nx:b\n\n\n"), Err(CodecError::BadBucket { .. })));
		assert!(matches!(
			from_bytes(b"aaa\n1:b\n\n1:c\n\n\n"),
			Err(CodecError::DuplicateSlot { bucket: 1, .. })
		));
	}

	#[test]
	fn truncated_input() {
		assert!(matches!(from_bytes(b""), Err(CodecError::UnexpectedEof { offset: 0 })));
		assert!(matches!(from_bytes(b"aaa\n1:aab\n"), Err(CodecError::UnexpectedEof { .. })));
	}

	#[test]
	fn newline_words_are_rejected() {
		let mut tree = WordTree::new();
		tree.insert(b"two\nlines".to_vec());
		assert!(matches!(encode(&tree, Vec::new()), Err(CodecError::Unencodable(_))));
	}

	#[test]
	fn deep_chains_do_not_recurse() {
		let depth = 200_000;
		let mut text = Vec::new();
		text.extend_from_slice(b"w0\n");
		for i in 1..depth {
			text.extend_from_slice(format!("1:w{}\n", i).as_bytes());
		}
		text.extend(std::iter::repeat(b'\n').take(depth));

		let tree = from_bytes(&text).unwrap();
		assert_eq!(tree.len(), depth);
		assert_eq!(tree.depth(), depth);
		assert_eq!(to_bytes(&tree), text);
	}

	#[test]
	fn reports_byte_offsets() {
		let bytes = to_bytes(&tree_of(&["one", "two", "three", "four"]));
		let progress = Progress::new();
		decode(bytes.as_slice(), &progress).unwrap();
		assert_eq!(progress.snapshot().completed, bytes.len() as u64);
	}

	#[test]
	fn cancelled_decode_keeps_root_only() {
		let bytes = to_bytes(&tree_of(&["one", "two", "three", "four"]));
		let progress = Progress::new();
		progress.cancel();
		let tree = decode(bytes.as_slice(), &progress).unwrap();
		assert_eq!(tree.len(), 1);
	}

	#[test]
	fn file_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("words.bkt");
		let tree = tree_of(&["red", "read", "reed", "bead"]);
		save(&tree, &path).unwrap();
		let loaded = load(&path).unwrap();
		assert_eq!(loaded.len(), 4);
		assert!(loaded.contains(&b"reed".to_vec()));
	}
}
