//! Word tree jobs: build from a word list, load from a saved index

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{Job, Progress};
use crate::index::WordTree;
use crate::storage;

/// Build a word tree from a newline-delimited list on a worker
pub fn spawn_build(path: PathBuf) -> Result<Job<WordTree>> {
	Job::spawn("build", move |progress| build_from_file(&path, progress))
}

/// Load a saved word tree on a worker
pub fn spawn_load(path: PathBuf) -> Result<Job<WordTree>> {
	Job::spawn("load", move |progress| storage::load_with(&path, progress))
}

/// Read the whole list up front, so an unreadable file fails before any
/// tree exists. Progress is measured in bytes.
pub fn build_from_file(path: &Path, progress: &Progress) -> Result<WordTree> {
	let bytes = fs::read(path).with_context(|| format!("Failed to read word list {}", path.display()))?;
	progress.set_total(bytes.len() as u64);
	Ok(build_from_bytes(&bytes, progress))
}

/// Insert every non-empty line of `bytes`, checking for cancellation before
/// each line. Lines are kept as raw bytes with ASCII whitespace trimmed, so
/// any encoding is indexed exactly as written.
pub fn build_from_bytes(bytes: &[u8], progress: &Progress) -> WordTree {
	let mut tree = WordTree::new();
	let mut offset = 0usize;

	for line in bytes.split(|&b| b == b'\n') {
		if progress.is_cancelled() {
			crate::ui::debug(&format!("Build cancelled after {} words", tree.len()));
			break;
		}

		offset = (offset + line.len() + 1).min(bytes.len());
		let word = line.trim_ascii();
		if !word.is_empty() {
			tree.insert(word.to_vec());
		}
		progress.set_completed(offset as u64);
	}

	tree
}
