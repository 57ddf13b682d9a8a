//! Image directory indexing job

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use walkdir::WalkDir;

use super::{Job, Progress};
use crate::config::{is_image_path, CACHE_DIR};
use crate::core::{ImageItem, PerceptualHash};
use crate::index::ImageTree;
use crate::storage::{FileKey, HashCache};
use crate::ui;

#[derive(Debug, Clone)]
pub struct IndexOptions {
	/// Descend into subdirectories
	pub recursive: bool,
	/// Read and update the fingerprint cache
	pub use_cache: bool,
}

impl Default for IndexOptions {
	fn default() -> Self {
		Self { recursive: false, use_cache: true }
	}
}

/// Result of indexing a directory
#[derive(Debug, Default)]
pub struct ImageIndex {
	pub tree: ImageTree,
	/// Images inserted into the tree
	pub indexed: usize,
	/// Images whose fingerprint matched one already in the tree
	pub duplicates: usize,
	/// Entries that could not be decoded
	pub skipped: usize,
	/// Fingerprints served from the cache
	pub cached: usize,
}

enum Fingerprint {
	Cached(PerceptualHash),
	Fresh(Option<FileKey>, PerceptualHash),
	Failed,
	/// Not reached before cancellation
	Unvisited,
}

/// Index `dir` on a worker
pub fn spawn_index(dir: PathBuf, options: IndexOptions) -> Result<Job<ImageIndex>> {
	Job::spawn("index", move |progress| index_directory(&dir, &options, progress))
}

/// Fingerprint every file in `dir` and build an image tree.
///
/// `total` is the number of entries. Undecodable entries are skipped and
/// counted. On cancellation the entries fingerprinted so far are still
/// inserted.
pub fn index_directory(dir: &Path, options: &IndexOptions, progress: &Progress) -> Result<ImageIndex> {
	let entries = list_entries(dir, options.recursive)?;
	progress.set_total(entries.len() as u64);
	ui::debug(&format!("Found {} entries in {}", entries.len(), dir.display()));

	let mut cache = if options.use_cache {
		Some(HashCache::load_or_default(dir))
	} else {
		None
	};

	let fingerprints: Vec<Fingerprint> = entries
		.par_iter()
		.map(|path| {
			if progress.is_cancelled() {
				return Fingerprint::Unvisited;
			}
			let result = fingerprint(path, cache.as_ref());
			progress.advance(1);
			result
		})
		.collect();

	let mut index = ImageIndex::default();
	let mut fresh = 0;

	for (path, fingerprint) in entries.into_iter().zip(fingerprints) {
		let hash = match fingerprint {
			Fingerprint::Cached(hash) => {
				index.cached += 1;
				hash
			}
			Fingerprint::Fresh(key, hash) => {
				if let (Some(cache), Some(key)) = (cache.as_mut(), key) {
					cache.insert(key, hash);
					fresh += 1;
				}
				hash
			}
			Fingerprint::Failed => {
				index.skipped += 1;
				continue;
			}
			Fingerprint::Unvisited => continue,
		};

		if index.tree.insert(ImageItem::new(path, hash)) {
			index.indexed += 1;
		} else {
			index.duplicates += 1;
		}
	}

	if let Some(cache) = cache.as_mut().filter(|_| fresh > 0) {
		if let Err(e) = cache.save(dir) {
			ui::warn(&format!("Could not update hash cache: {:#}", e));
		}
	}

	Ok(index)
}

/// Files directly in `dir` (or below it when `recursive`), sorted by name,
/// excluding the cache directory. Symlinks are followed.
pub fn list_entries(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
	fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;

	let mut walker = WalkDir::new(dir).min_depth(1).follow_links(true).sort_by_file_name();
	if !recursive {
		walker = walker.max_depth(1);
	}

	let mut entries = Vec::new();
	let walk = walker
		.into_iter()
		.filter_entry(|e| e.file_name() != OsStr::new(CACHE_DIR));
	for entry in walk {
		match entry {
			Ok(entry) if entry.file_type().is_file() => entries.push(entry.into_path()),
			Ok(entry) if entry.file_type().is_dir() => {}
			Ok(entry) => ui::debug(&format!("Skipping non-file entry: {}", entry.path().display())),
			Err(e) => ui::debug(&format!("Skipping unreadable entry: {}", e)),
		}
	}
	Ok(entries)
}

fn fingerprint(path: &Path, cache: Option<&HashCache>) -> Fingerprint {
	let key = FileKey::compute(path).ok();
	if let (Some(cache), Some(key)) = (cache, key) {
		if let Some(hash) = cache.get(key) {
			return Fingerprint::Cached(hash);
		}
	}

	match PerceptualHash::from_path(path) {
		Ok(hash) => Fingerprint::Fresh(key, hash),
		Err(e) => {
			if is_image_path(path) {
				ui::warn(&format!("Skipped {}", e));
			} else {
				ui::debug(&format!("Skipped {}", e));
			}
			Fingerprint::Failed
		}
	}
}
