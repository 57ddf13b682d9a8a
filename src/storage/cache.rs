//! Fingerprint cache for image directories
//!
//! Stored as MessagePack in `<dir>/.bkfind/hashes.msgpack`, mapping a
//! content key of each file to its perceptual hash, so re-indexing a
//! directory only decodes new or changed images.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::config::{CACHE_DIR, CACHE_FILE, CACHE_KEY_BYTES};
use crate::core::PerceptualHash;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Content key: xxh3 of the first 64KB, seeded with the file length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileKey(u64);

impl FileKey {
	pub fn compute(path: &Path) -> std::io::Result<Self> {
		let mut file = File::open(path)?;
		let len = file.metadata()?.len();
		let mut buffer = Vec::with_capacity(CACHE_KEY_BYTES);
		file.by_ref().take(CACHE_KEY_BYTES as u64).read_to_end(&mut buffer)?;
		Ok(Self(xxh3_64_with_seed(&buffer, len)))
	}
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HashCache {
	version: String,
	updated: String,
	entries: HashMap<u64, u64>,
}

impl HashCache {
	pub fn new() -> Self {
		Self {
			version: VERSION.to_string(),
			updated: chrono::Utc::now().to_rfc3339(),
			entries: HashMap::new(),
		}
	}

	pub fn path(dir: &Path) -> PathBuf {
		dir.join(CACHE_DIR).join(CACHE_FILE)
	}

	pub fn load(dir: &Path) -> Result<Self> {
		let bytes = fs::read(Self::path(dir)).context("Failed to read hash cache")?;
		rmp_serde::from_slice(&bytes).context("Failed to deserialize hash cache")
	}

	/// Load the cache for `dir`, falling back to an empty one if it is
	/// missing, unreadable, or written by another version.
	pub fn load_or_default(dir: &Path) -> Self {
		match Self::load(dir) {
			Ok(cache) if cache.is_current_version() => {
				crate::ui::debug(&format!("Hash cache: {} entries ({})", cache.len(), cache.updated));
				cache
			}
			Ok(cache) => {
				crate::ui::debug(&format!("Ignoring hash cache from v{}", cache.version));
				Self::new()
			}
			Err(e) => {
				crate::ui::debug(&format!("No usable hash cache: {:#}", e));
				Self::new()
			}
		}
	}

	pub fn save(&mut self, dir: &Path) -> Result<()> {
		let path = Self::path(dir);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).context("Failed to create cache directory")?;
		}
		self.updated = chrono::Utc::now().to_rfc3339();
		let bytes = rmp_serde::to_vec(self).context("Failed to serialize hash cache")?;
		fs::write(&path, bytes).context("Failed to write hash cache")?;
		Ok(())
	}

	pub fn get(&self, key: FileKey) -> Option<PerceptualHash> {
		self.entries.get(&key.0).copied().map(PerceptualHash::from_bits)
	}

	pub fn insert(&mut self, key: FileKey, hash: PerceptualHash) {
		self.entries.insert(key.0, hash.bits());
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn is_current_version(&self) -> bool {
		self.version == VERSION
	}
}

impl Default for HashCache {
	fn default() -> Self {
		Self::new()
	}
}
