//! Indexed item types

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::phash::{DecodeError, PerceptualHash};

/// An image path paired with its precomputed fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageItem {
	pub path: PathBuf,
	pub hash: PerceptualHash,
}

impl ImageItem {
	pub fn new(path: PathBuf, hash: PerceptualHash) -> Self {
		Self { path, hash }
	}

	/// Decode `path` and fingerprint it
	pub fn open(path: &Path) -> Result<Self, DecodeError> {
		let hash = PerceptualHash::from_path(path)?;
		Ok(Self::new(path.to_path_buf(), hash))
	}

	pub fn file_name(&self) -> &str {
		self.path
			.file_name()
			.and_then(|n| n.to_str())
			.unwrap_or("unknown")
	}
}
