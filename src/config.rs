//! Application configuration and constants

use std::path::PathBuf;
use std::sync::OnceLock;

static CUSTOM_WORDS: OnceLock<PathBuf> = OnceLock::new();

// === Tree Geometry ===
/// Child slots per node of a word tree. Persisted word trees depend on it.
pub const WORD_BUCKETS: usize = 256;
/// Child slots per node of an image tree: one per possible Hamming distance.
pub const IMAGE_BUCKETS: usize = 65;

// === Perceptual Hash ===
pub const HASH_SIZE: usize = 32;
pub const HASH_BLOCK: usize = 8;

// === Files ===
pub const DEFAULT_WORDS: &str = "words.txt";
pub const WORDS_ENV: &str = "BKFIND_WORDS";
pub const INDEX_EXT: &str = "bkt";
pub const CACHE_DIR: &str = ".bkfind";
pub const CACHE_FILE: &str = "hashes.msgpack";
/// Bytes read from the start of a file to key the fingerprint cache
pub const CACHE_KEY_BYTES: usize = 65536;

pub const IMAGE_EXTENSIONS: &[&str] = &[
	"jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif", "ico", "avif",
];

// === Search Defaults ===
pub const DEFAULT_RADIUS: usize = 2;
pub const DEFAULT_LIMIT: usize = 20;
pub const DEFAULT_IMAGE_RADIUS: usize = 10;

// === Jobs ===
/// How often the terminal polls a running job for progress
pub const POLL_INTERVAL_MS: u64 = 50;

pub fn set_words_path(path: PathBuf) {
	let _ = CUSTOM_WORDS.set(path);
}

/// Word list location: `--words`, then `BKFIND_WORDS`, then `words.txt`
pub fn words_path() -> PathBuf {
	if let Some(custom) = CUSTOM_WORDS.get() {
		crate::ui::debug(&format!("Using word list: {}", custom.display()));
		return custom.clone();
	}

	if let Ok(env_path) = std::env::var(WORDS_ENV) {
		if !env_path.trim().is_empty() {
			crate::ui::debug(&format!("Using {}: {}", WORDS_ENV, env_path));
			return PathBuf::from(env_path);
		}
	}

	PathBuf::from(DEFAULT_WORDS)
}

/// True if the extension is one the image decoder is expected to handle
pub fn is_image_path(path: &std::path::Path) -> bool {
	path.extension()
		.and_then(|e| e.to_str())
		.map(|ext| IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
		.unwrap_or(false)
}
