//! Build command - index a word list and save it

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::{self, INDEX_EXT};
use crate::{jobs, storage, ui};

pub fn run(out: Option<&Path>) -> Result<()> {
	let start = Instant::now();
	let words = config::words_path();
	let out: PathBuf = out.map(Path::to_path_buf).unwrap_or_else(|| words.with_extension(INDEX_EXT));

	ui::info(&format!("Building index from {}", words.display()));
	let tree = super::finish_word_job(jobs::spawn_build(words)?, false)?;

	if tree.is_empty() {
		ui::warn("Word list is empty");
	}

	storage::save(&tree, &out)?;
	ui::success(&format!(
		"Indexed {} words (depth {}) in {:.2}s",
		tree.len(),
		tree.depth(),
		start.elapsed().as_secs_f32()
	));
	ui::info(&format!("Saved to {}", ui::path_link(&out, 60)));
	Ok(())
}
