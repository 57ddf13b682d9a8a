//! Similar command - near-duplicate image search

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::core::ImageItem;
use crate::jobs::{self, IndexOptions};
use crate::ui;

#[derive(Serialize)]
struct Hit<'a> {
	path: &'a Path,
	hash: String,
	distance: usize,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
	image: &Path,
	dir: &Path,
	radius: usize,
	limit: usize,
	options: IndexOptions,
	open_first: bool,
	json: bool,
) -> Result<()> {
	let start = Instant::now();
	let query = ImageItem::open(image).context("Failed to fingerprint reference image")?;

	if !json {
		ui::info(&format!("Fingerprint of {}: {}", query.file_name(), query.hash));
	}

	let job = jobs::spawn_index(dir.to_path_buf(), options)?;
	let index = if json {
		job.wait(|_| {})?
	} else {
		job.wait(|snapshot| ui::progress("Fingerprinting", snapshot))?
	};

	let matches = index.tree.search(&query, radius, limit);

	if json {
		let hits: Vec<Hit> = matches
			.map(|m| Hit {
				path: &m.item.path,
				hash: m.item.hash.to_string(),
				distance: m.distance,
			})
			.collect();
		println!("{}", serde_json::to_string_pretty(&hits)?);
		return Ok(());
	}

	ui::success(&format!(
		"Indexed {} images in {:.2}s ({} cached, {} duplicates, {} skipped)",
		index.indexed,
		start.elapsed().as_secs_f32(),
		index.cached,
		index.duplicates,
		index.skipped
	));

	if matches.is_empty() {
		ui::warn("No similar images found");
		return Ok(());
	}

	let mut best: Option<PathBuf> = None;
	for (i, found) in matches.enumerate() {
		best.get_or_insert_with(|| found.item.path.clone());
		println!(
			"{}. {} {}",
			format!("{:2}", i + 1).bright_blue().bold(),
			ui::path_link(&found.item.path, 100).bright_blue(),
			format!("d={}", found.distance).dimmed(),
		);
	}

	if let Some(best) = best.filter(|_| open_first) {
		ui::info(&format!("Opening: {}", best.display()));
		if let Err(e) = open::that(&best) {
			ui::warn(&format!("Failed to open: {}", e));
		}
	}

	println!();
	Ok(())
}
