//! Search command - fuzzy word lookup

use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

use crate::index::WordTree;
use crate::ui;

#[derive(Serialize)]
struct Hit {
	word: String,
	distance: usize,
}

pub fn run(query: &str, index: Option<&Path>, radius: usize, limit: usize, json: bool) -> Result<()> {
	let tree = super::finish_word_job(super::start_word_job(index)?, json)?;

	if json {
		let hits: Vec<Hit> = tree
			.search(&query.as_bytes().to_vec(), radius, limit)
			.map(|m| Hit {
				word: String::from_utf8_lossy(m.item).into_owned(),
				distance: m.distance,
			})
			.collect();
		println!("{}", serde_json::to_string_pretty(&hits)?);
		return Ok(());
	}

	ui::info(&format!("Searching for \"{}\" within {} edits", query, radius));
	if print_matches(&tree, query, radius, limit) == 0 {
		ui::warn("No matches found");
	}
	Ok(())
}

/// Print ranked matches, returning how many were shown
pub fn print_matches(tree: &WordTree, query: &str, radius: usize, limit: usize) -> usize {
	let start = Instant::now();
	let matches = tree.search(&query.as_bytes().to_vec(), radius, limit);
	let count = matches.len();

	for (i, found) in matches.enumerate() {
		println!(
			"{}. {} {}",
			format!("{:2}", i + 1).bright_blue().bold(),
			String::from_utf8_lossy(found.item).bright_white(),
			format!("d={}", found.distance).dimmed(),
		);
	}

	if count > 0 {
		println!(
			"\n{} {} in {}µs",
			"✓".bright_blue().bold(),
			format!("Found {} matches", count).bright_white(),
			start.elapsed().as_micros()
		);
	}
	count
}
