//! # Command Implementations
//!
//! Each submodule handles one CLI command.

pub mod build;
pub mod distance;
pub mod hash;
pub mod repl;
pub mod search;
pub mod similar;

use anyhow::Result;
use std::path::Path;

use crate::config;
use crate::index::WordTree;
use crate::jobs::{self, Job};
use crate::ui;

/// Start loading `index`, or building from the configured word list
pub fn start_word_job(index: Option<&Path>) -> Result<Job<WordTree>> {
	match index {
		Some(path) => {
			ui::debug(&format!("Loading index {}", path.display()));
			jobs::spawn_load(path.to_path_buf())
		}
		None => {
			let words = config::words_path();
			ui::debug(&format!("Building from {}", words.display()));
			jobs::spawn_build(words)
		}
	}
}

/// Run a word job to completion, drawing progress unless `quiet`
pub fn finish_word_job(job: Job<WordTree>, quiet: bool) -> Result<WordTree> {
	let label = match job.name() {
		"load" => "Loading",
		_ => "Building",
	};
	if quiet {
		job.wait(|_| {})
	} else {
		job.wait(|snapshot| ui::progress(label, snapshot))
	}
}
