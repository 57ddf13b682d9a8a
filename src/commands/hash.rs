//! Hash command - print perceptual hashes

use anyhow::{bail, Result};
use colored::*;
use std::path::PathBuf;

use crate::core::PerceptualHash;
use crate::ui;

pub fn run(images: &[PathBuf]) -> Result<()> {
	let mut hashes = Vec::with_capacity(images.len());
	let mut failed = 0;

	for path in images {
		match PerceptualHash::from_path(path) {
			Ok(hash) => {
				println!("{}  {}", hash.to_string().bright_blue(), ui::path_link(path, 80));
				hashes.push(hash);
			}
			Err(e) => {
				ui::error(&e.to_string());
				failed += 1;
			}
		}
	}

	if let [a, b] = hashes.as_slice() {
		println!("{} {}", "distance".dimmed(), a.distance(b).to_string().bright_white().bold());
	}

	if failed > 0 {
		bail!("{} of {} images could not be hashed", failed, images.len());
	}
	Ok(())
}
