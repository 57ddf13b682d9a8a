//! Distance command - edit distance between two words

use anyhow::Result;
use colored::*;
use serde::Serialize;

use crate::core::edit_distance;

#[derive(Serialize)]
struct Output<'a> {
	a: &'a str,
	b: &'a str,
	distance: usize,
}

pub fn run(a: &str, b: &str, json: bool) -> Result<()> {
	let distance = edit_distance(a.as_bytes(), b.as_bytes());

	if json {
		println!("{}", serde_json::to_string(&Output { a, b, distance })?);
	} else {
		println!(
			"{} {} {} {}",
			a.bright_white(),
			"↔".dimmed(),
			b.bright_white(),
			distance.to_string().bright_blue().bold()
		);
	}
	Ok(())
}
