//! Unified logging system

use colored::*;
use rand::Rng;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::jobs::ProgressSnapshot;

static VERBOSE: AtomicBool = AtomicBool::new(false);

const LOGO: &str = r#"
    __    __   _____           __
   / /_  / /__/ __(_)___  ____/ /
  / __ \/ //_/ /_/ / __ \/ __  / 
 / /_/ / ,< / __/ / / / / /_/ /  
/_.___/_/|_/_/ /_/_/ /_/\__,_/   "#;

const SLOGANS: &[&str] = &[
	"Close enough is good enough",
	"Two typos walk into a tree...",
	"Teh quick borwn fox, found anyway",
	"Every word is at most 256 hops away",
	"Triangle inequality, doing the heavy lifting",
	"Your duplicates called. They look familiar",
	"64 bits of vibes per image",
	"Levenshtein would be proud. Damerau too",
];

const BAR_WIDTH: usize = 30;

pub fn random_slogan() -> &'static str {
	let idx = rand::rng().random_range(0..SLOGANS.len());
	SLOGANS[idx]
}

pub fn print_logo() {
	println!("{}", LOGO.bright_blue().bold());
	println!("{}", random_slogan().dimmed().italic());
}

pub struct Log;

impl Log {
	pub fn set_verbose(enabled: bool) {
		VERBOSE.store(enabled, Ordering::Relaxed);
	}

	pub fn is_verbose() -> bool {
		VERBOSE.load(Ordering::Relaxed)
	}
}

pub fn info(msg: &str) {
	println!("{} {}", "ℹ".bright_blue().bold(), msg.bright_white());
}

pub fn success(msg: &str) {
	println!("{} {}", "✓".bright_green().bold(), msg.bright_white());
}

/// Diagnostics go to stderr, keeping stdout for results.
pub fn warn(msg: &str) {
	eprintln!("{} {}", "⚠".bright_yellow().bold(), msg.bright_white());
}

pub fn error(msg: &str) {
	eprintln!("{} {}", "✗".bright_red().bold(), msg.bright_white());
}

pub fn debug(msg: &str) {
	if Log::is_verbose() {
		eprintln!("{} {}", "⚙".bright_black().bold(), msg.dimmed());
	}
}

pub fn header(text: &str) {
	println!("\n{}", text.bright_blue().bold());
}

/// Redraw a single-line progress bar in place
pub fn progress(label: &str, snapshot: ProgressSnapshot) {
	let filled = (snapshot.fraction() * BAR_WIDTH as f32) as usize;
	let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
	print!(
		"\r{} {} {} {}",
		"⏳".bright_blue(),
		label.bright_white(),
		bar.bright_blue(),
		format!("{:>3}%", snapshot.percent()).dimmed()
	);
	let _ = std::io::stdout().flush();
	if snapshot.done {
		println!();
	}
}

/// Clickable file path (OSC 8 terminal hyperlink)
pub fn path_link(path: &std::path::Path, max_len: usize) -> String {
	let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

	let uri = if cfg!(windows) {
		let path_str = absolute.to_string_lossy();
		let cleaned = path_str.strip_prefix(r"\\?\").unwrap_or(&path_str);
		format!("file:///{}", cleaned.replace('\\', "/"))
	} else {
		format!("file://{}", absolute.display())
	};

	let filename = path
		.file_name()
		.and_then(|n| n.to_str())
		.unwrap_or("unknown");

	let display_name = if filename.chars().count() > max_len {
		let head: String = filename.chars().take(max_len / 2).collect();
		let tail_len = max_len / 2 - 3;
		let tail: String = filename.chars().rev().take(tail_len).collect::<Vec<_>>().into_iter().rev().collect();
		format!("{}...{}", head, tail)
	} else {
		filename.to_string()
	};

	format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", uri, display_name)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn long_names_are_shortened_on_char_boundaries() {
		let link = path_link(std::path::Path::new("ééééééééééééééééééééééé.png"), 10);
		assert!(link.contains("ééééé...ng"), "{link}");
	}

	#[test]
	fn verbose_flag_round_trips() {
		Log::set_verbose(true);
		assert!(Log::is_verbose());
		Log::set_verbose(false);
		assert!(!Log::is_verbose());
	}
}
