//! REPL mode - interactive session over a background build

use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{DEFAULT_LIMIT, DEFAULT_RADIUS};
use crate::core::edit_distance;
use crate::index::WordTree;
use crate::jobs::{self, Job};
use crate::ui;

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
	Query(&'a str),
	Distance(&'a str, &'a str),
	Progress,
	Cancel,
	Build(Option<&'a str>),
	Radius(usize),
	Limit(usize),
	Help,
	Quit,
	Invalid(&'a str),
	Empty,
}

impl<'a> Input<'a> {
	fn parse(line: &'a str) -> Self {
		let line = line.trim();
		if line.is_empty() {
			return Input::Empty;
		}
		let Some(command) = line.strip_prefix(':') else {
			return Input::Query(line);
		};

		let mut parts = command.split_whitespace();
		match (parts.next(), parts.next(), parts.next()) {
			(Some("q" | "quit" | "exit"), None, _) => Input::Quit,
			(Some("help" | "h"), None, _) => Input::Help,
			(Some("progress" | "p"), None, _) => Input::Progress,
			(Some("cancel"), None, _) => Input::Cancel,
			(Some("build"), path, None) => Input::Build(path),
			(Some("dist" | "d"), Some(a), Some(b)) if parts.next().is_none() => Input::Distance(a, b),
			(Some("radius" | "r"), Some(n), None) => n.parse().map(Input::Radius).unwrap_or(Input::Invalid(line)),
			(Some("limit" | "n"), Some(n), None) => n.parse().map(Input::Limit).unwrap_or(Input::Invalid(line)),
			_ => Input::Invalid(line),
		}
	}
}

enum State {
	Empty,
	Pending(Job<WordTree>),
	Ready(WordTree),
}

struct Session {
	state: State,
	radius: usize,
	limit: usize,
}

impl Session {
	/// Collect a finished job. With `block`, wait for an unfinished one.
	fn settle(&mut self, block: bool) {
		match &self.state {
			State::Pending(job) if block || job.is_done() => {}
			_ => return,
		}
		let State::Pending(job) = std::mem::replace(&mut self.state, State::Empty) else {
			return;
		};

		let cancelled = job.progress().is_cancelled();
		match super::finish_word_job(job, !block) {
			Ok(tree) => {
				if cancelled {
					ui::warn(&format!("Build cancelled, kept {} words", tree.len()));
				} else {
					ui::success(&format!("Index ready: {} words", tree.len()));
				}
				self.state = State::Ready(tree);
			}
			Err(e) => ui::error(&format!("{:#}", e)),
		}
	}

	fn start(&mut self, job: Job<WordTree>) {
		// Dropping a pending job cancels and joins it.
		self.state = State::Pending(job);
	}
}

pub fn run(index: Option<&Path>) -> Result<()> {
	ui::print_logo();
	ui::info("Type a word to search, :help for commands");
	println!();

	let mut session = Session {
		state: State::Pending(super::start_word_job(index)?),
		radius: DEFAULT_RADIUS,
		limit: DEFAULT_LIMIT,
	};

	let stdin = io::stdin();
	let mut line = String::new();
	loop {
		session.settle(false);
		print!("{} ", "bkfind>".bright_blue().bold());
		io::stdout().flush()?;

		line.clear();
		if stdin.read_line(&mut line)? == 0 {
			println!();
			break;
		}

		match Input::parse(&line) {
			Input::Empty => continue,
			Input::Quit => break,
			Input::Help => show_help(),
			Input::Distance(a, b) => {
				println!("{}", edit_distance(a.as_bytes(), b.as_bytes()).to_string().bright_white().bold());
			}
			Input::Progress => match &session.state {
				State::Pending(job) => ui::progress(job.name(), job.snapshot()),
				State::Ready(tree) => ui::info(&format!("Index ready: {} words", tree.len())),
				State::Empty => ui::info("No index. Use :build"),
			},
			Input::Cancel => match &session.state {
				State::Pending(job) => {
					job.cancel();
					session.settle(true);
				}
				_ => ui::info("Nothing to cancel"),
			},
			Input::Build(path) => {
				let words = path.map(PathBuf::from).unwrap_or_else(crate::config::words_path);
				ui::info(&format!("Building from {}", words.display()));
				session.start(jobs::spawn_build(words)?);
			}
			Input::Radius(radius) => {
				session.radius = radius;
				ui::info(&format!("Radius set to {}", radius));
			}
			Input::Limit(limit) => {
				session.limit = limit;
				ui::info(&format!("Limit set to {}", limit));
			}
			Input::Invalid(text) => ui::warn(&format!("Unknown command: {}", text)),
			Input::Query(query) => {
				session.settle(true);
				match &session.state {
					State::Ready(tree) => {
						if super::search::print_matches(tree, query, session.radius, session.limit) == 0 {
							ui::warn("No matches found");
						}
					}
					_ => ui::warn("No index to search. Use :build"),
				}
			}
		}
		println!();
	}

	ui::info("Goodbye!");
	Ok(())
}

fn show_help() {
	ui::header("REPL Commands:");
	println!("  {}          Search within the current radius", "<word>".dimmed());
	println!("  {}   Edit distance between two words", ":dist a b".dimmed());
	println!("  {}     Show build progress", ":progress".dimmed());
	println!("  {}       Stop the build, keep what is indexed", ":cancel".dimmed());
	println!("  {} Rebuild from a word list", ":build [path]".dimmed());
	println!("  {}    Set search radius", ":radius N".dimmed());
	println!("  {}     Set result limit", ":limit N".dimmed());
	println!("  {}         Exit", ":quit".dimmed());
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn plain_text_is_a_query() {
		assert_eq!(Input::parse("  recieve \n"), Input::Query("recieve"));
		assert_eq!(Input::parse("two words"), Input::Query("two words"));
		assert_eq!(Input::parse("   "), Input::Empty);
	}

	#[test]
	fn commands() {
		assert_eq!(Input::parse(":q"), Input::Quit);
		assert_eq!(Input::parse(":dist kitten sitting"), Input::Distance("kitten", "sitting"));
		assert_eq!(Input::parse(":build"), Input::Build(None));
		assert_eq!(Input::parse(":build big.txt"), Input::Build(Some("big.txt")));
		assert_eq!(Input::parse(":radius 3"), Input::Radius(3));
		assert_eq!(Input::parse(":cancel"), Input::Cancel);
	}

	#[test]
	fn malformed_commands() {
		assert!(matches!(Input::parse(":dist one"), Input::Invalid(_)));
		assert!(matches!(Input::parse(":dist a b c"), Input::Invalid(_)));
		assert!(matches!(Input::parse(":radius far"), Input::Invalid(_)));
		assert!(matches!(Input::parse(":nope"), Input::Invalid(_)));
	}

	#[test]
	fn cancelled_build_keeps_partial_tree() {
		let progress = std::sync::Arc::new(jobs::Progress::new());
		progress.cancel();
		let job = Job::spawn_with("build", progress, |p| Ok(jobs::words::build_from_bytes(b"a\nb\n", p))).unwrap();
		let mut session = Session { state: State::Pending(job), radius: 2, limit: 20 };
		session.settle(true);
		assert!(matches!(session.state, State::Ready(ref tree) if tree.is_empty()));
	}
}
