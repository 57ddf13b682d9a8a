//! bkfind - fuzzy word lookup and near-duplicate image search
//!
//! Command-line front end over the BK-tree library: builds word and image
//! indexes on background jobs and answers radius queries against them.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use bkfind::cli::{Cli, Command};
use bkfind::jobs::IndexOptions;
use bkfind::ui::{self, Log};
use bkfind::{commands, config};

fn main() {
	let cli = Cli::parse();

	Log::set_verbose(cli.verbose);
	if let Some(words) = cli.words.clone() {
		config::set_words_path(words);
	}

	if let Err(e) = run(cli.command) {
		ui::error(&format!("{:#}", e));
		std::process::exit(1);
	}
}

fn run(command: Command) -> Result<()> {
	match command {
		Command::Distance { a, b, json } => commands::distance::run(&a, &b, json),
		Command::Build { out } => commands::build::run(out.as_deref()),
		Command::Search { query, index, radius, limit, json } => {
			commands::search::run(&query, index.as_deref(), radius, limit, json)
		}
		Command::Similar {
			image,
			directory,
			radius,
			limit,
			recursive,
			no_cache,
			open,
			json,
		} => {
			let options = IndexOptions { recursive, use_cache: !no_cache };
			commands::similar::run(&image, &directory, radius, limit, options, open, json)
		}
		Command::Hash { images } => commands::hash::run(&images),
		Command::Repl { index } => commands::repl::run(index.as_deref()),
		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			match subcommand {
				Some(sub) => match cmd.find_subcommand_mut(&sub) {
					Some(sub_cmd) => sub_cmd.print_help()?,
					None => {
						ui::error(&format!("Unknown subcommand: {}", sub));
						cmd.print_help()?;
					}
				},
				None => cmd.print_help()?,
			}
			Ok(())
		}
	}
}
