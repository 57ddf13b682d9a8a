use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{DEFAULT_IMAGE_RADIUS, DEFAULT_LIMIT, DEFAULT_RADIUS};

fn styles() -> Styles {
	let blue = Some(Color::Ansi(AnsiColor::Blue));
	Styles::styled()
		.header(Style::new().bold().fg_color(blue))
		.usage(Style::new().bold().fg_color(blue))
		.literal(Style::new().fg_color(blue))
		.placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
		.valid(Style::new().fg_color(blue))
		.invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))))
}

#[derive(Parser, Debug)]
#[command(
	name = "bkfind",
	author,
	version,
	about = "Fuzzy word lookup and near-duplicate image search over BK-trees",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {bin} {distance} {distance_args}              {distance_desc}
  {bin} {build}    {build_args}          {build_desc}
  {bin} {search}   {search_args}        {search_desc}
  {bin} {similar}  {similar_args}  {similar_desc}
  {bin} {repl}                              {repl_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "bkfind".bright_blue(),
		distance = "distance".yellow(),
		distance_args = "kitten sitting",
		distance_desc = "Edit distance of two words".dimmed(),
		build = "build".yellow(),
		build_args = "-w words.txt",
		build_desc = "Save an index next to the list".dimmed(),
		search = "search".yellow(),
		search_args = "recieve -r 2",
		search_desc = "Words within 2 edits".dimmed(),
		similar = "similar".yellow(),
		similar_args = "cat.jpg -d ./photos",
		similar_desc = "Near-duplicate images".dimmed(),
		repl = "repl".yellow(),
		repl_desc = "Interactive session".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Word list to build from (default: $BKFIND_WORDS or words.txt)
	#[arg(short = 'w', long = "words", global = true, value_name = "PATH")]
	pub words: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Damerau-Levenshtein distance between two words
	Distance {
		a: String,
		b: String,

		/// Print JSON instead of text
		#[arg(long = "json")]
		json: bool,
	},

	/// Build a word index from the word list and save it
	Build {
		/// Output file (default: word list path with .bkt extension)
		#[arg(short = 'o', long = "out", value_name = "PATH")]
		out: Option<PathBuf>,
	},

	/// Find words within an edit radius of a query
	Search {
		#[arg(value_name = "QUERY")]
		query: String,

		/// Saved index to load instead of building from the word list
		#[arg(short = 'i', long = "index", value_name = "PATH")]
		index: Option<PathBuf>,

		/// Maximum edit distance
		#[arg(short = 'r', long = "radius", default_value_t = DEFAULT_RADIUS)]
		radius: usize,

		/// Maximum number of results
		#[arg(short = 'n', long = "limit", default_value_t = DEFAULT_LIMIT)]
		limit: usize,

		/// Print JSON instead of text
		#[arg(long = "json")]
		json: bool,
	},

	/// Find images that look like a reference image
	Similar {
		/// Reference image
		#[arg(value_name = "IMAGE")]
		image: PathBuf,

		/// Directory to search
		#[arg(short = 'd', long = "dir", default_value = ".")]
		directory: PathBuf,

		/// Maximum Hamming distance between fingerprints (0-64)
		#[arg(short = 'r', long = "radius", default_value_t = DEFAULT_IMAGE_RADIUS)]
		radius: usize,

		/// Maximum number of results
		#[arg(short = 'n', long = "limit", default_value_t = DEFAULT_LIMIT)]
		limit: usize,

		/// Search directories recursively
		#[arg(short = 'R', long = "recursive")]
		recursive: bool,

		/// Ignore and do not update the fingerprint cache
		#[arg(long = "no-cache")]
		no_cache: bool,

		/// Open best match in default viewer
		#[arg(short = 'o', long = "open")]
		open: bool,

		/// Print JSON instead of text
		#[arg(long = "json")]
		json: bool,
	},

	/// Print perceptual hashes of images
	Hash {
		#[arg(value_name = "IMAGE", required = true)]
		images: Vec<PathBuf>,
	},

	/// Interactive session: build in the background, query when ready
	Repl {
		/// Saved index to load instead of building from the word list
		#[arg(short = 'i', long = "index", value_name = "PATH")]
		index: Option<PathBuf>,
	},

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}
