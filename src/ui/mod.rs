//! # User Interface
//!
//! Colored terminal output, progress bars, and clickable file links.

pub mod log;

pub use log::{debug, error, header, info, path_link, print_logo, progress, success, warn, Log};
