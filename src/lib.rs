//! # bkfind Library
//!
//! Metric-tree lookups for words (Damerau-Levenshtein) and images (perceptual
//! hash, Hamming distance). Provides the BK-tree engine, a text codec for word
//! trees, and cancellable background jobs for building indexes.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod index;
pub mod jobs;
pub mod storage;
pub mod ui;

pub use crate::core::{edit_distance, hash_distance, ImageItem, PerceptualHash};
pub use crate::index::{BkTree, ImageTree, Match, Matches, Metric, WordTree};
pub use crate::jobs::{Job, Progress, ProgressSnapshot};
