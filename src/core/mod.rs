//! Core domain types

pub mod distance;
pub mod item;
pub mod phash;

pub use distance::{edit_distance, hash_distance};
pub use item::ImageItem;
pub use phash::{DecodeError, PerceptualHash};
