//! Index persistence

pub mod cache;
pub mod codec;

pub use cache::{FileKey, HashCache};
pub use codec::{decode, encode, load, load_with, save, CodecError};
