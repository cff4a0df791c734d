pub mod dedup;
pub mod hasher;

pub use dedup::{DuplicateIndex, FileTracker, InsertOutcome};
pub use hasher::hash_bytes_blake3;
