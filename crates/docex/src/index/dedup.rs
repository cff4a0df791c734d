use crate::category::Category;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The first file written for a given content digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTracker {
    pub hash: String,
    pub display_name: String,
    pub size_bytes: u64,
    pub path: PathBuf,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// The caller is the first writer for this digest and must write the file,
    /// then `commit` or `release` the claim.
    Inserted,
    /// Another row already wrote a file with this digest.
    Duplicate(FileTracker),
    /// Another row claimed this digest and has not finished writing yet.
    Pending,
}

#[derive(Debug)]
struct Slot {
    tracker: FileTracker,
    committed: bool,
}

/// Run-wide map from content digest to the first file written with it.
///
/// Shared by every category of a run, including categories running on
/// separate threads. `try_insert` holds the shard lock while it checks and
/// inserts, so exactly one caller wins per digest. A claim only counts as a
/// duplicate source once its writer commits it.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    entries: DashMap<String, Slot>,
}

impl DuplicateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed file for `hash`, if any.
    pub fn try_get(&self, hash: &str) -> Option<FileTracker> {
        self.entries
            .get(hash)
            .filter(|slot| slot.committed)
            .map(|slot| slot.tracker.clone())
    }

    pub fn try_insert(&self, hash: &str, tracker: FileTracker) -> InsertOutcome {
        match self.entries.entry(hash.to_string()) {
            Entry::Occupied(existing) if existing.get().committed => {
                InsertOutcome::Duplicate(existing.get().tracker.clone())
            }
            Entry::Occupied(_) => InsertOutcome::Pending,
            Entry::Vacant(slot) => {
                slot.insert(Slot {
                    tracker,
                    committed: false,
                });
                InsertOutcome::Inserted
            }
        }
    }

    /// Marks the claim on `hash` as written.
    pub fn commit(&self, hash: &str) {
        if let Some(mut slot) = self.entries.get_mut(hash) {
            slot.committed = true;
        }
    }

    /// Drops a claim whose file could not be written, so a row waiting on it
    /// or a later row with the same bytes gets another chance.
    pub fn release(&self, hash: &str) -> Option<FileTracker> {
        self.entries.remove(hash).map(|(_, slot)| slot.tracker)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reset(&self) {
        self.entries.clear();
    }
}
