//! Read interfaces for entries and day ratings, and the stores behind them.
mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use chrono::NaiveDate;
use log::debug;
use std::collections::{BTreeMap, HashSet};

use crate::entry::JournalEntry;
use crate::error::StoreError;
use crate::window::TimeWindow;

/// Day ratings keyed by calendar day.
pub type Ratings = BTreeMap<NaiveDate, f64>;

pub trait EntryStore {
    /// Entries whose timestamp lies in `window`. Order is unspecified.
    fn fetch_entries(&self, window: &TimeWindow) -> Result<Vec<JournalEntry>, StoreError>;
}

pub trait RatingStore {
    fn fetch_rating(&self, day: NaiveDate) -> Result<Option<f64>, StoreError>;

    /// Ratings for every day that overlaps `window`.
    fn fetch_ratings(&self, window: &TimeWindow) -> Result<Ratings, StoreError>;
}

/// Union of two entry lists with duplicate ids removed.
///
/// The first occurrence of an id wins, so passing the remote list first makes
/// remote copies take precedence over the local cache.
pub fn merge_sources(remote: Vec<JournalEntry>, local: Vec<JournalEntry>) -> Vec<JournalEntry> {
    let total = remote.len() + local.len();
    let merged = dedup_by_id(remote.into_iter().chain(local));
    if merged.len() < total {
        debug!("dropped {} duplicate entries while merging sources", total - merged.len());
    }
    merged
}

/// Keeps the first entry seen for each id, preserving input order.
pub fn dedup_by_id(entries: impl IntoIterator<Item = JournalEntry>) -> Vec<JournalEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.id.clone()))
        .collect()
}

/// An [`EntryStore`] over a remote source and a local cache.
/// A failure of either side fails the whole fetch.
pub struct MergedStore<R, L> {
    pub remote: R,
    pub local: L,
}

impl<R: EntryStore, L: EntryStore> EntryStore for MergedStore<R, L> {
    fn fetch_entries(&self, window: &TimeWindow) -> Result<Vec<JournalEntry>, StoreError> {
        let remote = self.remote.fetch_entries(window)?;
        let local = self.local.fetch_entries(window)?;
        Ok(merge_sources(remote, local))
    }
}
