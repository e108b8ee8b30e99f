use chrono::NaiveDate;

use super::{EntryStore, RatingStore, Ratings};
use crate::entry::JournalEntry;
use crate::error::StoreError;
use crate::window::TimeWindow;

/// Entries and ratings held in memory. Used for snapshots and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub entries: Vec<JournalEntry>,
    pub ratings: Ratings,
}

impl MemoryStore {
    pub fn new(entries: Vec<JournalEntry>) -> Self {
        Self {
            entries,
            ratings: Ratings::new(),
        }
    }

    pub fn with_rating(mut self, day: NaiveDate, rating: f64) -> Self {
        self.ratings.insert(day, rating);
        self
    }
}

impl EntryStore for MemoryStore {
    fn fetch_entries(&self, window: &TimeWindow) -> Result<Vec<JournalEntry>, StoreError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| window.contains(e.timestamp))
            .cloned()
            .collect())
    }
}

impl RatingStore for MemoryStore {
    fn fetch_rating(&self, day: NaiveDate) -> Result<Option<f64>, StoreError> {
        Ok(self.ratings.get(&day).copied())
    }

    fn fetch_ratings(&self, window: &TimeWindow) -> Result<Ratings, StoreError> {
        Ok(self
            .ratings
            .iter()
            .filter(|(day, _)| window.overlaps_day(**day))
            .map(|(day, r)| (*day, *r))
            .collect())
    }
}
