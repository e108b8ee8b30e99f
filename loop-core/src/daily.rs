//! Groups a day's entries into daily / thematic / follow-up buckets.

use chrono::NaiveDate;
use log::debug;

use crate::entry::{EntryKind, JournalEntry};
use crate::error::Result;
use crate::store::{EntryStore, RatingStore, dedup_by_id};
use crate::window::TimeWindow;

/// Everything recorded on one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub daily_loops: Vec<JournalEntry>,
    pub thematic_loops: Vec<JournalEntry>,
    pub follow_up_loops: Vec<JournalEntry>,
    pub rating: Option<f64>,
}

impl DayActivity {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            daily_loops: Vec::new(),
            thematic_loops: Vec::new(),
            follow_up_loops: Vec::new(),
            rating: None,
        }
    }

    /// No entries and no rating: the "no entries found" state.
    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0 && self.rating.is_none()
    }

    pub fn entry_count(&self) -> usize {
        self.daily_loops.len() + self.thematic_loops.len() + self.follow_up_loops.len()
    }

    pub fn bucket(&self, kind: EntryKind) -> &[JournalEntry] {
        match kind {
            EntryKind::Daily => &self.daily_loops,
            EntryKind::Thematic => &self.thematic_loops,
            EntryKind::FollowUp => &self.follow_up_loops,
        }
    }
}

pub struct DailyAggregator;

impl DailyAggregator {
    /// Partitions one day's entries.
    ///
    /// Duplicate ids are dropped (first occurrence kept) before partitioning.
    /// Each bucket is sorted by timestamp, then id.
    pub fn categorize(
        date: NaiveDate,
        entries: impl IntoIterator<Item = JournalEntry>,
        rating: Option<f64>,
    ) -> DayActivity {
        let mut activity = DayActivity::empty(date);
        activity.rating = rating;

        for entry in dedup_by_id(entries) {
            match entry.kind() {
                EntryKind::FollowUp => activity.follow_up_loops.push(entry),
                EntryKind::Thematic => activity.thematic_loops.push(entry),
                EntryKind::Daily => activity.daily_loops.push(entry),
            }
        }

        for bucket in [
            &mut activity.daily_loops,
            &mut activity.thematic_loops,
            &mut activity.follow_up_loops,
        ] {
            bucket.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        }
        activity
    }

    /// Fetches and categorizes a single day.
    ///
    /// A store failure is returned as [`LoopError::SourceUnavailable`](crate::LoopError),
    /// never as an empty activity.
    pub fn activity_for_day<S>(store: &S, date: NaiveDate) -> Result<DayActivity>
    where
        S: EntryStore + RatingStore,
    {
        let window = TimeWindow::day(date);
        let entries = store.fetch_entries(&window)?;
        let rating = store.fetch_rating(date)?;
        debug!("{date}: {} entries, rating {:?}", entries.len(), rating);
        Ok(Self::categorize(date, entries, rating))
    }

    /// One activity per calendar day of a bounded window, oldest first.
    /// An unbounded window spans the first to the last day with data.
    pub fn activities<S>(store: &S, window: &TimeWindow) -> Result<Vec<DayActivity>>
    where
        S: EntryStore + RatingStore,
    {
        let entries = store.fetch_entries(window)?;
        let ratings = store.fetch_ratings(window)?;

        let days = match window.calendar_days() {
            Some(days) => days,
            None => {
                let first = entries
                    .iter()
                    .map(JournalEntry::day)
                    .chain(ratings.keys().copied())
                    .min();
                let last = entries
                    .iter()
                    .map(JournalEntry::day)
                    .chain(ratings.keys().copied())
                    .max();
                match (first, last) {
                    (Some(first), Some(last)) => crate::dates::get_dates_in_range(first, last),
                    _ => Vec::new(),
                }
            }
        };

        Ok(days
            .into_iter()
            .map(|day| {
                let todays = entries.iter().filter(|e| e.day() == day).cloned();
                Self::categorize(day, todays, ratings.get(&day).copied())
            })
            .collect())
    }
}
