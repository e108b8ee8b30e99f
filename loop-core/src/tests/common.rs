use crate::entry::JournalEntry;
use crate::error::StoreError;
use crate::store::{EntryStore, RatingStore, Ratings};
use crate::trends::TrendOptions;
use crate::window::TimeWindow;
use crate::Config;
use chrono::{NaiveDate, Weekday};
use std::path::PathBuf;

/// Test helper to create a default `Config` for testing purposes.
///
/// This is the single source of truth for test configuration.
/// If you add a field to `Config`, you only need to update it here.
pub fn mk_config(data_dir: PathBuf, reference_date: Option<NaiveDate>) -> Config {
    Config {
        data_dir,
        first_weekday: Weekday::Sun,
        trend_options: TrendOptions::default(),
        palette: crate::colors::DEFAULT_PALETTE.to_vec(),
        date_format: "%A, %d %b %Y".to_string(),
        input_date_formats: vec!["%Y-%m-%d".to_string()],
        reference_date: reference_date
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")),
    }
}

/// A thematic entry with nothing but an id and a timestamp.
pub fn entry_at(id: &str, year: i32, month: u32, day: u32, hour: u32) -> JournalEntry {
    JournalEntry {
        id: id.to_string(),
        timestamp: NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .expect("valid timestamp"),
        prompt_text: String::new(),
        category: String::new(),
        transcript: String::new(),
        is_video: false,
        is_daily_loop: false,
        is_follow_up: false,
        mood: None,
        word_count: None,
        speaking_rate_wpm: None,
        duration_secs: None,
        sleep_hours: None,
    }
}

/// A store that is always offline.
pub struct FailingStore;

impl EntryStore for FailingStore {
    fn fetch_entries(&self, _window: &TimeWindow) -> Result<Vec<JournalEntry>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

impl RatingStore for FailingStore {
    fn fetch_rating(&self, _day: NaiveDate) -> Result<Option<f64>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn fetch_ratings(&self, _window: &TimeWindow) -> Result<Ratings, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}
