//! File-backed store: `{data_dir}/entries.json` and `{data_dir}/ratings.json`.
//!
//! `entries.json` holds an array of entries, `ratings.json` an object mapping
//! `"YYYY-MM-DD"` to a rating. A missing file reads as empty.

use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{EntryStore, RatingStore, Ratings};
use crate::entry::JournalEntry;
use crate::error::{DecodeError, StoreError};
use crate::window::TimeWindow;

const ENTRIES_FILE: &str = "entries.json";
const RATINGS_FILE: &str = "ratings.json";
const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    pub data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn entries_path(&self) -> PathBuf {
        self.data_dir.join(ENTRIES_FILE)
    }

    pub fn ratings_path(&self) -> PathBuf {
        self.data_dir.join(RATINGS_FILE)
    }

    /// Every stored entry, validated.
    pub fn load_entries(&self) -> Result<Vec<JournalEntry>, StoreError> {
        let path = self.entries_path();
        let Some(content) = read_optional(&path)? else {
            return Ok(Vec::new());
        };
        let entries: Vec<JournalEntry> =
            serde_json::from_str(&content).map_err(|error| DecodeError::Malformed {
                path: path.clone(),
                error,
            })?;
        for entry in &entries {
            validate_entry(entry)?;
        }
        debug!("loaded {} entries from {}", entries.len(), path.display());
        Ok(entries)
    }

    /// Every stored rating, validated.
    pub fn load_ratings(&self) -> Result<Ratings, StoreError> {
        let path = self.ratings_path();
        let Some(content) = read_optional(&path)? else {
            return Ok(Ratings::new());
        };
        let raw: BTreeMap<String, f64> =
            serde_json::from_str(&content).map_err(|error| DecodeError::Malformed {
                path: path.clone(),
                error,
            })?;

        let mut ratings = Ratings::new();
        for (key, value) in raw {
            let day = NaiveDate::parse_from_str(&key, DAY_KEY_FORMAT)
                .map_err(|_| DecodeError::InvalidDay(key.clone()))?;
            validate_rating(day, value)?;
            ratings.insert(day, value);
        }
        Ok(ratings)
    }

    /// Stores a new entry. An id that already exists is left untouched and
    /// `false` is returned, entries being immutable once recorded.
    pub fn add_entry(&self, entry: JournalEntry) -> Result<bool, StoreError> {
        validate_entry(&entry)?;
        let mut entries = self.load_entries()?;
        if entries.iter().any(|e| e.id == entry.id) {
            warn!("entry '{}' already stored, ignoring", entry.id);
            return Ok(false);
        }
        entries.push(entry);
        self.write_json(&self.entries_path(), &entries)?;
        Ok(true)
    }

    /// Removes the entry with `id`. Returns whether anything was removed.
    pub fn delete_entry(&self, id: &str) -> Result<bool, StoreError> {
        let mut entries = self.load_entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write_json(&self.entries_path(), &entries)?;
        debug!("deleted entry '{id}'");
        Ok(true)
    }

    /// Day check-in. Overwrites any earlier rating for the same day.
    pub fn record_rating(&self, day: NaiveDate, value: f64) -> Result<(), StoreError> {
        validate_rating(day, value)?;
        let mut ratings = self.load_ratings()?;
        if let Some(old) = ratings.insert(day, value) {
            debug!("rating for {day} changed from {old} to {value}");
        }
        let raw: BTreeMap<String, f64> = ratings
            .into_iter()
            .map(|(d, r)| (d.format(DAY_KEY_FORMAT).to_string(), r))
            .collect();
        self.write_json(&self.ratings_path(), &raw)
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| io_error(&self.data_dir, e))?;
        let content = serde_json::to_string_pretty(value)
            .map_err(|e| StoreError::Unavailable(format!("encoding {}: {e}", path.display())))?;
        fs::write(path, content).map_err(|e| io_error(path, e))
    }
}

impl EntryStore for JsonFileStore {
    fn fetch_entries(&self, window: &TimeWindow) -> Result<Vec<JournalEntry>, StoreError> {
        let mut entries = self.load_entries()?;
        entries.retain(|e| window.contains(e.timestamp));
        Ok(entries)
    }
}

impl RatingStore for JsonFileStore {
    fn fetch_rating(&self, day: NaiveDate) -> Result<Option<f64>, StoreError> {
        Ok(self.load_ratings()?.get(&day).copied())
    }

    fn fetch_ratings(&self, window: &TimeWindow) -> Result<Ratings, StoreError> {
        let mut ratings = self.load_ratings()?;
        ratings.retain(|day, _| window.overlaps_day(*day));
        Ok(ratings)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error(path, e)),
    }
}

fn io_error(path: &Path, error: std::io::Error) -> StoreError {
    match error.kind() {
        ErrorKind::PermissionDenied => {
            StoreError::Unauthorized(format!("{}: {error}", path.display()))
        }
        _ => StoreError::Unavailable(format!("{}: {error}", path.display())),
    }
}

fn validate_entry(entry: &JournalEntry) -> Result<(), DecodeError> {
    if entry.id.trim().is_empty() {
        return Err(DecodeError::MissingId);
    }
    if entry.is_daily_loop && entry.is_follow_up {
        return Err(DecodeError::ConflictingKind {
            id: entry.id.clone(),
        });
    }
    Ok(())
}

fn validate_rating(day: NaiveDate, value: f64) -> Result<(), DecodeError> {
    if !(0.0..=10.0).contains(&value) {
        return Err(DecodeError::RatingOutOfRange {
            day: day.to_string(),
            value,
        });
    }
    Ok(())
}
