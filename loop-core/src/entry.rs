use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}']+").expect("valid word regex"));

/// The three mutually exclusive kinds of entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum EntryKind {
    Daily,
    Thematic,
    FollowUp,
}

/// One recorded reflection (a "loop").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    /// Local wall-clock time the entry was recorded.
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub prompt_text: String,
    /// Thematic group; empty for daily loops.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub is_daily_loop: bool,
    #[serde(default)]
    pub is_follow_up: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaking_rate_wpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
}

impl JournalEntry {
    /// Follow-up wins over everything, then anything not daily is thematic.
    pub fn kind(&self) -> EntryKind {
        if self.is_follow_up {
            EntryKind::FollowUp
        } else if !self.is_daily_loop {
            EntryKind::Thematic
        } else {
            EntryKind::Daily
        }
    }

    /// Calendar day the entry belongs to.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Mood label trimmed and lowercased, `None` when missing or blank.
    pub fn normalized_mood(&self) -> Option<String> {
        self.mood
            .as_deref()
            .map(normalize_label)
            .filter(|m| !m.is_empty())
    }

    /// Stored word count, or the number of words in the transcript.
    /// `None` when neither is available.
    pub fn word_count(&self) -> Option<u32> {
        if self.word_count.is_some() {
            return self.word_count;
        }
        if self.transcript.trim().is_empty() {
            return None;
        }
        Some(count_words(&self.transcript))
    }

    /// Stored rate, or words per minute derived from word count and duration.
    pub fn speaking_rate(&self) -> Option<f64> {
        if let Some(wpm) = self.speaking_rate_wpm {
            return Some(wpm);
        }
        let words = self.word_count()?;
        let secs = self.duration_secs.filter(|d| *d > 0.0)?;
        Some(words as f64 / (secs / 60.0))
    }
}

/// Trim and lowercase a label so "Peaceful " and "peaceful" are the same key.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Counts words in `text`. Apostrophes stay inside a word.
///
/// ```
/// # use loop_core::entry::count_words;
/// assert_eq!(count_words("I didn't sleep well, again."), 5);
/// assert_eq!(count_words("   "), 0);
/// ```
pub fn count_words(text: &str) -> u32 {
    WORD.find_iter(text).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::entry_at;

    #[test]
    fn kind_follows_flags() {
        let mut e = entry_at("a", 2025, 6, 1, 9);
        e.is_daily_loop = true;
        assert_eq!(e.kind(), EntryKind::Daily);

        e.is_daily_loop = false;
        assert_eq!(e.kind(), EntryKind::Thematic);

        e.is_follow_up = true;
        assert_eq!(e.kind(), EntryKind::FollowUp);
    }

    #[test]
    fn blank_mood_is_no_mood() {
        let mut e = entry_at("a", 2025, 6, 1, 9);
        e.mood = Some("   ".to_string());
        assert_eq!(e.normalized_mood(), None);

        e.mood = Some(" Peaceful".to_string());
        assert_eq!(e.normalized_mood().as_deref(), Some("peaceful"));
    }

    #[test]
    fn word_count_falls_back_to_transcript() {
        let mut e = entry_at("a", 2025, 6, 1, 9);
        assert_eq!(e.word_count(), None);

        e.transcript = "today was a quiet one".to_string();
        assert_eq!(e.word_count(), Some(5));

        e.word_count = Some(12);
        assert_eq!(e.word_count(), Some(12));
    }

    #[test]
    fn speaking_rate_derived_from_duration() {
        let mut e = entry_at("a", 2025, 6, 1, 9);
        e.word_count = Some(150);
        assert_eq!(e.speaking_rate(), None);

        e.duration_secs = Some(60.0);
        assert_eq!(e.speaking_rate(), Some(150.0));

        e.duration_secs = Some(0.0);
        assert_eq!(e.speaking_rate(), None);

        e.speaking_rate_wpm = Some(90.0);
        assert_eq!(e.speaking_rate(), Some(90.0));
    }
}
