//! Trend queries over an immutable snapshot of entries and day ratings.
//!
//! Every query is a pure function of the snapshot, the window and the engine's
//! options. The engine is `Send + Sync`, so independent queries for the same
//! window may run on different threads.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString};

use crate::colors::{Color, EmotionColorAssigner};
use crate::dates::{get_dates_in_range, time_is_in_range};
use crate::entry::JournalEntry;
use crate::error::{LoopError, Result};
use crate::store::{EntryStore, RatingStore, Ratings, dedup_by_id};
use crate::window::TimeWindow;

pub const DEFAULT_TOP_EMOTIONS: usize = 4;
/// Rated days a correlation bucket needs before it is reported.
pub const DEFAULT_MIN_SUPPORT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendOptions {
    /// How many labels `top_emotions` returns at most.
    pub top_emotions: usize,
    /// Minimum number of rated days behind a correlation bucket. Must be >= 1.
    pub min_support: usize,
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            top_emotions: DEFAULT_TOP_EMOTIONS,
            min_support: DEFAULT_MIN_SUPPORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResult {
    pub value: String,
    pub count: usize,
    /// Share of all mood-labelled entries in the window, in `[0, 1]`.
    pub percentage: f64,
}

/// An extremal entry within a window.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakingHighlight {
    pub entry_id: String,
    pub date: NaiveDateTime,
    pub wpm: Option<f64>,
    pub emotion: Option<String>,
    pub word_count: Option<u32>,
    /// Seconds.
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeakingHighlights {
    pub fastest: Option<SpeakingHighlight>,
    pub longest: Option<SpeakingHighlight>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CorrelationCategory {
    Topic,
    Sleep,
    TimeOfDay,
    WordCount,
}

/// Time-of-day buckets: `[start, end)` local time, Night wraps midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "title_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    fn bounds(self) -> (NaiveTime, NaiveTime) {
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN);
        match self {
            TimeOfDay::Morning => (at(5), at(12)),
            TimeOfDay::Afternoon => (at(12), at(17)),
            TimeOfDay::Evening => (at(17), at(21)),
            TimeOfDay::Night => (at(21), at(5)),
        }
    }

    pub fn of(time: NaiveTime) -> Self {
        TimeOfDay::iter()
            .find(|tod| {
                let (start, end) = tod.bounds();
                time_is_in_range(start, end, time)
            })
            .unwrap_or(TimeOfDay::Night)
    }
}

/// Signed deviation of a bucket's mean day rating from the window's mean.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEffect {
    pub name: String,
    pub effect: f64,
    pub color: Color,
    /// Rated days behind this bucket.
    pub support: usize,
}

#[derive(Debug, Clone)]
pub struct TrendsEngine {
    entries: Vec<JournalEntry>,
    ratings: Ratings,
    options: TrendOptions,
}

impl TrendsEngine {
    /// Builds an engine over a snapshot. Duplicate entry ids are dropped.
    pub fn new(
        entries: impl IntoIterator<Item = JournalEntry>,
        ratings: Ratings,
        options: TrendOptions,
    ) -> Result<Self> {
        if options.min_support == 0 {
            return Err(LoopError::Config("min_support must be at least 1".to_string()));
        }
        let mut entries = dedup_by_id(entries);
        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(Self {
            entries,
            ratings,
            options,
        })
    }

    /// Takes a snapshot of everything `store` holds for `window`.
    pub fn from_store<S>(store: &S, window: &TimeWindow, options: TrendOptions) -> Result<Self>
    where
        S: EntryStore + RatingStore,
    {
        let entries = store.fetch_entries(window)?;
        let ratings = store.fetch_ratings(window)?;
        debug!(
            "trends snapshot: {} entries, {} rated days",
            entries.len(),
            ratings.len()
        );
        Self::new(entries, ratings, options)
    }

    fn in_window<'a>(&'a self, window: &'a TimeWindow) -> impl Iterator<Item = &'a JournalEntry> {
        self.entries.iter().filter(|e| window.contains(e.timestamp))
    }

    fn rated_days(&self, window: &TimeWindow) -> BTreeMap<NaiveDate, f64> {
        self.ratings
            .iter()
            .filter(|(day, _)| window.overlaps_day(**day))
            .map(|(day, r)| (*day, *r))
            .collect()
    }

    /// Most frequent mood labels, most common first.
    ///
    /// Labels are compared trimmed and lowercased; the reported value is the
    /// first spelling seen. Entries without a mood count toward neither the
    /// tally nor the total. Ties go to the label that sorts first.
    pub fn top_emotions(&self, window: &TimeWindow) -> Vec<FrequencyResult> {
        let mut tally: HashMap<String, (String, usize)> = HashMap::new();
        let mut total = 0usize;

        for entry in self.in_window(window) {
            let (Some(key), Some(raw)) = (entry.normalized_mood(), entry.mood.as_deref()) else {
                continue;
            };
            total += 1;
            tally
                .entry(key)
                .or_insert_with(|| (raw.trim().to_string(), 0))
                .1 += 1;
        }

        let mut ranked: Vec<(String, String, usize)> = tally
            .into_iter()
            .map(|(key, (value, count))| (key, value, count))
            .collect();
        ranked.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.options.top_emotions);

        ranked
            .into_iter()
            .map(|(_, value, count)| FrequencyResult {
                value,
                count,
                percentage: count as f64 / total as f64,
            })
            .collect()
    }

    /// Fastest speaker (words per minute) and longest recording in the window.
    /// Ties go to the earlier entry; `None` when no entry carries the metric.
    pub fn speaking_highlights(&self, window: &TimeWindow) -> SpeakingHighlights {
        SpeakingHighlights {
            fastest: self.extreme_by(window, JournalEntry::speaking_rate),
            longest: self.extreme_by(window, |e| e.duration_secs),
        }
    }

    fn extreme_by<F>(&self, window: &TimeWindow, metric: F) -> Option<SpeakingHighlight>
    where
        F: Fn(&JournalEntry) -> Option<f64>,
    {
        self.in_window(window)
            .filter_map(|e| metric(e).filter(|m| m.is_finite()).map(|m| (e, m)))
            .max_by(|(a, ma), (b, mb)| {
                ma.total_cmp(mb)
                    .then_with(|| b.timestamp.cmp(&a.timestamp))
                    .then_with(|| b.id.cmp(&a.id))
            })
            .map(|(e, _)| SpeakingHighlight {
                entry_id: e.id.clone(),
                date: e.timestamp,
                wpm: e.speaking_rate(),
                emotion: e.mood.as_ref().map(|m| m.trim().to_string()),
                word_count: e.word_count(),
                duration: e.duration_secs,
            })
    }

    /// Effect of each bucket of `category` on the day rating.
    ///
    /// For a bucket, the effect is the mean rating of rated days holding at
    /// least one entry in that bucket, minus the mean of all rated days in the
    /// window. Buckets backed by fewer than `min_support` days are left out.
    /// Sorted by effect, largest first, then by name.
    pub fn correlations(
        &self,
        window: &TimeWindow,
        category: CorrelationCategory,
        colors: &EmotionColorAssigner,
    ) -> Vec<CategoryEffect> {
        let rated = self.rated_days(window);
        if rated.is_empty() {
            return Vec::new();
        }
        let baseline = rated.values().sum::<f64>() / rated.len() as f64;

        let mut bucket_days: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
        for entry in self.in_window(window) {
            if !rated.contains_key(&entry.day()) {
                continue;
            }
            if let Some(name) = bucket_of(entry, category) {
                bucket_days.entry(name).or_default().insert(entry.day());
            }
        }

        let mut effects: Vec<CategoryEffect> = bucket_days
            .into_iter()
            .filter(|(name, days)| {
                let keep = days.len() >= self.options.min_support;
                if !keep {
                    debug!(
                        "{}: '{name}' has {} day(s), below support {}",
                        category.as_ref(),
                        days.len(),
                        self.options.min_support
                    );
                }
                keep
            })
            .map(|(name, days)| {
                let mean = days.iter().map(|d| rated[d]).sum::<f64>() / days.len() as f64;
                CategoryEffect {
                    color: colors.color_for(&name),
                    effect: mean - baseline,
                    support: days.len(),
                    name,
                }
            })
            .collect();

        effects.sort_by(|a, b| {
            b.effect
                .total_cmp(&a.effect)
                .then_with(|| a.name.cmp(&b.name))
        });
        effects
    }

    /// Rating per calendar day, oldest first, `None` for unrated days.
    /// An unbounded window spans the first to the last rated day.
    pub fn rating_series(&self, window: &TimeWindow) -> Vec<(NaiveDate, Option<f64>)> {
        let rated = self.rated_days(window);
        let days = match window.calendar_days() {
            Some(days) => days,
            None => match (rated.keys().next(), rated.keys().next_back()) {
                (Some(first), Some(last)) => get_dates_in_range(*first, *last),
                _ => Vec::new(),
            },
        };
        days.into_iter()
            .map(|day| (day, rated.get(&day).copied()))
            .collect()
    }
}

fn bucket_of(entry: &JournalEntry, category: CorrelationCategory) -> Option<String> {
    match category {
        CorrelationCategory::Topic => {
            let topic = entry.category.trim();
            (!topic.is_empty()).then(|| topic.to_string())
        }
        CorrelationCategory::Sleep => entry.sleep_hours.map(|h| {
            if h < 6.0 {
                "< 6h"
            } else if h < 8.0 {
                "6-8h"
            } else {
                "8h+"
            }
            .to_string()
        }),
        CorrelationCategory::TimeOfDay => {
            Some(TimeOfDay::of(entry.timestamp.time()).as_ref().to_string())
        }
        CorrelationCategory::WordCount => entry.word_count().map(|wc| {
            if wc < 50 {
                "< 50 words"
            } else if wc < 150 {
                "50-150 words"
            } else {
                "150+ words"
            }
            .to_string()
        }),
    }
}
