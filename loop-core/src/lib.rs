pub mod colors;
pub mod config;
pub mod daily;
pub mod dates;
pub mod entry;
pub mod error;
pub mod loop_app;
pub mod schedule;
pub mod store;
pub mod trends;
pub mod window;

#[cfg(test)]
pub(crate) mod tests;

pub use colors::{Color, EmotionColorAssigner};
pub use config::Config;
pub use daily::{DailyAggregator, DayActivity};
pub use entry::{EntryKind, JournalEntry};
pub use error::{DecodeError, LoopError, Result, StoreError};
pub use loop_app::LoopApp;
pub use schedule::{DayCell, ScheduleGrid};
pub use store::{EntryStore, JsonFileStore, MemoryStore, RatingStore, Ratings};
pub use trends::{
    CategoryEffect, CorrelationCategory, FrequencyResult, SpeakingHighlight, SpeakingHighlights,
    TrendOptions, TrendsEngine,
};
pub use window::{TimeWindow, WindowKeyword};
