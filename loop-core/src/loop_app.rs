use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use std::fs;

use crate::{
    Config,
    colors::EmotionColorAssigner,
    daily::{DailyAggregator, DayActivity},
    dates::{first_of_month, parse_day},
    error::LoopError,
    schedule::{DayCell, ScheduleGrid},
    store::{JsonFileStore, RatingStore},
    trends::TrendsEngine,
    window::TimeWindow,
};

/// The services a front end needs, built once at startup and passed around.
pub struct LoopApp {
    pub config: Config,
    pub store: JsonFileStore,
    pub colors: EmotionColorAssigner,
    pub grid: ScheduleGrid,
}

impl LoopApp {
    /// Creates a new `LoopApp`, loading configuration from standard paths.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::with_config(config)
    }

    /// Creates a new `LoopApp` with a specific `Config`.
    ///
    /// This also ensures that the data directory exists.
    pub fn with_config(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("creating data dir {}", config.data_dir.display()))?;

        let store = JsonFileStore::new(config.data_dir.clone());
        let colors = EmotionColorAssigner::new(config.palette.clone())?;
        let grid = ScheduleGrid::new(config.first_weekday);
        Ok(Self {
            config,
            store,
            colors,
            grid,
        })
    }

    /// `today`, `yesterday`, or a date in one of the configured input formats.
    pub fn parse_day(&self, input: &str) -> Option<NaiveDate> {
        parse_day(
            input,
            self.config.reference_date,
            &self.config.input_date_formats,
        )
    }

    /// A window keyword (`this week`, `last 30 days`, ...) or a single day.
    pub fn parse_window(&self, input: &str) -> Option<TimeWindow> {
        TimeWindow::parse(input, self.config.reference_date, self.config.first_weekday)
            .or_else(|| self.parse_day(input).map(TimeWindow::day))
    }

    pub fn day_activity(&self, day: NaiveDate) -> crate::Result<DayActivity> {
        DailyAggregator::activity_for_day(&self.store, day)
    }

    /// Snapshot of `window` ready for trend queries.
    pub fn trends(&self, window: &TimeWindow) -> crate::Result<TrendsEngine> {
        TrendsEngine::from_store(&self.store, window, self.config.trend_options)
    }

    /// Month grid with each day's rating and color filled in.
    pub fn month_calendar(&self, year: i32, month: u32) -> crate::Result<Vec<Option<DayCell>>> {
        let grid = self.grid.month_grid(year, month)?;
        let first = first_of_month(year, month).ok_or(LoopError::InvalidMonth { year, month })?;
        let last = grid.iter().flatten().last().copied().unwrap_or(first);
        let ratings = self.store.fetch_ratings(&TimeWindow::days(first, last)?)?;
        Ok(self.grid.annotate(&grid, &ratings, &self.colors))
    }

    /// The 7 days ending on `reference`, annotated.
    pub fn week(&self, reference: NaiveDate) -> crate::Result<Vec<DayCell>> {
        let dates = self.grid.week_dates(reference);
        let ratings = self
            .store
            .fetch_ratings(&TimeWindow::days(dates[0], dates[6])?)?;
        let slots: Vec<Option<NaiveDate>> = dates.iter().copied().map(Some).collect();
        Ok(self
            .grid
            .annotate(&slots, &ratings, &self.colors)
            .into_iter()
            .flatten()
            .collect())
    }

    /// The month containing the reference date.
    pub fn current_month(&self) -> (i32, u32) {
        (
            self.config.reference_date.year(),
            self.config.reference_date.month(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::JournalEntry;
    use crate::tests::{entry_at, mk_config};
    use crate::trends::CorrelationCategory;
    use tempfile::tempdir;

    fn mk_app(reference_date: Option<NaiveDate>) -> (LoopApp, tempfile::TempDir) {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("loop");
        let config = mk_config(root, reference_date);
        let app = LoopApp::with_config(config).expect("app with config");
        (app, tmp)
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn seed(app: &LoopApp, entries: Vec<JournalEntry>) {
        for e in entries {
            app.store.add_entry(e).unwrap();
        }
    }

    #[test]
    fn creates_data_dir() {
        let (app, _tmp) = mk_app(None);
        assert!(app.config.data_dir.exists());
    }

    #[test]
    fn parses_days_and_windows() {
        let (app, _tmp) = mk_app(Some(d(2025, 6, 15)));
        assert_eq!(app.parse_day("yesterday"), Some(d(2025, 6, 14)));
        assert_eq!(app.parse_day("2025-06-01"), Some(d(2025, 6, 1)));
        assert_eq!(
            app.parse_window("2025-06-01"),
            Some(TimeWindow::day(d(2025, 6, 1)))
        );
        let month = app.parse_window("this month").unwrap();
        assert_eq!(month.calendar_days().unwrap().len(), 30);
        assert!(app.parse_window("someday").is_none());
    }

    #[test]
    fn last_representable_day_is_an_empty_day() {
        let (app, _tmp) = mk_app(None);
        let input = NaiveDate::MAX.format("%Y-%m-%d").to_string();
        let day = app.parse_day(&input).unwrap();
        assert_eq!(day, NaiveDate::MAX);
        assert!(app.day_activity(day).unwrap().is_empty());

        let window = app.parse_window(&input).unwrap();
        let engine = app.trends(&window).unwrap();
        assert!(engine.top_emotions(&window).is_empty());
        assert!(engine.rating_series(&window).is_empty());
    }

    #[test]
    fn day_activity_reads_store() {
        let (app, _tmp) = mk_app(None);
        let mut daily = entry_at("a", 2025, 6, 1, 8);
        daily.is_daily_loop = true;
        seed(&app, vec![daily, entry_at("b", 2025, 6, 1, 9)]);
        app.store.record_rating(d(2025, 6, 1), 7.5).unwrap();

        let day = app.day_activity(d(2025, 6, 1)).unwrap();
        assert_eq!(day.daily_loops.len(), 1);
        assert_eq!(day.thematic_loops.len(), 1);
        assert_eq!(day.rating, Some(7.5));

        assert!(app.day_activity(d(2025, 6, 2)).unwrap().is_empty());
    }

    #[test]
    fn broken_store_is_not_an_empty_day() {
        let (app, _tmp) = mk_app(None);
        fs::write(app.store.entries_path(), "{ not json").unwrap();
        let err = app.day_activity(d(2025, 6, 1)).unwrap_err();
        assert!(matches!(err, LoopError::SourceUnavailable(_)));
    }

    #[test]
    fn trends_over_window() {
        let (app, _tmp) = mk_app(Some(d(2025, 6, 15)));
        let mut entries = Vec::new();
        for (i, day) in [10u32, 11, 12, 13].iter().enumerate() {
            let mut e = entry_at(&format!("e{i}"), 2025, 6, *day, 9);
            e.mood = Some(if i < 3 { "Calm" } else { "Tired" }.to_string());
            e.category = if i % 2 == 0 { "Work" } else { "Rest" }.to_string();
            entries.push(e);
            app.store.record_rating(d(2025, 6, *day), 4.0 + i as f64).unwrap();
        }
        seed(&app, entries);

        let window = app.parse_window("last 7 days").unwrap();
        let engine = app.trends(&window).unwrap();
        let top = engine.top_emotions(&window);
        assert_eq!(top[0].value, "Calm");
        assert_eq!(top[0].count, 3);

        let effects = engine.correlations(&window, CorrelationCategory::Topic, &app.colors);
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0].name, "Rest");
    }

    #[test]
    fn calendar_and_week_carry_ratings() {
        let (app, _tmp) = mk_app(Some(d(2026, 2, 10)));
        app.store.record_rating(d(2026, 2, 1), 9.0).unwrap();
        app.store.record_rating(d(2026, 2, 9), 1.0).unwrap();

        let (year, month) = app.current_month();
        let cells = app.month_calendar(year, month).unwrap();
        assert_eq!(cells.len(), 28);
        assert_eq!(cells[0].as_ref().unwrap().rating, Some(9.0));

        let week = app.week(app.config.reference_date).unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week[6].date, d(2026, 2, 10));
        assert_eq!(week[5].rating, Some(1.0));
        assert_eq!(week[5].color, Some(app.colors.color_for("rough")));
        assert!(week[0].rating.is_none());
    }
}
