//! Half-open time windows used to scope trend queries.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use strum_macros::{AsRefStr, EnumIter, EnumString};

use crate::dates::{first_of_month, first_of_next_month, get_dates_in_range, start_of_week};
use crate::error::{LoopError, Result};

/// Named windows accepted wherever a window can be typed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WindowKeyword {
    Today,
    Yesterday,
    #[strum(serialize = "this week")]
    ThisWeek,
    #[strum(serialize = "last week")]
    LastWeek,
    #[strum(serialize = "this month")]
    ThisMonth,
    #[strum(serialize = "last month")]
    LastMonth,
    #[strum(serialize = "last 7 days")]
    Last7Days,
    #[strum(serialize = "last 30 days")]
    Last30Days,
    #[strum(serialize = "this year")]
    ThisYear,
    #[strum(serialize = "all time")]
    AllTime,
}

/// A half-open interval `[start, end)`. A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl TimeWindow {
    /// Fails with [`LoopError::InvalidWindow`] when `end` is before `start`.
    /// `start == end` is a valid, empty window.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if end < start {
            return Err(LoopError::InvalidWindow { start, end });
        }
        Ok(Self {
            start: Some(start),
            end: Some(end),
        })
    }

    pub fn all_time() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// The whole calendar day. The last representable day has no upper bound.
    pub fn day(date: NaiveDate) -> Self {
        Self::whole_days(date, date.succ_opt())
    }

    /// Calendar days `first..=last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Result<Self> {
        let start = first.and_time(NaiveTime::MIN);
        match last.succ_opt() {
            Some(end) => Self::new(start, end.and_time(NaiveTime::MIN)),
            None => Ok(Self::since(start)),
        }
    }

    /// Resolves a keyword relative to `reference` (usually today).
    /// Windows are clamped to the dates chrono can represent.
    pub fn from_keyword(keyword: WindowKeyword, reference: NaiveDate, first_weekday: Weekday) -> Self {
        let tomorrow = reference.succ_opt();
        match keyword {
            WindowKeyword::Today => Self::day(reference),
            WindowKeyword::Yesterday => Self::day(days_before(reference, 1)),
            WindowKeyword::ThisWeek => {
                let start = start_of_week(reference, first_weekday);
                Self::whole_days(start, days_after(start, 7))
            }
            WindowKeyword::LastWeek => {
                let this_week = start_of_week(reference, first_weekday);
                Self::whole_days(days_before(this_week, 7), Some(this_week))
            }
            WindowKeyword::ThisMonth => {
                let start = reference.with_day(1).unwrap_or(reference);
                Self::whole_days(start, first_of_next_month(start))
            }
            WindowKeyword::LastMonth => {
                let this_month = reference.with_day(1).unwrap_or(reference);
                let prev = days_before(this_month, 1);
                let start = first_of_month(prev.year(), prev.month()).unwrap_or(prev);
                Self::whole_days(start, Some(this_month))
            }
            WindowKeyword::Last7Days => Self::whole_days(days_before(reference, 6), tomorrow),
            WindowKeyword::Last30Days => Self::whole_days(days_before(reference, 29), tomorrow),
            WindowKeyword::ThisYear => {
                let start = NaiveDate::from_ymd_opt(reference.year(), 1, 1).unwrap_or(reference);
                Self::whole_days(start, NaiveDate::from_ymd_opt(reference.year() + 1, 1, 1))
            }
            WindowKeyword::AllTime => Self::all_time(),
        }
    }

    /// Parses a keyword such as `"this week"`, `None` if the text isn't one.
    pub fn parse(input: &str, reference: NaiveDate, first_weekday: Weekday) -> Option<Self> {
        let keyword: WindowKeyword = input.trim().parse().ok()?;
        Some(Self::from_keyword(keyword, reference, first_weekday))
    }

    fn since(start: NaiveDateTime) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    // Both ends are day-aligned and `start <= end` by construction.
    // A missing end means the range runs past the last representable day.
    fn whole_days(start: NaiveDate, end_exclusive: Option<NaiveDate>) -> Self {
        Self {
            start: Some(start.and_time(NaiveTime::MIN)),
            end: end_exclusive.map(|end| end.and_time(NaiveTime::MIN)),
        }
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start.is_none_or(|s| ts >= s) && self.end.is_none_or(|e| ts < e)
    }

    /// Whether any instant of the calendar day `date` lies in the window.
    /// Day ratings are included in a window by this rule.
    pub fn overlaps_day(&self, date: NaiveDate) -> bool {
        let day_start = date.and_time(NaiveTime::MIN);
        let day_end = date.succ_opt().map(|next| next.and_time(NaiveTime::MIN));
        self.start.is_none_or(|s| day_end.is_none_or(|e| e > s))
            && self.end.is_none_or(|e| day_start < e)
    }

    /// Calendar days touched by a bounded window, oldest first.
    /// `None` when either side is unbounded.
    pub fn calendar_days(&self) -> Option<Vec<NaiveDate>> {
        let (start, end) = (self.start?, self.end?);
        if start == end {
            return Some(Vec::new());
        }
        let last = (end - Duration::nanoseconds(1)).date();
        Some(get_dates_in_range(start.date(), last))
    }
}

fn days_after(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn end_before_start_is_rejected() {
        let start = d(2025, 8, 15).and_hms_opt(12, 0, 0).unwrap();
        let end = d(2025, 8, 15).and_hms_opt(11, 0, 0).unwrap();
        let err = TimeWindow::new(start, end).unwrap_err();
        assert!(matches!(err, LoopError::InvalidWindow { .. }));
    }

    #[test]
    fn window_is_half_open() {
        let w = TimeWindow::day(d(2025, 8, 15));
        assert!(w.contains(d(2025, 8, 15).and_hms_opt(0, 0, 0).unwrap()));
        assert!(w.contains(d(2025, 8, 15).and_hms_opt(23, 59, 59).unwrap()));
        assert!(!w.contains(d(2025, 8, 16).and_hms_opt(0, 0, 0).unwrap()));
        assert!(!w.contains(d(2025, 8, 14).and_hms_opt(23, 59, 59).unwrap()));
    }

    #[test]
    fn last_representable_day_has_open_end() {
        let w = TimeWindow::day(NaiveDate::MAX);
        assert_eq!(w.start(), Some(NaiveDate::MAX.and_time(NaiveTime::MIN)));
        assert_eq!(w.end(), None);
        assert!(w.contains(NaiveDate::MAX.and_hms_opt(23, 0, 0).unwrap()));
        assert!(w.overlaps_day(NaiveDate::MAX));
        assert!(!w.overlaps_day(NaiveDate::MAX.pred_opt().unwrap()));
        assert!(w.calendar_days().is_none());

        let through_max = TimeWindow::days(NaiveDate::MAX.pred_opt().unwrap(), NaiveDate::MAX);
        assert_eq!(through_max.unwrap().end(), None);
    }

    #[test]
    fn keywords_clamp_at_calendar_edges() {
        for keyword in [
            WindowKeyword::Today,
            WindowKeyword::ThisWeek,
            WindowKeyword::ThisMonth,
            WindowKeyword::Last30Days,
            WindowKeyword::ThisYear,
        ] {
            let w = TimeWindow::from_keyword(keyword, NaiveDate::MAX, Weekday::Sun);
            assert!(w.contains(NaiveDate::MAX.and_time(NaiveTime::MIN)));
        }
        for keyword in [WindowKeyword::Yesterday, WindowKeyword::LastWeek, WindowKeyword::LastMonth]
        {
            let w = TimeWindow::from_keyword(keyword, NaiveDate::MIN, Weekday::Sun);
            assert!(w.start().is_some());
        }
    }

    #[test]
    fn keywords_parse_case_insensitively() {
        let today = d(2025, 8, 13); // Wednesday
        let w = TimeWindow::parse("This Week", today, Weekday::Mon).unwrap();
        assert_eq!(w.start(), Some(d(2025, 8, 11).and_hms_opt(0, 0, 0).unwrap()));
        assert_eq!(w.end(), Some(d(2025, 8, 18).and_hms_opt(0, 0, 0).unwrap()));

        assert!(TimeWindow::parse("fortnight", today, Weekday::Mon).is_none());
        assert_eq!(
            TimeWindow::parse("all time", today, Weekday::Mon),
            Some(TimeWindow::all_time())
        );
    }

    #[test]
    fn last_month_wraps_year() {
        let w = TimeWindow::from_keyword(WindowKeyword::LastMonth, d(2025, 1, 20), Weekday::Mon);
        assert_eq!(w.calendar_days().unwrap().len(), 31);
        assert_eq!(w.start(), Some(d(2024, 12, 1).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn last_seven_days_end_on_reference() {
        let w = TimeWindow::from_keyword(WindowKeyword::Last7Days, d(2025, 8, 13), Weekday::Sun);
        let days = w.calendar_days().unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days.last(), Some(&d(2025, 8, 13)));
    }

    #[test]
    fn unbounded_window_has_no_calendar_days() {
        assert!(TimeWindow::all_time().calendar_days().is_none());
        assert!(TimeWindow::all_time().overlaps_day(d(1990, 1, 1)));
    }

    #[test]
    fn overlaps_partial_day() {
        let start = d(2025, 8, 15).and_hms_opt(18, 0, 0).unwrap();
        let end = d(2025, 8, 16).and_hms_opt(6, 0, 0).unwrap();
        let w = TimeWindow::new(start, end).unwrap();
        assert!(w.overlaps_day(d(2025, 8, 15)));
        assert!(w.overlaps_day(d(2025, 8, 16)));
        assert!(!w.overlaps_day(d(2025, 8, 17)));
        assert_eq!(w.calendar_days().unwrap(), vec![d(2025, 8, 15), d(2025, 8, 16)]);
    }
}
