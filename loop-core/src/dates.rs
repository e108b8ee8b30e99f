use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};

/// Default accepted input date formats (parsing only).
const DEFAULT_FORMATS: &[&str] = &["%Y-%m-%d"];

/// Generates a vector of `NaiveDate`s, inclusive of the start and end dates.
/// If `start` is after `end`, the resulting vector will be empty.
///
/// # Examples
///
/// ```
/// # use chrono::NaiveDate;
/// # use loop_core::dates::get_dates_in_range;
/// let start_date = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
/// let end_date = NaiveDate::from_ymd_opt(2025, 8, 17).unwrap();
///
/// let dates = get_dates_in_range(start_date, end_date);
///
/// assert_eq!(dates.len(), 3);
/// assert_eq!(dates[0], NaiveDate::from_ymd_opt(2025, 8, 15).unwrap());
/// assert_eq!(dates[2], NaiveDate::from_ymd_opt(2025, 8, 17).unwrap());
/// ```
pub fn get_dates_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = Some(start);
    while let Some(day) = current.filter(|day| *day <= end) {
        dates.push(day);
        current = day.succ_opt();
    }
    dates
}

/// First day of the month, `None` for an invalid year/month pair.
pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// First day of the following month.
pub fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

/// Number of days in the month, `None` for an invalid year/month pair.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = first_of_month(year, month)?;
    let next = first_of_next_month(first)?;
    Some((next - first).num_days() as u32)
}

/// The day on or before `date` that falls on `first_weekday`.
pub fn start_of_week(date: NaiveDate, first_weekday: Weekday) -> NaiveDate {
    let back = days_since_week_start(date.weekday(), first_weekday) as u64;
    date.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN)
}

/// Column of `day` in a week that starts on `first_weekday` (0..=6).
pub fn days_since_week_start(day: Weekday, first_weekday: Weekday) -> u32 {
    (day.num_days_from_monday() + 7 - first_weekday.num_days_from_monday()) % 7
}

/// Whether `time` lies in `[start, end)`. When `start > end` the range wraps
/// midnight, so `[22:00, 02:00)` covers late evening and early morning.
pub fn time_is_in_range(start: NaiveTime, end: NaiveTime, time: NaiveTime) -> bool {
    if start <= end {
        start <= time && time < end
    } else {
        time >= start || time < end
    }
}

/// Parses a day argument: `today`, `yesterday`, `tomorrow`, or one of `formats`
/// (`%Y-%m-%d` when none are given).
pub fn parse_day(input: &str, reference: NaiveDate, formats: &[String]) -> Option<NaiveDate> {
    let trimmed = input.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "today" => return Some(reference),
        "yesterday" => return reference.pred_opt(),
        "tomorrow" => return reference.succ_opt(),
        _ => {}
    }

    if formats.is_empty() {
        DEFAULT_FORMATS
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(trimmed, f).ok())
    } else {
        formats
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(trimmed, f).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn range_reversed_is_empty() {
        assert!(get_dates_in_range(d(2025, 8, 17), d(2025, 8, 15)).is_empty());
    }

    #[test]
    fn range_stops_at_last_representable_day() {
        let before = NaiveDate::MAX.pred_opt().unwrap();
        assert_eq!(
            get_dates_in_range(before, NaiveDate::MAX),
            vec![before, NaiveDate::MAX]
        );
        assert_eq!(start_of_week(NaiveDate::MIN, Weekday::Sun), NaiveDate::MIN);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2025, 12), Some(31));
        assert_eq!(days_in_month(2025, 13), None);
    }

    #[test]
    fn week_start_respects_first_weekday() {
        // Wednesday
        let wed = d(2025, 8, 13);
        assert_eq!(start_of_week(wed, Weekday::Mon), d(2025, 8, 11));
        assert_eq!(start_of_week(wed, Weekday::Sun), d(2025, 8, 10));
        assert_eq!(start_of_week(wed, Weekday::Wed), wed);
    }

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn range_is_half_open_normal() {
        let (start, end) = (t(6, 0, 0), t(12, 0, 0));
        assert!(time_is_in_range(start, end, t(6, 0, 0)));
        assert!(time_is_in_range(start, end, t(11, 59, 59)));
        assert!(!time_is_in_range(start, end, t(12, 0, 0)));
        assert!(!time_is_in_range(start, end, t(5, 59, 59)));
    }

    #[test]
    fn range_wraps_midnight() {
        let (start, end) = (t(22, 0, 0), t(2, 0, 0));
        assert!(time_is_in_range(start, end, t(23, 0, 0)));
        assert!(time_is_in_range(start, end, t(1, 59, 59)));
        assert!(!time_is_in_range(start, end, t(2, 0, 0)));
        assert!(!time_is_in_range(start, end, t(21, 59, 59)));
    }

    #[test]
    fn parse_day_keywords_and_formats() {
        let today = d(2025, 8, 15);
        assert_eq!(parse_day("today", today, &[]), Some(today));
        assert_eq!(parse_day("Yesterday", today, &[]), Some(d(2025, 8, 14)));
        assert_eq!(parse_day("2025-01-02", today, &[]), Some(d(2025, 1, 2)));
        assert_eq!(parse_day("02/01/2025", today, &[]), None);

        let fmts = vec!["%d/%m/%Y".to_string()];
        assert_eq!(parse_day("02/01/2025", today, &fmts), Some(d(2025, 1, 2)));
    }
}
