//! Calendar shapes for the month and week views.
//!
//! Nothing here looks at entries: the grid is generated first and callers
//! annotate it with ratings afterwards.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::colors::{Color, EmotionColorAssigner};
use crate::dates::{days_in_month, days_since_week_start, first_of_month, get_dates_in_range};
use crate::error::{LoopError, Result};
use crate::store::Ratings;

/// One annotated calendar cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub rating: Option<f64>,
    /// Present only for rated days.
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleGrid {
    pub first_weekday: Weekday,
}

impl ScheduleGrid {
    pub fn new(first_weekday: Weekday) -> Self {
        Self { first_weekday }
    }

    /// Days of the month laid out in rows of 7 starting on `first_weekday`.
    /// Padding cells before the 1st and after the last day are `None`; the
    /// length is always a multiple of 7.
    pub fn month_grid(&self, year: i32, month: u32) -> Result<Vec<Option<NaiveDate>>> {
        let invalid = || LoopError::InvalidMonth { year, month };
        let first = first_of_month(year, month).ok_or_else(invalid)?;
        let len = days_in_month(year, month).ok_or_else(invalid)?;
        let last = first + Duration::days(len as i64 - 1);

        let lead = days_since_week_start(first.weekday(), self.first_weekday) as usize;
        let mut grid: Vec<Option<NaiveDate>> = vec![None; lead];
        grid.extend(get_dates_in_range(first, last).into_iter().map(Some));
        let trail = (7 - grid.len() % 7) % 7;
        grid.extend(std::iter::repeat_n(None, trail));
        Ok(grid)
    }

    /// The 7 days ending on `reference`, oldest first.
    pub fn week_dates(&self, reference: NaiveDate) -> [NaiveDate; 7] {
        std::array::from_fn(|i| reference - Duration::days(6 - i as i64))
    }

    /// Attaches ratings and rating colors to a grid. Padding stays `None`.
    pub fn annotate(
        &self,
        grid: &[Option<NaiveDate>],
        ratings: &Ratings,
        colors: &EmotionColorAssigner,
    ) -> Vec<Option<DayCell>> {
        grid.iter()
            .map(|slot| {
                slot.map(|date| {
                    let rating = ratings.get(&date).copied();
                    DayCell {
                        date,
                        rating,
                        color: rating.map(|r| colors.color_for(rating_label(r))),
                    }
                })
            })
            .collect()
    }
}

/// Word for a 0-10 rating, used as the color key for rated days.
pub fn rating_label(rating: f64) -> &'static str {
    match rating {
        r if r < 2.0 => "rough",
        r if r < 4.0 => "low",
        r if r < 6.0 => "okay",
        r if r < 8.0 => "good",
        _ => "great",
    }
}
