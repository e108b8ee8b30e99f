use super::CliModeResult;
use crate::{Cli, render::Renderer};
use anyhow::{Result, anyhow};
use chrono::{Datelike, NaiveDate};
use loop_core::LoopApp;

pub fn calendar_mode(cli: &Cli, renderer: &Renderer, app: &LoopApp) -> Result<CliModeResult> {
    if let Some(month) = &cli.calendar {
        let (year, month) = if month.trim().is_empty() {
            app.current_month()
        } else {
            parse_month(month)?
        };
        let cells = app.month_calendar(year, month)?;
        let title = NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| first.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("{year}-{month:02}"));
        renderer.print_calendar(&title, &cells);
        return Ok(CliModeResult::Finish);
    }

    if cli.week {
        let week = app.week(app.config.reference_date)?;
        renderer.print_week(&week);
        return Ok(CliModeResult::Finish);
    }

    Ok(CliModeResult::NothingToDo)
}

/// `YYYY-MM` into a year and month.
fn parse_month(input: &str) -> Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .map_err(|_| anyhow!("could not read '{input}' as a month, expected YYYY-MM"))?;
    Ok((first.year(), first.month()))
}
