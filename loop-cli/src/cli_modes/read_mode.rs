use super::CliModeResult;
use crate::{Cli, render::Renderer};
use anyhow::{Context, Result, anyhow};
use log::debug;
use loop_core::{CorrelationCategory, LoopApp, TimeWindow};
use strum::IntoEnumIterator;

const DEFAULT_CORRELATION_WINDOW: &str = "last 30 days";

pub fn read_mode(cli: &Cli, renderer: &Renderer, app: &LoopApp) -> Result<CliModeResult> {
    if let Some(on) = &cli.on {
        let day = app
            .parse_day(on)
            .ok_or_else(|| anyhow!("could not read '{on}' as a day"))?;
        let activity = app
            .day_activity(day)
            .with_context(|| format!("loading loops for {day}"))?;
        renderer.print_day(&activity);
        return Ok(CliModeResult::Finish);
    }

    if let Some(input) = &cli.trends {
        let window = resolve_window(app, input)?;
        let engine = app.trends(&window)?;
        renderer.print_md(&format!("## Trends: {input}"));

        let series = engine.rating_series(&window);
        let rated: Vec<f64> = series.iter().filter_map(|(_, rating)| *rating).collect();
        if rated.is_empty() {
            renderer.print_info("No rated days in this window.");
        } else {
            let mean = rated.iter().sum::<f64>() / rated.len() as f64;
            renderer.print_info(&format!(
                "{} of {} days rated, average {mean:.1}",
                rated.len(),
                series.len()
            ));
        }

        renderer.print_top_emotions(&engine.top_emotions(&window), &app.colors);
        renderer.print_highlights(&engine.speaking_highlights(&window));
        return Ok(CliModeResult::Finish);
    }

    if let Some(input) = &cli.correlations {
        let category: CorrelationCategory = input.trim().parse().map_err(|_| {
            let known: Vec<String> = CorrelationCategory::iter()
                .map(|c| c.as_ref().to_string())
                .collect();
            anyhow!("unknown category '{input}', expected one of: {}", known.join(", "))
        })?;
        let window_input = cli.window.as_deref().unwrap_or(DEFAULT_CORRELATION_WINDOW);
        let window = resolve_window(app, window_input)?;
        let engine = app.trends(&window)?;
        let effects = engine.correlations(&window, category, &app.colors);
        debug!("{} bucket(s) for {}", effects.len(), category.as_ref());
        renderer.print_correlations(category.as_ref(), &effects);
        return Ok(CliModeResult::Finish);
    }

    Ok(CliModeResult::NothingToDo)
}

fn resolve_window(app: &LoopApp, input: &str) -> Result<TimeWindow> {
    let window = app
        .parse_window(input)
        .ok_or_else(|| anyhow!("could not read '{input}' as a day or window"))?;
    debug!("window '{input}' resolved to {window:?}");
    Ok(window)
}
