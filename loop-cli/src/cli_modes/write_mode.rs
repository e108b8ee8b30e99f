use super::CliModeResult;
use crate::{Cli, render::Renderer};
use anyhow::{Context, Result, anyhow, bail};
use log::info;
use loop_core::{LoopApp, schedule::rating_label};

pub fn write_mode(cli: &Cli, renderer: &Renderer, app: &LoopApp) -> Result<CliModeResult> {
    if let Some(args) = &cli.rate {
        let [day, value] = args.as_slice() else {
            bail!("--rate takes a day and a rating");
        };
        let date = app
            .parse_day(day)
            .ok_or_else(|| anyhow!("could not read '{day}' as a day"))?;
        let rating: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("'{value}' is not a number"))?;
        app.store.record_rating(date, rating)?;
        info!("recorded rating {rating} for {date}");
        renderer.print_info(&format!(
            "Rated {}: {rating:.1} ({})",
            date.format(&app.config.date_format),
            rating_label(rating)
        ));
        return Ok(CliModeResult::Finish);
    }

    if let Some(id) = &cli.delete {
        if app.store.delete_entry(id)? {
            info!("deleted entry {id}");
            renderer.print_info(&format!("Deleted loop {id}."));
        } else {
            renderer.print_info(&format!("No loop with id {id}."));
        }
        return Ok(CliModeResult::Finish);
    }

    Ok(CliModeResult::NothingToDo)
}
