mod cli;
mod cli_modes;
mod render;

use anyhow::Result;
use cli::Cli;
use cli_modes::{CliModeResult, calendar_mode, read_mode, write_mode};
use clap::Parser;
use loop_core::LoopApp;
use render::{RenderOptions, Renderer};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("loop: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let app = LoopApp::new()?;

    let renderer = Renderer::new(RenderOptions {
        date_format: app.config.date_format.clone(),
        use_color: cli.color.enabled(),
        first_weekday: app.config.first_weekday,
    });

    if cli.path {
        renderer.print_info(&format!("{}", app.config.data_dir.display()));
        return Ok(());
    }

    for mode in [write_mode, read_mode, calendar_mode] {
        if mode(&cli, &renderer, &app)? == CliModeResult::Finish {
            return Ok(());
        }
    }

    // No flags: show today.
    let today = app.day_activity(app.config.reference_date)?;
    renderer.print_day(&today);
    Ok(())
}
