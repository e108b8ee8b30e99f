use clap::{ArgGroup, Parser};

use crate::render::ColorMode;

/// loop: reflection schedule and mood trends
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    group(ArgGroup::new("read_mode").args(["on", "trends", "correlations"])),
    group(ArgGroup::new("calendar_mode").args(["calendar", "week"])),
    group(ArgGroup::new("write_mode").args(["rate", "delete"])),
    group(ArgGroup::new("solo").args(["path"]).conflicts_with_all(["read_mode", "calendar_mode", "write_mode"])),
)]
pub struct Cli {
    /// Prints the data directory
    #[arg(long, short)]
    pub path: bool,
    /// Control ANSI colors in output.
    /// By default, colors are disabled when output is redirected (e.g with `>` or `|`).
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Show the loops recorded on a day (e.g., `loop --on yesterday`, `loop --on 2025-08-14`)
    #[arg(long)]
    pub on: Option<String>,
    /// Top emotions and speaking highlights for a window (e.g., `loop --trends "this month"`)
    #[arg(long)]
    pub trends: Option<String>,
    /// How each bucket moves the day rating: `topic`, `sleep`, `time-of-day` or `word-count`
    #[arg(long)]
    pub correlations: Option<String>,
    /// Window for `--correlations` (default: "last 30 days")
    #[arg(long, requires = "correlations")]
    pub window: Option<String>,

    /// Month calendar with day ratings. Takes `YYYY-MM`, or shows the current month.
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub calendar: Option<String>,
    /// The last 7 days with their ratings
    #[arg(long, short)]
    pub week: bool,

    /// Record a day rating from 0 to 10 (e.g., `loop --rate today 7.5`)
    #[arg(long, num_args = 2, value_names = ["DAY", "RATING"])]
    pub rate: Option<Vec<String>>,
    /// Delete a loop by id
    #[arg(long)]
    pub delete: Option<String>,
}
