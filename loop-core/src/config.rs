use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate, Weekday};
use directories::BaseDirs;
use log::warn;
use serde::Deserialize;
use std::{fs, path::PathBuf};

use crate::colors::{Color, DEFAULT_PALETTE};
use crate::trends::TrendOptions;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `entries.json` and `ratings.json`.
    pub data_dir: PathBuf,
    /// Column the calendar starts on. Default is Sunday.
    pub first_weekday: Weekday,
    pub trend_options: TrendOptions,
    /// Colors handed out to moods, in order.
    pub palette: Vec<Color>,
    /// How dates are shown, e.g. `%A, %d %b %Y`.
    pub date_format: String,
    /// Formats accepted when a day is typed in. `today`/`yesterday` always work.
    pub input_date_formats: Vec<String>,
    /// The date to use as "today" for relative keywords.
    pub reference_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    first_weekday: Option<String>,
    min_support: Option<usize>,
    top_emotions: Option<usize>,
    /// `palette = ["#A28BD4", "#F4A261"]`
    palette: Option<Vec<String>>,
    date_format: Option<String>,
    input_date_formats: Option<Vec<String>>,
}

impl Config {
    /// Load config from disk (first XDG path, then native) and apply defaults.
    pub fn load() -> Result<Self> {
        let file_config = Self::read_file_config()?;
        Self::from_file_config(file_config)
    }

    fn from_file_config(file_config: FileConfig) -> Result<Self> {
        let defaults = TrendOptions::default();

        let first_weekday = match file_config.first_weekday.as_deref() {
            Some(day) => day.trim().parse::<Weekday>().unwrap_or_else(|_| {
                warn!("unknown first_weekday '{day}', using Sunday");
                Weekday::Sun
            }),
            None => Weekday::Sun,
        };

        let min_support = file_config.min_support.unwrap_or(defaults.min_support);
        if min_support == 0 {
            bail!("min_support must be at least 1");
        }
        let top_emotions = match file_config.top_emotions {
            Some(0) => {
                warn!("top_emotions = 0 would hide every mood, using {}", defaults.top_emotions);
                defaults.top_emotions
            }
            Some(n) => n,
            None => defaults.top_emotions,
        };

        let palette = match file_config.palette {
            Some(raw) => Self::parse_palette(&raw)?,
            None => DEFAULT_PALETTE.to_vec(),
        };

        Ok(Self {
            data_dir: file_config.data_dir.unwrap_or_else(Self::default_data_dir),
            first_weekday,
            trend_options: TrendOptions {
                top_emotions,
                min_support,
            },
            palette,
            date_format: file_config
                .date_format
                .unwrap_or_else(|| "%A, %d %b %Y".to_string()),
            input_date_formats: file_config
                .input_date_formats
                .unwrap_or_else(|| vec!["%Y-%m-%d".to_string()]),
            reference_date: Local::now().date_naive(),
        })
    }

    /// Skips colors that don't parse; a palette left empty is an error.
    fn parse_palette(raw: &[String]) -> Result<Vec<Color>> {
        let palette: Vec<Color> = raw
            .iter()
            .filter_map(|c| match c.parse::<Color>() {
                Ok(color) => Some(color),
                Err(e) => {
                    warn!("ignoring palette color: {e}");
                    None
                }
            })
            .collect();
        if palette.is_empty() {
            bail!("palette has no valid colors");
        }
        Ok(palette)
    }

    /// Default data root: `{data_dir}/loop`
    /// - macOS:   `~/Library/Application Support/loop`
    /// - Linux:   `$XDG_DATA_HOME/loop` or `~/.local/share/loop`
    /// - Windows: `%APPDATA%\loop`
    fn default_data_dir() -> PathBuf {
        if let Some(base) = BaseDirs::new() {
            base.data_dir().join("loop")
        } else {
            PathBuf::from("./loop")
        }
    }

    fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(b) = BaseDirs::new() {
            v.push(b.home_dir().join(".config").join("loop").join("config.toml"));
            v.push(b.config_dir().join("loop").join("config.toml"));
        }
        v
    }

    /// Read the first existing config file and parse it.
    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            let s =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            return Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()));
        }
        Ok(FileConfig::default())
    }

    fn parse_file(s: &str) -> Result<FileConfig> {
        Ok(toml::from_str::<FileConfig>(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn candidates_prioritize_xdg_then_native() {
        if let Some(b) = BaseDirs::new() {
            let expected_xdg = b.home_dir().join(".config").join("loop").join("config.toml");
            let expected_native = b.config_dir().join("loop").join("config.toml");
            let c = Config::config_file_paths();
            assert_eq!(c.first(), Some(&expected_xdg));
            assert_eq!(c.get(1), Some(&expected_native));
        }
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_file_config(Config::parse_file("").unwrap()).unwrap();
        assert_eq!(config.first_weekday, Weekday::Sun);
        assert_eq!(config.trend_options, TrendOptions::default());
        assert_eq!(config.palette, DEFAULT_PALETTE.to_vec());
        assert_eq!(config.input_date_formats, vec!["%Y-%m-%d".to_string()]);
        assert!(config.data_dir.ends_with("loop"));
    }

    #[test]
    fn parse_file_accepts_all_keys() {
        let toml = r##"
            data_dir = "/tmp/my-loops"
            first_weekday = "monday"
            min_support = 3
            top_emotions = 6
            palette = ["#E06C75", "98C379"]
            input_date_formats = ["%d/%m/%Y"]
        "##;
        let config = Config::from_file_config(Config::parse_file(toml).unwrap()).unwrap();
        assert_eq!(config.data_dir, Path::new("/tmp/my-loops"));
        assert_eq!(config.first_weekday, Weekday::Mon);
        assert_eq!(config.trend_options.min_support, 3);
        assert_eq!(config.trend_options.top_emotions, 6);
        assert_eq!(
            config.palette,
            vec![Color::rgb(0xE0, 0x6C, 0x75), Color::rgb(0x98, 0xC3, 0x79)]
        );
        assert_eq!(config.input_date_formats, vec!["%d/%m/%Y".to_string()]);
    }

    #[test]
    fn bad_values_fall_back() {
        let toml = r##"
            first_weekday = "someday"
            top_emotions = 0
            palette = ["not-a-color", "#5E9CD3"]
        "##;
        let config = Config::from_file_config(Config::parse_file(toml).unwrap()).unwrap();
        assert_eq!(config.first_weekday, Weekday::Sun);
        assert_eq!(config.trend_options.top_emotions, 4);
        assert_eq!(config.palette, vec![Color::rgb(0x5E, 0x9C, 0xD3)]);
    }

    #[test]
    fn zero_support_and_empty_palette_are_errors() {
        let fc = Config::parse_file("min_support = 0").unwrap();
        assert!(Config::from_file_config(fc).is_err());

        let fc = Config::parse_file("palette = []").unwrap();
        assert!(Config::from_file_config(fc).is_err());
    }

    #[test]
    fn wrong_type_fails_to_parse() {
        assert!(Config::parse_file("min_support = \"two\"").is_err());
    }
}
