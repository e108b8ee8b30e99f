use clap::ValueEnum;
use std::io::{self, IsTerminal};

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// `Auto` turns colors off for redirected output or when `NO_COLOR` is set.
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                if std::env::var_os("NO_COLOR").is_some() {
                    false
                } else {
                    io::stdout().is_terminal()
                }
            }
        }
    }
}
