//! # Terminal Output
//!
//! This module decides how run results look on the terminal: whether color
//! and emoji are used, and how status lines are styled.
//!
//! ## Respecting User Preferences
//!
//! Color is controlled by the `--color` flag and the usual environment
//! conventions:
//! - `--color=never|always|auto`
//! - `NO_COLOR` disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` disables colors
//! - `CLICOLOR_FORCE=1` forces colors even when stderr is not a TTY
//! - `TERM=dumb` disables colors
//!
//! Status lines go to stderr so that `--stdout` output stays a clean document.

use std::env;

use console::{style, Term};

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

/// Kinds of status line printed after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Written,
    Unchanged,
    Skipped,
    Failed,
}

impl OutputConfig {
    /// Creates an output configuration from the environment and the `--color`
    /// flag value (`always`, `never` or `auto`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        Term::stderr().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Formats a status line: a marker followed by `message`.
    pub fn status_line(&self, status: Status, message: &str) -> String {
        let (emoji_str, plain) = match status {
            Status::Written => ("✅", "[WRITTEN]"),
            Status::Unchanged => ("💤", "[UNCHANGED]"),
            Status::Skipped => ("⚠️ ", "[SKIPPED]"),
            Status::Failed => ("❌", "[FAILED]"),
        };
        let marker = emoji(self, emoji_str, plain);

        if !self.use_color {
            return format!("{marker} {message}");
        }

        let styled = match status {
            Status::Written => style(message).green(),
            Status::Unchanged => style(message).dim(),
            Status::Skipped => style(message).yellow(),
            Status::Failed => style(message).red().bold(),
        }
        .force_styling(true);
        format!("{marker} {styled}")
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns `emoji_str` when colors are enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}
