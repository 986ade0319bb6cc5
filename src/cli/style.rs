//! Terminal styling helpers for CLI output

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark glyph used in summaries
pub const CHECK: &str = "✓";

/// Cross glyph used for skips and failures
pub const CROSS: &str = "✗";

/// Styled string helpers
pub trait Stylize {
    /// Dim, for secondary information
    fn muted(&self) -> String;
    /// Bold, for headings
    fn emphasis(&self) -> String;
    /// Cyan, for names and values
    fn accent(&self) -> String;
    /// Green, for successful outcomes
    fn success(&self) -> String;
    /// Yellow, for problems that did not stop the run
    fn warn(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn muted(&self) -> String {
        format!("{}", self.dimmed())
    }

    fn emphasis(&self) -> String {
        format!("{}", self.bold())
    }

    fn accent(&self) -> String {
        format!("{}", self.cyan())
    }

    fn success(&self) -> String {
        format!("{}", self.green())
    }

    fn warn(&self) -> String {
        format!("{}", self.yellow())
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.green().to_string()
}

/// Yellow cross mark
pub fn cross() -> String {
    CROSS.yellow().to_string()
}
