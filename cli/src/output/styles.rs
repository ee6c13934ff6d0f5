//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

use cats_common::Verdict;

/// Centralized stylesheet for CLI output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// Success messages and passed scenarios (green)
    pub success: Style,
    /// Warnings and skipped scenarios (yellow)
    pub warning: Style,
    /// Errors and failed scenarios (red)
    pub error: Style,
    /// Info messages (blue)
    pub info: Style,
    /// Dimmed/secondary text
    pub dim: Style,
    /// Bold text
    pub bold: Style,
    /// Headers/section titles
    pub header: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().blue();
        self.dim = Style::new().dimmed();
        self.bold = Style::new().bold();
        self.header = Style::new().bold().cyan();
    }

    /// Style a scenario verdict is printed in.
    #[must_use]
    pub fn verdict(&self, verdict: Verdict) -> Style {
        match verdict {
            Verdict::Passed => self.success,
            Verdict::Failed => self.error,
            Verdict::Skipped => self.warning,
        }
    }
}
