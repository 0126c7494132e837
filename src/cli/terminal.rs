//! Terminal capability detection and styling

use giftwise::{BudgetStatus, Priority};
use owo_colors::{OwoColorize, colors::css};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Check if terminal is narrow (< 60 columns)
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < 60)
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as danger (red)
    fn danger(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
    /// Strike the text through, for purchased gifts
    fn struck(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        styled(self, |s| s.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        styled(self, |s| s.fg::<css::Orange>().to_string())
    }

    fn danger(&self) -> String {
        styled(self, |s| s.fg::<css::Crimson>().to_string())
    }

    fn info(&self) -> String {
        styled(self, |s| s.fg::<css::LightBlue>().to_string())
    }

    fn dim(&self) -> String {
        styled(self, |s| s.dimmed().to_string())
    }

    fn struck(&self) -> String {
        styled(self, |s| s.strikethrough().dimmed().to_string())
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn danger(&self) -> String {
        self.as_str().danger()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }

    fn struck(&self) -> String {
        self.as_str().struck()
    }
}

fn styled(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}

/// Label for a budget status, colored by severity.
pub fn budget_label(status: BudgetStatus) -> String {
    match status {
        BudgetStatus::None => "no budget".dim(),
        BudgetStatus::Under => "under budget".success(),
        BudgetStatus::Over => "over budget".danger(),
    }
}

/// Label for a priority, colored by weight.
pub fn priority_label(priority: Priority) -> String {
    match priority {
        Priority::Low => priority.as_str().dim(),
        Priority::Medium => priority.as_str().info(),
        Priority::High => priority.as_str().warning(),
    }
}
