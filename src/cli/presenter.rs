//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::session::StatusSnapshot;

const BAR_TEMPLATE: &str = "{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// Presenter for CLI output formatting
pub struct Presenter {
    progress: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { progress: None }
    }

    /// Show a progress bar for a typing session
    pub fn start_progress(&mut self, message: &str) {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        self.progress = Some(bar);
    }

    /// Mirror a status poll onto the progress bar
    pub fn update_progress(&self, status: &StatusSnapshot) {
        if let Some(ref bar) = self.progress {
            bar.set_length(status.total_chars as u64);
            bar.set_position(status.progress as u64);
            bar.set_message(self.format_status(status));
        }
    }

    /// Mark progress as success and finish
    pub fn progress_success(&mut self, message: &str) {
        if let Some(bar) = self.progress.take() {
            bar.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark progress as failed and finish
    pub fn progress_fail(&mut self, message: &str) {
        if let Some(bar) = self.progress.take() {
            bar.abandon_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout (machine-readable output)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Short human label for a status poll
    pub fn format_status(&self, status: &StatusSnapshot) -> String {
        match status.current_status.strip_prefix("COUNTDOWN_") {
            Some(rest) => format!("Starting in {}s...", rest.trim_end_matches('S')),
            None => match status.current_status.as_str() {
                "PREPARING" => "Preparing...".to_string(),
                "TYPING" => format!("Typing... {}%", status.progress_percent),
                other => other.to_lowercase(),
            },
        }
    }

    /// Print daemon status
    pub fn daemon_status(&self, state: &str) {
        eprintln!("{} Daemon: {}", "●".cyan(), state);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(current: &str, progress: usize, total: usize, percent: u8) -> StatusSnapshot {
        StatusSnapshot {
            is_typing: true,
            progress,
            total_chars: total,
            progress_percent: percent,
            current_status: current.to_string(),
            last_event: String::new(),
        }
    }

    #[test]
    fn format_countdown() {
        let presenter = Presenter::new();
        assert_eq!(
            presenter.format_status(&status("COUNTDOWN_3S", 0, 10, 0)),
            "Starting in 3s..."
        );
    }

    #[test]
    fn format_typing_shows_percent() {
        let presenter = Presenter::new();
        assert_eq!(
            presenter.format_status(&status("TYPING", 5, 10, 50)),
            "Typing... 50%"
        );
    }

    #[test]
    fn format_terminal_is_lowercase() {
        let presenter = Presenter::new();
        assert_eq!(
            presenter.format_status(&status("ABORTED", 2, 10, 20)),
            "aborted"
        );
    }

    #[test]
    fn update_without_bar_is_noop() {
        let presenter = Presenter::new();
        presenter.update_progress(&status("TYPING", 1, 2, 50));
    }
}
