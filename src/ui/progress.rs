use colored::*;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner shown while a migration works through its stages
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(TICKS)
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Several spinners at once (one per migration being executed)
pub struct MultiProgressDisplay {
    multi: MultiProgress,
}

impl MultiProgressDisplay {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
        }
    }

    pub fn add_spinner(&self, message: &str) -> ProgressBar {
        let spinner = create_spinner(message);
        self.multi.add(spinner)
    }

    pub fn finish_spinner(&self, spinner: &ProgressBar, message: &str) {
        spinner.finish_with_message(format!("{} {}", "✓".green(), message));
    }

    pub fn fail_spinner(&self, spinner: &ProgressBar, message: &str) {
        spinner.finish_with_message(format!("{} {}", "✗".red(), message));
    }
}

impl Default for MultiProgressDisplay {
    fn default() -> Self {
        Self::new()
    }
}
