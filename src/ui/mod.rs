pub mod progress;
pub mod prompt;

pub use progress::MultiProgressDisplay;
pub use prompt::ConfirmPrompt;

use colored::*;
use schemashift::MigrationStatus;

/// Colored status label
pub fn status_badge(status: MigrationStatus) -> ColoredString {
    let label = format!("[{}]", status.label());
    match status {
        MigrationStatus::Pending => label.yellow(),
        MigrationStatus::Running => label.blue(),
        MigrationStatus::Completed => label.green(),
        MigrationStatus::Failed => label.red(),
    }
}

/// Check mark for a pre/post check
pub fn check_mark(passed: bool) -> ColoredString {
    if passed {
        "Passed".green()
    } else {
        "Failed".red()
    }
}
