use super::App;
use crate::ui::{ConfirmPrompt, MultiProgressDisplay};
use colored::*;
use futures::future::join_all;
use schemashift::{ExecutionReport, MigrationError, MigrationId, Result};

/// Execute migrations concurrently, one spinner each
///
/// Every id is attempted; the first system error (not a simulated failure)
/// is returned after all runs finish.
pub async fn execute(app: &App, ids: &[MigrationId]) -> Result<()> {
    let display = MultiProgressDisplay::new();

    let runs = ids.iter().map(|&id| {
        let spinner = display.add_spinner(&format!("Executing migration #{}...", id));
        let display = &display;
        async move {
            let result = app.orchestrator.execute(id).await;
            match &result {
                Ok(report) if report.succeeded() => {
                    display.finish_spinner(&spinner, &format!("#{} completed", id))
                }
                Ok(_) => display.fail_spinner(&spinner, &format!("#{} failed", id)),
                Err(e) => display.fail_spinner(&spinner, &format!("#{}: {}", id, e)),
            }
            (id, result)
        }
    });

    let mut first_error = None;
    for (id, result) in join_all(runs).await {
        match result {
            Ok(report) => print_report(&report),
            Err(e) => {
                eprintln!("{} Migration #{}: {}", "[X]".red(), id, e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn print_report(report: &ExecutionReport) {
    let migration = &report.migration;

    if report.succeeded() {
        println!(
            "{} Migration #{} {} completed",
            "[OK]".green().bold(),
            migration.id,
            migration.name.bold()
        );
    } else {
        println!(
            "{} Migration #{} {} failed",
            "[!]".red().bold(),
            migration.id,
            migration.name.bold()
        );
    }

    if let Some(commit) = &report.commit {
        println!("  Commit: {}", commit.message);
    }

    for warning in &report.validation.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
}

pub async fn rollback(app: &App, id: MigrationId, yes: bool) -> Result<()> {
    if !yes {
        let migration = app.registry().get(id).await?;
        if !ConfirmPrompt::new().confirm_rollback(&migration)? {
            return Err(MigrationError::UserCancelled);
        }
    }

    let spinner = crate::ui::progress::create_spinner(&format!("Rolling back migration #{}...", id));
    let result = app.orchestrator.rollback(id).await;
    spinner.finish_and_clear();

    let report = result?;
    println!(
        "{} Migration #{} {} rolled back",
        "[OK]".green().bold(),
        report.migration.id,
        report.migration.name.bold()
    );
    println!("  Commit: {}", report.commit.message);

    Ok(())
}
