use super::App;
use crate::ui::check_mark;
use colored::*;
use schemashift::{MigrationId, Result};

pub async fn commits(app: &App, migration: Option<MigrationId>) -> Result<()> {
    let commits = match migration {
        Some(id) => {
            app.registry().get(id).await?;
            app.history.commits_for(id).await?
        }
        None => app.history.list_commits().await?,
    };

    if commits.is_empty() {
        println!("{} No commits yet.", "[i]".cyan());
        return Ok(());
    }

    for commit in &commits {
        println!(
            "{} {} #{} {}",
            commit.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            format!("c{}", commit.id).yellow(),
            commit.migration_id,
            commit.message
        );
    }

    Ok(())
}

pub async fn validations(app: &App, migration: Option<MigrationId>) -> Result<()> {
    let results = match migration {
        Some(id) => {
            app.registry().get(id).await?;
            app.history.validation_results_for(id).await?
        }
        None => app.history.list_validation_results().await?,
    };

    if results.is_empty() {
        println!("{} No validation results yet.", "[i]".cyan());
        return Ok(());
    }

    for result in &results {
        println!(
            "{} migration #{}: pre-check {}, post-check {}",
            result.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            result.migration_id,
            check_mark(result.pre_check),
            check_mark(result.post_check)
        );
        for warning in &result.warnings {
            println!("    {} {}", "warning:".yellow(), warning);
        }
    }

    Ok(())
}
