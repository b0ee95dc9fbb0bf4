use super::App;
use crate::ui::{check_mark, status_badge};
use colored::*;
use schemashift::{templates, Migration, MigrationError, MigrationId, MigrationType, Result};
use std::fs;
use std::path::Path;

/// Parsed `create` arguments
pub struct CreateRequest<'a> {
    pub name: &'a str,
    pub migration_type: Option<MigrationType>,
    pub config: Option<&'a str>,
    pub config_file: Option<&'a Path>,
    pub template: Option<&'a str>,
}

pub async fn create(app: &App, request: CreateRequest<'_>) -> Result<()> {
    let template = match request.template {
        Some(key) => Some(templates::find(key).ok_or_else(|| {
            MigrationError::InvalidInput(format!("unknown template: {}", key))
        })?),
        None => None,
    };

    let migration_type = request
        .migration_type
        .or_else(|| template.as_ref().map(|t| t.migration_type))
        .ok_or_else(|| {
            MigrationError::InvalidInput("a migration type (--type) is required".to_string())
        })?;

    let config = match (request.config, request.config_file, &template) {
        (Some(inline), _, _) => inline.to_string(),
        (None, Some(path), _) => fs::read_to_string(path)?,
        (None, None, Some(template)) => template.config_json(),
        (None, None, None) => {
            return Err(MigrationError::InvalidInput(
                "a configuration is required (--config, --config-file or --template)".to_string(),
            ))
        }
    };

    let migration = app
        .registry()
        .create(request.name, migration_type, &config)
        .await?;

    println!(
        "{} Created migration #{} {} ({})",
        "[OK]".green().bold(),
        migration.id,
        migration.name.bold(),
        migration.migration_type.label()
    );

    Ok(())
}

pub async fn list(app: &App) -> Result<()> {
    let mut migrations = app.registry().list().await?;
    migrations.sort_by_key(|m| m.id);

    if migrations.is_empty() {
        println!("{} No migrations yet. Create one with `schemashift create`.", "[i]".cyan());
        return Ok(());
    }

    for migration in &migrations {
        print_row(migration);
    }

    let summary = app.history.summary().await?;
    println!(
        "\n{} total, {} pending, {} running, {} completed, {} failed",
        summary.total().to_string().bold(),
        summary.pending,
        summary.running,
        summary.completed.to_string().green(),
        summary.failed.to_string().red()
    );

    Ok(())
}

fn print_row(migration: &Migration) {
    println!(
        "#{:<4} {:<32} {:<13} {:<18} v{}",
        migration.id,
        migration.name,
        status_badge(migration.status),
        migration.migration_type.as_str(),
        migration.version
    );
    if let Some(line) = migration.latest_log() {
        println!("      {}", line.dimmed());
    }
}

pub async fn show(app: &App, id: MigrationId) -> Result<()> {
    let migration = app.registry().get(id).await?;

    println!(
        "{} #{} {} {}",
        "[>]".cyan(),
        migration.id,
        migration.name.bold(),
        status_badge(migration.status)
    );
    println!("  Type:    {}", migration.migration_type.label());
    println!("  Version: {}", migration.version);
    println!("  Created: {}", migration.created_at.format("%Y-%m-%d %H:%M:%S UTC"));

    println!("\n{}", "Config:".bold());
    let config = serde_json::to_string_pretty(&migration.config)?;
    for line in config.lines() {
        println!("  {}", line);
    }

    println!("\n{}", "Logs:".bold());
    if migration.logs.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (idx, line) in migration.logs.iter().enumerate() {
        println!("  {:>3}. {}", idx + 1, line);
    }

    let commits = app.history.commits_for(id).await?;
    if !commits.is_empty() {
        println!("\n{}", "Commits:".bold());
        for commit in &commits {
            println!(
                "  {} {}",
                commit.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
                commit.message
            );
        }
    }

    let results = app.history.validation_results_for(id).await?;
    if !results.is_empty() {
        println!("\n{}", "Validation:".bold());
        for result in &results {
            println!(
                "  {} pre-check {}, post-check {}, {} warning(s)",
                result.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
                check_mark(result.pre_check),
                check_mark(result.post_check),
                result.warnings.len()
            );
        }
    }

    Ok(())
}

pub fn print_templates() {
    for template in templates::all() {
        println!(
            "{} {} ({})",
            "[T]".cyan(),
            template.name.bold(),
            template.migration_type.as_str().yellow()
        );
        println!("    {}", template.description.dimmed());
        for line in template.config_json().lines() {
            println!("    {}", line);
        }
    }
}
