use crate::ui::status_badge;
use colored::*;
use dialoguer::Confirm;
use schemashift::{Migration, MigrationError, Result};

pub struct ConfirmPrompt;

impl ConfirmPrompt {
    pub fn new() -> Self {
        Self
    }

    pub fn confirm_rollback(&self, migration: &Migration) -> Result<bool> {
        eprintln!("\n{}", "[>] Rollback requested:".cyan().bold());
        eprintln!(
            "  #{} {} {}",
            migration.id,
            migration.name.bold(),
            status_badge(migration.status)
        );
        eprintln!("  Type: {}", migration.migration_type.label());

        Confirm::new()
            .with_prompt("Revert the schema changes of this migration?")
            .default(false)
            .interact()
            .map_err(|_| MigrationError::UserCancelled)
    }
}
