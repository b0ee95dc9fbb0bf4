use super::validator::{check_transition, Action, ValidationDraft};
use super::{pause, ExecutionOutcome, ExecutionReport, Orchestrator};
use crate::error::Result;
use crate::model::{MigrationId, MigrationStatus};

pub const LOG_STARTED: &str = "Migration execution started";
pub const LOG_COMPLETED: &str = "Migration completed successfully";
pub const LOG_FAILED: &str = "Migration failed: Simulated error for demonstration";

/// Progress lines, in order: config validation, connection, schema change, post checks
pub const STAGES: [&str; 4] = [
    "Validating migration configuration...",
    "Connecting to database...",
    "Executing schema changes...",
    "Running post-migration checks...",
];

pub const COMMIT_PREFIX: &str = "feat: ";

impl Orchestrator {
    /// Run a migration through the staged execution sequence
    ///
    /// Appends exactly six log lines and writes exactly one validation result.
    /// A commit is written only when the run completes. A simulated failure is
    /// still `Ok`, with `ExecutionOutcome::Failed`.
    ///
    /// Store errors abort the sequence; lines already appended stay.
    pub async fn execute(&self, id: MigrationId) -> Result<ExecutionReport> {
        let _guard = self.acquire(id).await;

        let migration = self.registry.get(id).await?;
        check_transition(&migration, Action::Execute, self.simulation.strict_transitions)?;

        tracing::info!(migration_id = %id, name = %migration.name, "executing migration");

        self.registry.update_status(id, MigrationStatus::Running).await?;
        self.registry.append_log(id, LOG_STARTED).await?;

        for (stage, delay) in STAGES.iter().zip(self.simulation.execute_delays) {
            pause(delay).await;
            self.registry.append_log(id, *stage).await?;
        }

        let draw = self.outcomes.draw();
        let draft = ValidationDraft::from_draw(&draw);

        let (outcome, commit) = if draw.success {
            self.registry.update_status(id, MigrationStatus::Completed).await?;
            self.registry.append_log(id, LOG_COMPLETED).await?;

            let commit = self
                .store()
                .insert_commit(id, format!("{}{}", COMMIT_PREFIX, migration.name))
                .await?;
            (ExecutionOutcome::Completed, Some(commit))
        } else {
            self.registry.update_status(id, MigrationStatus::Failed).await?;
            self.registry.append_log(id, LOG_FAILED).await?;
            (ExecutionOutcome::Failed, None)
        };

        let validation = self
            .store()
            .insert_validation_result(id, draft.pre_check, draft.post_check, draft.warnings)
            .await?;

        let migration = self.registry.get(id).await?;

        match outcome {
            ExecutionOutcome::Completed => tracing::info!(
                migration_id = %id,
                warnings = validation.warnings.len(),
                "migration completed"
            ),
            ExecutionOutcome::Failed => {
                tracing::warn!(migration_id = %id, "migration failed (simulated)")
            }
        }

        Ok(ExecutionReport {
            migration,
            outcome,
            commit,
            validation,
        })
    }
}
