//! Rollback of a completed migration
//!
//! ## Sequence
//!
//! ```text
//! "Initiating rollback..."
//!          │  (pause)
//!          ▼
//! "Reverting schema changes..."
//!          │  (pause)
//!          ▼
//! status = pending
//! "Rollback completed successfully"
//!          │
//!          ▼
//! commit "revert: <name>"
//! ```
//!
//! Three log lines, one commit, no validation result. The migration can be
//! executed again afterwards.

use super::validator::{check_transition, Action};
use super::{pause, Orchestrator, RollbackReport};
use crate::error::Result;
use crate::model::{MigrationId, MigrationStatus};

pub const LOG_INITIATED: &str = "Initiating rollback...";
pub const LOG_REVERTING: &str = "Reverting schema changes...";
pub const LOG_ROLLED_BACK: &str = "Rollback completed successfully";

pub const COMMIT_PREFIX: &str = "revert: ";

impl Orchestrator {
    pub async fn rollback(&self, id: MigrationId) -> Result<RollbackReport> {
        let _guard = self.acquire(id).await;

        let migration = self.registry.get(id).await?;
        check_transition(&migration, Action::Rollback, self.simulation.strict_transitions)?;

        tracing::info!(migration_id = %id, name = %migration.name, "rolling back migration");

        let [initiated_delay, reverting_delay] = self.simulation.rollback_delays;

        self.registry.append_log(id, LOG_INITIATED).await?;
        pause(initiated_delay).await;

        self.registry.append_log(id, LOG_REVERTING).await?;
        pause(reverting_delay).await;

        self.registry.update_status(id, MigrationStatus::Pending).await?;
        self.registry.append_log(id, LOG_ROLLED_BACK).await?;

        let commit = self
            .store()
            .insert_commit(id, format!("{}{}", COMMIT_PREFIX, migration.name))
            .await?;

        let migration = self.registry.get(id).await?;
        tracing::info!(migration_id = %id, commit_id = %commit.id, "rollback completed");

        Ok(RollbackReport { migration, commit })
    }
}
