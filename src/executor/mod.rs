//! Execution orchestrator
//!
//! Drives one migration through the staged run sequence (`runner`) or the
//! rollback sequence (`rollback`). Operations on the same migration id are
//! serialized; different ids progress independently.

pub mod rollback;
pub mod runner;
pub mod validator;

pub use validator::{Action, ValidationDraft};

use crate::config::SimulationConfig;
use crate::model::{Commit, Migration, MigrationId, ValidationResult};
use crate::registry::MigrationRegistry;
use crate::simulation::OutcomeSource;
use crate::store::Store;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OwnedMutexGuard;

/// Terminal result of one execution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Completed,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Migration state after the run
    pub migration: Migration,
    pub outcome: ExecutionOutcome,
    /// Present iff the run completed
    pub commit: Option<Commit>,
    pub validation: ValidationResult,
}

impl ExecutionReport {
    pub fn succeeded(&self) -> bool {
        self.outcome == ExecutionOutcome::Completed
    }
}

#[derive(Debug, Clone)]
pub struct RollbackReport {
    pub migration: Migration,
    pub commit: Commit,
}

pub struct Orchestrator {
    registry: MigrationRegistry,
    outcomes: Arc<dyn OutcomeSource>,
    simulation: SimulationConfig,
    locks: LockMap,
}

impl Orchestrator {
    pub fn new(
        registry: MigrationRegistry,
        outcomes: Arc<dyn OutcomeSource>,
        simulation: SimulationConfig,
    ) -> Self {
        Self {
            registry,
            outcomes,
            simulation,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &MigrationRegistry {
        &self.registry
    }

    fn store(&self) -> &Arc<dyn Store> {
        self.registry.store()
    }

    /// Per-migration mutex, created on first use
    fn lock_for(&self, id: MigrationId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(locks.entry(id).or_default())
    }

    /// Wait for exclusive access to `id`
    async fn acquire(&self, id: MigrationId) -> MigrationGuard<'_> {
        let guard = self.lock_for(id).lock_owned().await;
        MigrationGuard {
            locks: &self.locks,
            id,
            guard: Some(guard),
        }
    }
}

type LockMap = Mutex<HashMap<MigrationId, Arc<tokio::sync::Mutex<()>>>>;

/// Held for the duration of one operation on a migration.
///
/// On drop the id's entry leaves the lock map unless another caller still
/// holds or waits on it.
struct MigrationGuard<'a> {
    locks: &'a LockMap,
    id: MigrationId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for MigrationGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        drop(self.guard.take());
        if locks.get(&self.id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&self.id);
        }
    }
}

/// Suspend between stages
async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::model::MigrationType;
    use crate::simulation::ScriptedOutcome;
    use crate::store::InMemoryStore;

    pub fn orchestrator(outcomes: ScriptedOutcome, strict: bool) -> Orchestrator {
        let registry = MigrationRegistry::new(Arc::new(InMemoryStore::new()));
        Orchestrator::new(
            registry,
            Arc::new(outcomes),
            SimulationConfig::instant().with_strict_transitions(strict),
        )
    }

    pub async fn add_email(orchestrator: &Orchestrator) -> Migration {
        orchestrator
            .registry()
            .create(
                "add_email",
                MigrationType::AddField,
                r#"{"collection": "users", "field": "email", "type": "string"}"#,
            )
            .await
            .unwrap()
    }
}
