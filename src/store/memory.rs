//! In-memory store for tests and embedding

use super::{Store, StoreState};
use crate::error::Result;
use crate::model::{
    Commit, Migration, MigrationId, MigrationStatus, NewMigration, ValidationResult,
};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot
    pub fn from_state(state: StoreState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn insert_migration(&self, new: NewMigration) -> Result<Migration> {
        let mut state = self.state.write().await;
        Ok(state.insert_migration(new))
    }

    async fn get_migration(&self, id: MigrationId) -> Result<Option<Migration>> {
        let state = self.state.read().await;
        Ok(state.migration(id).cloned())
    }

    async fn list_migrations(&self) -> Result<Vec<Migration>> {
        let state = self.state.read().await;
        Ok(state.migrations().to_vec())
    }

    async fn set_status(&self, id: MigrationId, status: MigrationStatus) -> Result<()> {
        let mut state = self.state.write().await;
        state.set_status(id, status)
    }

    async fn append_log(&self, id: MigrationId, line: String) -> Result<()> {
        let mut state = self.state.write().await;
        state.append_log(id, line)
    }

    async fn insert_commit(&self, migration_id: MigrationId, message: String) -> Result<Commit> {
        let mut state = self.state.write().await;
        state.insert_commit(migration_id, message)
    }

    async fn list_commits(&self) -> Result<Vec<Commit>> {
        let state = self.state.read().await;
        Ok(state.commits().to_vec())
    }

    async fn insert_validation_result(
        &self,
        migration_id: MigrationId,
        pre_check: bool,
        post_check: bool,
        warnings: Vec<String>,
    ) -> Result<ValidationResult> {
        let mut state = self.state.write().await;
        state.insert_validation_result(migration_id, pre_check, post_check, warnings)
    }

    async fn list_validation_results(&self) -> Result<Vec<ValidationResult>> {
        let state = self.state.read().await;
        Ok(state.validation_results().to_vec())
    }
}
