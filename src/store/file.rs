//! JSON snapshot store used by the CLI
//!
//! The whole state is rewritten after every mutation. A mutation only becomes
//! visible once its snapshot has been written.
//!
//! Meant for single-process CLI use: writes are blocking and happen under the
//! state lock, and nothing guards the file against other processes.

use super::{Store, StoreState};
use crate::error::{MigrationError, Result};
use crate::model::{
    Commit, Migration, MigrationId, MigrationStatus, NewMigration, ValidationResult,
};
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use tokio::sync::RwLock;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl JsonFileStore {
    /// Open the snapshot at `path`; a missing file starts an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let state = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                StoreState::default()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    MigrationError::Storage(format!(
                        "corrupt store snapshot {}: {}",
                        path.display(),
                        e
                    ))
                })?
            }
        } else {
            StoreState::default()
        };

        tracing::debug!(
            path = %path.display(),
            migrations = state.migrations().len(),
            "opened store snapshot"
        );

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }

    /// Apply `f` to a copy of the state, persist it, then publish it
    async fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut guard = self.state.write().await;
        let mut next = guard.clone();
        let value = f(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(value)
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn insert_migration(&self, new: NewMigration) -> Result<Migration> {
        self.mutate(|state| Ok(state.insert_migration(new))).await
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
        self.mutate(|state| state.set_status(id, status)).await
    }

    async fn append_log(&self, id: MigrationId, line: String) -> Result<()> {
        self.mutate(|state| state.append_log(id, line)).await
    }

    async fn insert_commit(&self, migration_id: MigrationId, message: String) -> Result<Commit> {
        self.mutate(|state| state.insert_commit(migration_id, message))
            .await
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
        self.mutate(|state| {
            state.insert_validation_result(migration_id, pre_check, post_check, warnings)
        })
        .await
    }

    async fn list_validation_results(&self) -> Result<Vec<ValidationResult>> {
        let state = self.state.read().await;
        Ok(state.validation_results().to_vec())
    }
}
