//! Durable keyed storage for migrations, commits and validation results.
//!
//! Every backend allocates ids under the same lock as the insertion, so two
//! records of the same kind never share an id.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;

use crate::error::{MigrationError, Result};
use crate::model::{
    Commit, CommitId, Migration, MigrationId, MigrationStatus, NewMigration, ValidationId,
    ValidationResult,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait Store: Send + Sync {
    /// Persist a new migration, assigning its id and version
    async fn insert_migration(&self, new: NewMigration) -> Result<Migration>;

    async fn get_migration(&self, id: MigrationId) -> Result<Option<Migration>>;

    async fn list_migrations(&self) -> Result<Vec<Migration>>;

    /// Overwrite the status. `NotFound` if the migration is missing.
    async fn set_status(&self, id: MigrationId, status: MigrationStatus) -> Result<()>;

    /// Append one log line. `NotFound` if the migration is missing.
    async fn append_log(&self, id: MigrationId, line: String) -> Result<()>;

    async fn insert_commit(&self, migration_id: MigrationId, message: String) -> Result<Commit>;

    async fn list_commits(&self) -> Result<Vec<Commit>>;

    async fn insert_validation_result(
        &self,
        migration_id: MigrationId,
        pre_check: bool,
        post_check: bool,
        warnings: Vec<String>,
    ) -> Result<ValidationResult>;

    async fn list_validation_results(&self) -> Result<Vec<ValidationResult>>;
}

/// Monotonic id counters, one per record kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdAllocator {
    last_migration: u64,
    last_commit: u64,
    last_validation: u64,
}

impl IdAllocator {
    pub fn next_migration(&mut self) -> MigrationId {
        self.last_migration += 1;
        MigrationId(self.last_migration)
    }

    pub fn next_commit(&mut self) -> CommitId {
        self.last_commit += 1;
        CommitId(self.last_commit)
    }

    pub fn next_validation(&mut self) -> ValidationId {
        self.last_validation += 1;
        ValidationId(self.last_validation)
    }
}

/// Record tables plus their id allocator.
///
/// Backends wrap this in a lock; it is also the on-disk snapshot format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    #[serde(default)]
    ids: IdAllocator,
    #[serde(default)]
    migrations: Vec<Migration>,
    #[serde(default)]
    commits: Vec<Commit>,
    #[serde(default)]
    validation_results: Vec<ValidationResult>,
}

impl StoreState {
    pub fn insert_migration(&mut self, new: NewMigration) -> Migration {
        let id = self.ids.next_migration();
        let migration = Migration {
            id,
            name: new.name,
            migration_type: new.migration_type,
            config: new.config,
            version: id.0,
            status: MigrationStatus::Pending,
            logs: Vec::new(),
            created_at: Utc::now(),
        };
        self.migrations.push(migration.clone());
        migration
    }

    pub fn migration(&self, id: MigrationId) -> Option<&Migration> {
        self.migrations.iter().find(|m| m.id == id)
    }

    fn migration_mut(&mut self, id: MigrationId) -> Result<&mut Migration> {
        self.migrations
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(MigrationError::NotFound(id))
    }

    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    pub fn set_status(&mut self, id: MigrationId, status: MigrationStatus) -> Result<()> {
        self.migration_mut(id)?.status = status;
        Ok(())
    }

    pub fn append_log(&mut self, id: MigrationId, line: String) -> Result<()> {
        self.migration_mut(id)?.logs.push(line);
        Ok(())
    }

    pub fn insert_commit(&mut self, migration_id: MigrationId, message: String) -> Result<Commit> {
        if self.migration(migration_id).is_none() {
            return Err(MigrationError::NotFound(migration_id));
        }

        let commit = Commit {
            id: self.ids.next_commit(),
            migration_id,
            message,
            timestamp: Utc::now(),
        };
        self.commits.push(commit.clone());
        Ok(commit)
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn insert_validation_result(
        &mut self,
        migration_id: MigrationId,
        pre_check: bool,
        post_check: bool,
        warnings: Vec<String>,
    ) -> Result<ValidationResult> {
        if self.migration(migration_id).is_none() {
            return Err(MigrationError::NotFound(migration_id));
        }

        let result = ValidationResult {
            id: self.ids.next_validation(),
            migration_id,
            pre_check,
            post_check,
            warnings,
            timestamp: Utc::now(),
        };
        self.validation_results.push(result.clone());
        Ok(result)
    }

    pub fn validation_results(&self) -> &[ValidationResult] {
        &self.validation_results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MigrationType;

    fn new_migration(name: &str) -> NewMigration {
        NewMigration {
            name: name.to_string(),
            migration_type: MigrationType::AddField,
            config: serde_json::json!({ "collection": "users" }),
        }
    }

    #[test]
    fn test_ids_are_monotonic_per_kind() {
        let mut state = StoreState::default();

        let first = state.insert_migration(new_migration("a"));
        let second = state.insert_migration(new_migration("b"));
        assert_eq!(first.id, MigrationId(1));
        assert_eq!(second.id, MigrationId(2));
        assert_eq!(second.version, 2);

        let commit = state.insert_commit(first.id, "feat: a".to_string()).unwrap();
        let result = state
            .insert_validation_result(first.id, true, true, Vec::new())
            .unwrap();
        assert_eq!(commit.id, CommitId(1));
        assert_eq!(result.id, ValidationId(1));

        let commit = state.insert_commit(second.id, "feat: b".to_string()).unwrap();
        assert_eq!(commit.id, CommitId(2));
    }

    #[test]
    fn test_references_must_exist() {
        let mut state = StoreState::default();

        let err = state
            .insert_commit(MigrationId(9), "feat: ghost".to_string())
            .unwrap_err();
        assert!(err.is_not_found());

        let err = state
            .insert_validation_result(MigrationId(9), true, false, Vec::new())
            .unwrap_err();
        assert!(err.is_not_found());

        assert!(state.commits().is_empty());
        assert!(state.validation_results().is_empty());
    }

    #[test]
    fn test_status_and_logs_require_existing_migration() {
        let mut state = StoreState::default();
        let migration = state.insert_migration(new_migration("a"));

        state.append_log(migration.id, "hello".to_string()).unwrap();
        state
            .set_status(migration.id, MigrationStatus::Running)
            .unwrap();

        let stored = state.migration(migration.id).unwrap();
        assert_eq!(stored.logs, vec!["hello".to_string()]);
        assert_eq!(stored.status, MigrationStatus::Running);

        assert!(state
            .append_log(MigrationId(42), "x".to_string())
            .unwrap_err()
            .is_not_found());
        assert!(state
            .set_status(MigrationId(42), MigrationStatus::Failed)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_snapshot_roundtrip_keeps_allocator() {
        let mut state = StoreState::default();
        let migration = state.insert_migration(new_migration("a"));
        state.insert_commit(migration.id, "feat: a".to_string()).unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let mut restored: StoreState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);

        let next = restored.insert_migration(new_migration("b"));
        assert_eq!(next.id, MigrationId(2));
    }
}
