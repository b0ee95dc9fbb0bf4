use crate::error::Result;
use crate::model::{Commit, MigrationId, MigrationStatus, ValidationResult};
use crate::store::Store;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::sync::Arc;

/// Read-side projections over the store
///
/// Nothing is cached; every call re-reads the store.
pub struct HistoryAggregator {
    store: Arc<dyn Store>,
}

/// Migration counts per status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueSummary {
    pub pending: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
}

impl QueueSummary {
    pub fn total(&self) -> usize {
        self.pending + self.running + self.completed + self.failed
    }
}

/// Records with a write time and an allocation order
trait Timeline {
    fn timestamp(&self) -> DateTime<Utc>;
    fn sequence(&self) -> u64;
}

impl Timeline for Commit {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn sequence(&self) -> u64 {
        self.id.0
    }
}

impl Timeline for ValidationResult {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn sequence(&self) -> u64 {
        self.id.0
    }
}

/// Most recent first; equal timestamps put the later-allocated id first
fn newest_first<T: Timeline>(records: &mut [T]) {
    records.sort_by_key(|r| Reverse((r.timestamp(), r.sequence())));
}

impl HistoryAggregator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list_commits(&self) -> Result<Vec<Commit>> {
        let mut commits = self.store.list_commits().await?;
        newest_first(&mut commits);
        Ok(commits)
    }

    pub async fn list_validation_results(&self) -> Result<Vec<ValidationResult>> {
        let mut results = self.store.list_validation_results().await?;
        newest_first(&mut results);
        Ok(results)
    }

    pub async fn commits_for(&self, migration_id: MigrationId) -> Result<Vec<Commit>> {
        let mut commits = self.list_commits().await?;
        commits.retain(|c| c.migration_id == migration_id);
        Ok(commits)
    }

    pub async fn validation_results_for(
        &self,
        migration_id: MigrationId,
    ) -> Result<Vec<ValidationResult>> {
        let mut results = self.list_validation_results().await?;
        results.retain(|r| r.migration_id == migration_id);
        Ok(results)
    }

    pub async fn summary(&self) -> Result<QueueSummary> {
        let migrations = self.store.list_migrations().await?;

        let mut summary = QueueSummary::default();
        for migration in &migrations {
            match migration.status {
                MigrationStatus::Pending => summary.pending += 1,
                MigrationStatus::Running => summary.running += 1,
                MigrationStatus::Completed => summary.completed += 1,
                MigrationStatus::Failed => summary.failed += 1,
            }
        }

        Ok(summary)
    }
}
