use crate::error::{MigrationError, Result};
use crate::model::{Migration, MigrationId, MigrationStatus, MigrationType, NewMigration};
use crate::store::Store;
use std::sync::Arc;

/// CRUD over migration records
///
/// The registry owns the status field but does not judge transitions; the
/// executor decides which writes are legal.
#[derive(Clone)]
pub struct MigrationRegistry {
    store: Arc<dyn Store>,
}

impl MigrationRegistry {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Create a pending migration
    ///
    /// `name` is trimmed and must not be empty. `config` must be a JSON document.
    pub async fn create(
        &self,
        name: &str,
        migration_type: MigrationType,
        config: &str,
    ) -> Result<Migration> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MigrationError::InvalidInput(
                "migration name must not be empty".to_string(),
            ));
        }

        let config = parse_config(config)?;

        let migration = self
            .store
            .insert_migration(NewMigration {
                name: name.to_string(),
                migration_type,
                config,
            })
            .await?;

        tracing::info!(
            migration_id = %migration.id,
            name = %migration.name,
            migration_type = %migration.migration_type,
            "migration created"
        );

        Ok(migration)
    }

    pub async fn get(&self, id: MigrationId) -> Result<Migration> {
        self.store
            .get_migration(id)
            .await?
            .ok_or(MigrationError::NotFound(id))
    }

    /// All migrations, in no particular order
    pub async fn list(&self) -> Result<Vec<Migration>> {
        self.store.list_migrations().await
    }

    pub async fn update_status(&self, id: MigrationId, status: MigrationStatus) -> Result<()> {
        self.store.set_status(id, status).await?;
        tracing::debug!(migration_id = %id, %status, "status updated");
        Ok(())
    }

    pub async fn append_log(&self, id: MigrationId, line: impl Into<String>) -> Result<()> {
        let line = line.into();
        tracing::debug!(migration_id = %id, line = %line, "log appended");
        self.store.append_log(id, line).await
    }
}

fn parse_config(config: &str) -> Result<serde_json::Value> {
    let config = config.trim();
    if config.is_empty() {
        return Err(MigrationError::InvalidInput(
            "migration config must not be empty".to_string(),
        ));
    }

    serde_json::from_str(config).map_err(|e| {
        MigrationError::InvalidInput(format!("migration config is not valid JSON: {}", e))
    })
}
