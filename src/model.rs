//! Record types shared by the registry, the executor and the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map($name)
            }
        }
    };
}

record_id!(
    /// Migration identifier, allocated by the store starting at 1
    MigrationId
);
record_id!(CommitId);
record_id!(ValidationId);

/// Kind of schema change a migration performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationType {
    CreateCollection,
    AddField,
    RemoveField,
    RenameField,
    CreateIndex,
}

impl MigrationType {
    pub const ALL: [MigrationType; 5] = [
        MigrationType::CreateCollection,
        MigrationType::AddField,
        MigrationType::RemoveField,
        MigrationType::RenameField,
        MigrationType::CreateIndex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationType::CreateCollection => "create_collection",
            MigrationType::AddField => "add_field",
            MigrationType::RemoveField => "remove_field",
            MigrationType::RenameField => "rename_field",
            MigrationType::CreateIndex => "create_index",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            MigrationType::CreateCollection => "Create Collection",
            MigrationType::AddField => "Add Field",
            MigrationType::RemoveField => "Remove Field",
            MigrationType::RenameField => "Rename Field",
            MigrationType::CreateIndex => "Create Index",
        }
    }
}

impl fmt::Display for MigrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MigrationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown migration type: {} (expected one of: create_collection, add_field, remove_field, rename_field, create_index)",
                    s
                )
            })
    }
}

/// Lifecycle status of a migration
///
/// ```text
/// pending ──▶ running ──▶ completed ──(rollback)──▶ pending
///                    └──▶ failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MigrationStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl MigrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationStatus::Pending => "pending",
            MigrationStatus::Running => "running",
            MigrationStatus::Completed => "completed",
            MigrationStatus::Failed => "failed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MigrationStatus::Pending => "Pending",
            MigrationStatus::Running => "Running",
            MigrationStatus::Completed => "Completed",
            MigrationStatus::Failed => "Failed",
        }
    }

    /// `completed` and `failed` end an execution attempt
    pub fn is_terminal(&self) -> bool {
        matches!(self, MigrationStatus::Completed | MigrationStatus::Failed)
    }

    /// Whether `self -> next` is an edge of the lifecycle graph
    pub fn can_transition_to(&self, next: MigrationStatus) -> bool {
        use MigrationStatus::*;
        matches!(
            (self, next),
            (Pending, Running) | (Running, Completed) | (Running, Failed) | (Completed, Pending)
        )
    }
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema migration job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Migration {
    pub id: MigrationId,
    pub name: String,
    pub migration_type: MigrationType,
    /// Opaque configuration document
    pub config: serde_json::Value,
    pub version: u64,
    pub status: MigrationStatus,
    /// Append-only progress log
    pub logs: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Migration {
    pub fn latest_log(&self) -> Option<&str> {
        self.logs.last().map(String::as_str)
    }
}

/// Validated creation request, handed to the store for id allocation
#[derive(Debug, Clone)]
pub struct NewMigration {
    pub name: String,
    pub migration_type: MigrationType,
    pub config: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: CommitId,
    pub migration_id: MigrationId,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Pre/post check outcome of one execution attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub id: ValidationId,
    pub migration_id: MigrationId,
    pub pre_check: bool,
    pub post_check: bool,
    pub warnings: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl ValidationResult {
    pub fn passed(&self) -> bool {
        self.pre_check && self.post_check
    }
}
