use crate::error::{MigrationError, Result};
use crate::model::{Migration, MigrationStatus};
use crate::simulation::Draw;

pub const DATA_INTEGRITY_WARNING: &str = "Data corruption detected in 0.01% of records";
pub const PERMISSIONS_WARNING: &str = "File permissions may need adjustment for migration scripts";
pub const FAILURE_WARNINGS: [&str; 2] = ["Post-migration validation failed", "Schema mismatch detected"];

/// Lifecycle operation requested on a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Execute,
    Rollback,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Execute => "execute",
            Action::Rollback => "roll back",
        }
    }

    /// Whether the lifecycle graph allows the action from `status`
    pub fn is_legal_from(&self, status: MigrationStatus) -> bool {
        match self {
            Action::Execute => status.can_transition_to(MigrationStatus::Running),
            Action::Rollback => {
                status == MigrationStatus::Completed
                    && status.can_transition_to(MigrationStatus::Pending)
            }
        }
    }
}

/// Checks an action against the migration's current status.
///
/// Strict mode rejects with `InvalidTransition`. Tolerant mode only reports
/// the mismatch and lets the caller proceed.
pub fn check_transition(migration: &Migration, action: Action, strict: bool) -> Result<()> {
    if action.is_legal_from(migration.status) {
        return Ok(());
    }

    if strict {
        return Err(MigrationError::InvalidTransition {
            id: migration.id,
            status: migration.status,
            action: action.as_str(),
        });
    }

    tracing::warn!(
        migration_id = %migration.id,
        status = %migration.status,
        action = action.as_str(),
        "proceeding with out-of-order lifecycle action"
    );
    Ok(())
}

/// Check outcome to be recorded as a ValidationResult
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDraft {
    pub pre_check: bool,
    pub post_check: bool,
    pub warnings: Vec<String>,
}

impl ValidationDraft {
    pub fn from_draw(draw: &Draw) -> Self {
        if !draw.success {
            return Self {
                pre_check: true,
                post_check: false,
                warnings: FAILURE_WARNINGS.iter().map(|w| w.to_string()).collect(),
            };
        }

        let mut warnings = Vec::new();
        if draw.data_warning {
            warnings.push(DATA_INTEGRITY_WARNING.to_string());
        }
        if draw.permissions_warning {
            warnings.push(PERMISSIONS_WARNING.to_string());
        }

        Self {
            pre_check: true,
            post_check: true,
            warnings,
        }
    }
}
