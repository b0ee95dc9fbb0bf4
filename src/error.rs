use crate::model::{MigrationId, MigrationStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Migration not found: {0}")]
    NotFound(MigrationId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot {action} migration {id} while it is {status}")]
    InvalidTransition {
        id: MigrationId,
        status: MigrationStatus,
        action: &'static str,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("User cancelled")]
    UserCancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl MigrationError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

pub type Result<T> = std::result::Result<T, MigrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MigrationError::NotFound(MigrationId(7));
        assert_eq!(err.to_string(), "Migration not found: 7");
        assert!(err.is_not_found());

        let err = MigrationError::InvalidTransition {
            id: MigrationId(3),
            status: MigrationStatus::Failed,
            action: "roll back",
        };
        assert_eq!(err.to_string(), "Cannot roll back migration 3 while it is failed");
        assert!(err.is_invalid_transition());
        assert!(!err.is_invalid_input());
    }
}
