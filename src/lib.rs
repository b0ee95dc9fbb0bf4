//! Lifecycle orchestration for document-database schema migrations.
//!
//! A migration is created `pending` by the [`registry::MigrationRegistry`],
//! run or rolled back by the [`executor::Orchestrator`] (which appends staged
//! log lines and writes commits and validation results), and read back in
//! recency order through the [`history::HistoryAggregator`]. Execution is
//! simulated; outcomes come from an injectable [`simulation::OutcomeSource`].

pub mod config;
pub mod error;
pub mod executor;
pub mod history;
pub mod model;
pub mod registry;
pub mod simulation;
pub mod store;
pub mod templates;

pub use config::{Config, SimulationConfig};
pub use error::{MigrationError, Result};
pub use executor::{ExecutionOutcome, ExecutionReport, Orchestrator, RollbackReport};
pub use history::{HistoryAggregator, QueueSummary};
pub use model::{
    Commit, CommitId, Migration, MigrationId, MigrationStatus, MigrationType, ValidationId,
    ValidationResult,
};
pub use registry::MigrationRegistry;
pub use store::{InMemoryStore, JsonFileStore, Store};
