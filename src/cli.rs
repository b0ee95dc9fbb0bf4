use clap::{Parser, Subcommand};
use schemashift::{MigrationId, MigrationType};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "schemashift")]
#[command(version)]
#[command(about = "Schema migration lifecycle manager for document databases", long_about = None)]
pub struct Cli {
    /// Debug logging
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Store file (defaults to store_path from the config file)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Allow execute/rollback regardless of the current status
    #[arg(long, global = true)]
    pub force: bool,

    /// Skip the pauses between execution stages
    #[arg(long, global = true)]
    pub fast: bool,

    /// Seed for the simulated outcome (reproducible runs)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a pending migration
    Create {
        /// Migration name
        name: String,

        /// create_collection, add_field, remove_field, rename_field, create_index
        #[arg(short = 't', long = "type")]
        migration_type: Option<MigrationType>,

        /// Inline JSON configuration
        #[arg(short = 'c', long, conflicts_with_all = ["config_file", "template"])]
        config: Option<String>,

        /// Read the JSON configuration from a file
        #[arg(long, conflicts_with = "template")]
        config_file: Option<PathBuf>,

        /// Use a built-in template (name or migration type) for type and config
        #[arg(long)]
        template: Option<String>,
    },

    /// List migrations
    List,

    /// Show one migration with its logs and history
    Show { id: MigrationId },

    /// Execute one or more pending migrations
    Execute {
        #[arg(required = true)]
        ids: Vec<MigrationId>,
    },

    /// Roll back a completed migration
    Rollback {
        id: MigrationId,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Commit history, most recent first
    Commits {
        /// Only commits of this migration
        #[arg(short = 'm', long)]
        migration: Option<MigrationId>,
    },

    /// Validation results, most recent first
    Validations {
        /// Only results of this migration
        #[arg(short = 'm', long)]
        migration: Option<MigrationId>,
    },

    /// List built-in migration templates
    Templates,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write the default configuration file
    Init,
    /// Print the effective configuration
    Show,
}
