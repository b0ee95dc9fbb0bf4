pub mod history;
pub mod lifecycle;
pub mod migrations;
pub mod settings;

use crate::cli::{Cli, Command};
use schemashift::simulation::RandomOutcome;
use schemashift::{
    Config, HistoryAggregator, JsonFileStore, MigrationRegistry, Orchestrator, Result,
    SimulationConfig, Store,
};
use std::sync::Arc;

/// Everything a store-backed command needs
pub struct App {
    pub orchestrator: Orchestrator,
    pub history: HistoryAggregator,
}

impl App {
    pub fn open(cli: &Cli, config: &Config) -> Result<Self> {
        let store_path = cli.store.clone().unwrap_or_else(|| config.store_path.clone());
        let store: Arc<dyn Store> = Arc::new(JsonFileStore::open(store_path)?);

        let mut simulation: SimulationConfig = config.simulation();
        if cli.fast {
            simulation = simulation.without_delays();
        }
        if cli.force {
            simulation.strict_transitions = false;
        }

        let outcomes = match cli.seed {
            Some(seed) => RandomOutcome::seeded(seed, &simulation),
            None => RandomOutcome::new(&simulation),
        };

        let registry = MigrationRegistry::new(Arc::clone(&store));
        Ok(Self {
            orchestrator: Orchestrator::new(registry, Arc::new(outcomes), simulation),
            history: HistoryAggregator::new(store),
        })
    }

    pub fn registry(&self) -> &MigrationRegistry {
        self.orchestrator.registry()
    }
}

pub async fn dispatch(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Command::Templates => {
            migrations::print_templates();
            return Ok(());
        }
        Command::Config { action } => return settings::run(action, config),
        _ => {}
    }

    let app = App::open(cli, config)?;

    match &cli.command {
        Command::Create {
            name,
            migration_type,
            config,
            config_file,
            template,
        } => {
            let request = migrations::CreateRequest {
                name,
                migration_type: *migration_type,
                config: config.as_deref(),
                config_file: config_file.as_deref(),
                template: template.as_deref(),
            };
            migrations::create(&app, request).await
        }
        Command::List => migrations::list(&app).await,
        Command::Show { id } => migrations::show(&app, *id).await,
        Command::Execute { ids } => lifecycle::execute(&app, ids).await,
        Command::Rollback { id, yes } => lifecycle::rollback(&app, *id, *yes).await,
        Command::Commits { migration } => history::commits(&app, *migration).await,
        Command::Validations { migration } => history::validations(&app, *migration).await,
        Command::Templates | Command::Config { .. } => Ok(()),
    }
}
