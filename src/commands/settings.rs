use crate::cli::ConfigAction;
use colored::*;
use schemashift::{Config, MigrationError, Result};

pub fn run(action: &ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = Config::config_path();
            if path.exists() {
                println!("{} Config already exists: {}", "[i]".cyan(), path.display());
                return Ok(());
            }
            Config::init()?;
            println!("{} Wrote {}", "[OK]".green().bold(), path.display());
        }
        ConfigAction::Show => {
            let toml_string = toml::to_string_pretty(config)
                .map_err(|e| MigrationError::ConfigError(e.to_string()))?;
            println!("{}", format!("# {}", Config::config_path().display()).dimmed());
            print!("{}", toml_string);
        }
    }

    Ok(())
}
