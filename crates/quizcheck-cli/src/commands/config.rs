use std::path::{Path, PathBuf};

use clap::Subcommand;
use quizcheck_core::QuizCheckConfig;

use super::{load_config, CommandResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Get a config value
    Get {
        /// Dotted key (e.g. "simulation.trials", "balance.expected_options")
        key: String,
    },
    /// Write the default configuration to a file
    Init {
        /// Destination (default: ~/.config/quizcheck/config.toml)
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(config_path: Option<&Path>, action: ConfigAction) -> CommandResult {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key } => {
            let config = load_config(config_path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Init { path, force } => {
            let path = match path.or_else(QuizCheckConfig::default_path) {
                Some(path) => path,
                None => return Err("no configuration directory available".into()),
            };
            if path.exists() && !force {
                return Err(format!("{} already exists (use --force)", path.display()).into());
            }
            QuizCheckConfig::default().save(&path)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
