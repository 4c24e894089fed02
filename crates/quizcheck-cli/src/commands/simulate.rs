use std::path::{Path, PathBuf};

use clap::Args;
use quizcheck_core::QuizValidator;

use super::{load_config, load_questions, CommandResult};

#[derive(Args)]
pub struct SimulateArgs {
    /// Quiz source (default: configured input)
    pub input: Option<PathBuf>,
    /// Number of simulated quiz runs
    #[arg(long)]
    pub trials: Option<usize>,
    /// Seed for a reproducible simulation
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(config_path: Option<&Path>, args: SimulateArgs) -> CommandResult {
    let mut config = load_config(config_path)?;
    if let Some(trials) = args.trials {
        config.simulation.trials = trials;
    }
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }
    config.validate()?;

    let (_, questions) = load_questions(&config, args.input)?;
    let report = QuizValidator::new(config).simulate(&questions);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
