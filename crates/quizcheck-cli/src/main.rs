use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "quizcheck", version, about = "Personality quiz validator")]
struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ~/.config/quizcheck/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every analysis and write the validation report
    Analyze(commands::analyze::AnalyzeArgs),
    /// Print the parsed questions as JSON
    Questions {
        /// Quiz source (default: configured input)
        input: Option<PathBuf>,
    },
    /// Run the reachability simulation only
    Simulate(commands::simulate::SimulateArgs),
    /// Run the targeted best-case probes only
    Probe {
        /// Quiz source (default: configured input)
        input: Option<PathBuf>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::run(config, args),
        Commands::Questions { input } => commands::questions::run(config, input),
        Commands::Simulate(args) => commands::simulate::run(config, args),
        Commands::Probe { input } => commands::probe::run(config, input),
        Commands::Config { action } => commands::config::run(config, action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "quizcheck", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
