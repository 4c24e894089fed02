//! Full validation run with a human-readable summary.

use std::path::{Path, PathBuf};

use clap::Args;
use quizcheck_core::{QuizValidator, ValidationReport};
use tracing::debug;

use super::{load_config, load_questions, CommandResult};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Quiz source (default: configured input)
    pub input: Option<PathBuf>,
    /// Report file (default: configured output)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Number of simulated quiz runs
    #[arg(long)]
    pub trials: Option<usize>,
    /// Seed for a reproducible simulation
    #[arg(long)]
    pub seed: Option<u64>,
    /// Print the report as JSON instead of the summary
    #[arg(long)]
    pub json: bool,
}

pub fn run(config_path: Option<&Path>, args: AnalyzeArgs) -> CommandResult {
    let mut config = load_config(config_path)?;
    if let Some(trials) = args.trials {
        config.simulation.trials = trials;
    }
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }
    config.validate()?;
    debug!(
        trials = config.simulation.trials,
        seed = ?config.simulation.seed,
        "effective simulation settings"
    );

    let (source, questions) = load_questions(&config, args.input)?;
    let output = args.output.unwrap_or_else(|| config.output.clone());

    let report = QuizValidator::new(config).validate(&source, &questions);

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&source, questions.len(), &report);
    }

    report.save(&output)?;
    if !args.json {
        println!();
        println!("Report saved to: {}", output.display());
    }
    Ok(())
}

fn rule() {
    println!("{}", "=".repeat(60));
}

fn print_summary(source: &Path, question_count: usize, report: &ValidationReport) {
    println!("QUIZ VALIDATION: {}", source.display());
    rule();
    println!("Questions: {question_count}");
    println!("Labels observed: {}", report.distribution.distribution.len());

    let dist = &report.distribution;
    println!();
    println!("LABEL DISTRIBUTION");
    rule();
    if !dist.missing.is_empty() {
        println!("Missing labels: {}", dist.missing.join(", "));
    }
    if !dist.extra.is_empty() {
        println!("Extra labels: {}", dist.extra.join(", "));
    }
    if dist.is_complete() {
        println!("All reference labels are present");
    }
    for share in &dist.labels {
        let mark = if share.balanced { "ok" } else { "!!" };
        println!(
            "  {mark} {:<15}: {:>2} options ({:>5.1}%)",
            share.label, share.count, share.percentage
        );
    }
    println!("Total options: {}", dist.total_options);
    println!("Ideal per label: {:.1}", dist.ideal_per_personality);

    let balance = &report.balance;
    println!();
    println!("QUESTION BALANCE");
    rule();
    if balance.problems.is_empty() {
        println!("All questions are balanced");
    } else {
        println!("Problems:");
        for problem in &balance.problems {
            println!("  - {problem}");
        }
    }
    println!("Average options per question: {:.1}", balance.avg_options);
    println!(
        "Average distinct labels per question: {:.1}",
        balance.avg_unique_personalities
    );

    let sim = &report.simulation;
    println!();
    println!("REACHABILITY SIMULATION");
    rule();
    println!("Runs: {}", sim.trials);
    println!("Reachable labels: {}", sim.reachable_count);
    if !sim.missing_personalities.is_empty() {
        println!("Never reached: {}", sim.missing_personalities.join(", "));
    }
    for (label, wins) in &sim.results_distribution {
        println!("  {label:<15}: {wins:>4} ({:>5.1}%)", sim.frequency(label));
    }

    let targeted = &report.targeted;
    println!();
    println!("TARGETED PROBES");
    rule();
    for probe in &targeted.probes {
        if probe.success {
            println!("  ok {:<15}: reachable (score: {})", probe.target, probe.target_score);
        } else {
            println!(
                "  !! {:<15}: lost to {} (score: {})",
                probe.target,
                probe.winner.as_deref().unwrap_or("nobody"),
                probe.target_score
            );
        }
    }
    println!(
        "Successful: {}  Failed: {}",
        targeted.successful.len(),
        targeted.failed.len()
    );

    println!();
    println!("SCORE: {}/{}", report.score, report.max_score);
    println!("{}", report.rating.summary());
    if !report.recommendations.is_empty() {
        println!();
        println!("RECOMMENDATIONS");
        for rec in &report.recommendations {
            println!("  - {rec}");
        }
    }
}
