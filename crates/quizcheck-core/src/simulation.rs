//! Monte Carlo reachability simulation.
//!
//! Answers the quiz at random many times over and records which labels ever
//! come out on top. This is a coverage check: a label that never wins in a
//! large number of uniform random runs is very likely unreachable in
//! practice.

use std::collections::{BTreeMap, BTreeSet};

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::quiz::{Label, Question, QuizStats};
use crate::scoring::{AnswerSet, ScoringEngine, TieBreak};

/// Configuration for reachability simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of random quiz runs
    pub trials: usize,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Tie-break used when scoring each run
    pub tie_break: TieBreak,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            seed: None,
            tie_break: TieBreak::AnswerOrder,
        }
    }
}

/// Result of a reachability simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub trials: usize,
    /// Seed actually used, when one was supplied
    pub seed: Option<u64>,
    /// Number of distinct labels that won at least once
    pub reachable_count: usize,
    pub reachable_personalities: Vec<Label>,
    /// Reference labels among the reachable ones
    pub reference_reachable_count: usize,
    /// Reference and observed labels that never won
    pub missing_personalities: Vec<Label>,
    /// Winning label -> number of runs it won
    pub results_distribution: BTreeMap<Label, usize>,
}

impl SimulationReport {
    /// Share of runs won by `label`, as a percentage.
    pub fn frequency(&self, label: &str) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        let wins = self.results_distribution.get(label).copied().unwrap_or(0);
        wins as f64 / self.trials as f64 * 100.0
    }
}

/// Monte Carlo simulator for label reachability.
pub struct ReachabilitySimulator {
    config: SimulationConfig,
    reference: Vec<Label>,
}

impl ReachabilitySimulator {
    /// Create a simulator with default config.
    pub fn new(reference: Vec<Label>) -> Self {
        Self::with_config(SimulationConfig::default(), reference)
    }

    /// Create a simulator with custom config.
    pub fn with_config(config: SimulationConfig, reference: Vec<Label>) -> Self {
        Self { config, reference }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the simulation over `questions`.
    pub fn simulate(&self, questions: &[Question]) -> SimulationReport {
        let mut rng = match self.config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        let engine = ScoringEngine::with_tie_break(self.config.tie_break, self.reference.clone());

        let mut results_distribution: BTreeMap<Label, usize> = BTreeMap::new();
        for trial in 0..self.config.trials {
            let answers = random_answers(questions, &mut rng);
            match engine.winner(&answers) {
                Some(winner) => *results_distribution.entry(winner).or_insert(0) += 1,
                None => debug!(trial, "no answers to score"),
            }
        }

        let reachable: BTreeSet<&str> = results_distribution.keys().map(String::as_str).collect();
        let stats = QuizStats::from_questions(questions);
        let candidates: BTreeSet<&str> = self
            .reference
            .iter()
            .map(String::as_str)
            .chain(stats.labels())
            .collect();

        let missing_personalities: Vec<Label> = candidates
            .difference(&reachable)
            .map(|l| l.to_string())
            .collect();
        let reference_reachable_count = self
            .reference
            .iter()
            .filter(|l| reachable.contains(l.as_str()))
            .count();

        info!(
            trials = self.config.trials,
            reachable = reachable.len(),
            reference_reachable = reference_reachable_count,
            "simulation finished"
        );
        if !missing_personalities.is_empty() {
            warn!(unreached = ?missing_personalities, "labels never won a simulated run");
        }

        SimulationReport {
            trials: self.config.trials,
            seed: self.config.seed,
            reachable_count: reachable.len(),
            reachable_personalities: reachable.iter().map(|l| l.to_string()).collect(),
            reference_reachable_count,
            missing_personalities,
            results_distribution,
        }
    }
}

/// One uniformly random answer per question that has options.
fn random_answers<R: Rng>(questions: &[Question], rng: &mut R) -> AnswerSet {
    let mut answers = AnswerSet::new();
    for question in questions {
        if let Some(option) = question.options.choose(rng) {
            answers.answer(question.id, option.personality.clone());
        }
    }
    answers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{reference_labels, QuizOption};

    fn question(id: u32, labels: &[&str]) -> Question {
        let options = labels.iter().map(|l| QuizOption::new("o", *l)).collect();
        Question::new(id, "Q", options)
    }

    fn seeded(trials: usize, seed: u64) -> SimulationConfig {
        SimulationConfig {
            trials,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let questions = vec![
            question(1, &["A", "B", "C", "D"]),
            question(2, &["B", "C", "D", "A"]),
            question(3, &["C", "D", "A", "B"]),
        ];
        let labels = vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()];

        let first = ReachabilitySimulator::with_config(seeded(500, 7), labels.clone()).simulate(&questions);
        let second = ReachabilitySimulator::with_config(seeded(500, 7), labels).simulate(&questions);

        assert_eq!(first.reachable_personalities, second.reachable_personalities);
        assert_eq!(first.results_distribution, second.results_distribution);
        assert_eq!(first, second);
    }

    #[test]
    fn test_distribution_sums_to_trials() {
        let questions = vec![question(1, &["A", "B"]), question(2, &["A", "B"])];

        let report = ReachabilitySimulator::with_config(seeded(200, 1), Vec::new()).simulate(&questions);

        assert_eq!(report.results_distribution.values().sum::<usize>(), 200);
        assert_eq!(report.trials, 200);
        assert_eq!(report.seed, Some(1));
    }

    #[test]
    fn test_single_label_quiz() {
        let questions = vec![question(1, &["Mentor"]), question(2, &["Mentor"])];

        let report = ReachabilitySimulator::with_config(seeded(50, 3), reference_labels())
            .simulate(&questions);

        assert_eq!(report.reachable_personalities, vec!["Mentor".to_string()]);
        assert_eq!(report.reference_reachable_count, 1);
        assert_eq!(report.missing_personalities.len(), 14);
        assert_eq!(report.frequency("Mentor"), 100.0);
        assert_eq!(report.frequency("Leader"), 0.0);
    }

    #[test]
    fn test_label_that_can_never_win() {
        // Z only ever appears alongside a forced A majority.
        let questions = vec![
            question(1, &["A"]),
            question(2, &["A"]),
            question(3, &["A", "Z"]),
        ];

        let report = ReachabilitySimulator::with_config(seeded(300, 11), Vec::new()).simulate(&questions);

        assert_eq!(report.reachable_personalities, vec!["A".to_string()]);
        assert_eq!(report.missing_personalities, vec!["Z".to_string()]);
    }

    #[test]
    fn test_every_label_reachable_with_enough_trials() {
        let questions = vec![
            question(1, &["A", "B", "C"]),
            question(2, &["A", "B", "C"]),
            question(3, &["A", "B", "C"]),
        ];

        let report = ReachabilitySimulator::with_config(seeded(1000, 99), Vec::new()).simulate(&questions);

        assert_eq!(report.reachable_count, 3);
        assert!(report.missing_personalities.is_empty());
    }

    #[test]
    fn test_empty_quiz_has_no_winners() {
        let report = ReachabilitySimulator::with_config(seeded(10, 5), reference_labels()).simulate(&[]);

        assert_eq!(report.reachable_count, 0);
        assert!(report.results_distribution.is_empty());
        assert_eq!(report.missing_personalities.len(), 15);
    }

    #[test]
    fn test_unseeded_run_completes() {
        let questions = vec![question(1, &["A", "B"])];
        let config = SimulationConfig {
            trials: 20,
            ..Default::default()
        };

        let report = ReachabilitySimulator::with_config(config, Vec::new()).simulate(&questions);

        assert_eq!(report.results_distribution.values().sum::<usize>(), 20);
        assert_eq!(report.seed, None);
    }
}
