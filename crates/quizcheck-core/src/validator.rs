//! End-to-end quiz validation.
//!
//! Wires the analyses together from a [`QuizCheckConfig`]: parsed questions
//! flow into the distribution and balance analyzers, and into the
//! simulation and probe phases, each receiving its inputs explicitly.

use std::path::Path;

use tracing::info;

use crate::analysis::{BalanceAnalyzer, BalanceReport, DistributionAnalyzer, DistributionReport};
use crate::config::QuizCheckConfig;
use crate::error::Result;
use crate::probe::{ProbeReport, TargetedProber};
use crate::quiz::{self, Question, QuizStats};
use crate::report::{Reporter, ValidationReport};
use crate::scoring::ScoringEngine;
use crate::simulation::{ReachabilitySimulator, SimulationReport};

/// Runs every analysis phase over one quiz.
#[derive(Debug, Clone, Default)]
pub struct QuizValidator {
    config: QuizCheckConfig,
}

impl QuizValidator {
    pub fn new(config: QuizCheckConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuizCheckConfig {
        &self.config
    }

    fn engine(&self) -> ScoringEngine {
        ScoringEngine::with_tie_break(
            self.config.simulation.tie_break,
            self.config.reference_labels.clone(),
        )
    }

    pub fn distribution(&self, questions: &[Question]) -> DistributionReport {
        DistributionAnalyzer::with_reference(
            self.config.reference_labels.clone(),
            self.config.distribution.imbalance_tolerance,
        )
        .analyze(&QuizStats::from_questions(questions))
    }

    pub fn balance(&self, questions: &[Question]) -> BalanceReport {
        BalanceAnalyzer::with_thresholds(
            self.config.balance.expected_options,
            self.config.balance.min_distinct_labels,
        )
        .analyze(questions)
    }

    pub fn simulate(&self, questions: &[Question]) -> SimulationReport {
        ReachabilitySimulator::with_config(
            self.config.simulation_config(),
            self.config.reference_labels.clone(),
        )
        .simulate(questions)
    }

    pub fn probe(&self, questions: &[Question]) -> ProbeReport {
        TargetedProber::new(self.engine(), self.config.reference_labels.clone()).probe_all(questions)
    }

    /// Run all phases over already-parsed questions.
    pub fn validate(&self, source: &Path, questions: &[Question]) -> ValidationReport {
        info!(questions = questions.len(), source = %source.display(), "validating quiz");

        let distribution = self.distribution(questions);
        let balance = self.balance(questions);
        let simulation = self.simulate(questions);
        let targeted = self.probe(questions);

        Reporter::new(self.config.reference_labels.len()).build(
            source,
            distribution,
            balance,
            simulation,
            targeted,
        )
    }

    /// Load `source` and run all phases.
    ///
    /// # Errors
    ///
    /// Fails only if the source cannot be loaded.
    pub fn validate_file(&self, source: &Path) -> Result<ValidationReport> {
        let questions = quiz::load(source)?;
        Ok(self.validate(source, &questions))
    }
}
