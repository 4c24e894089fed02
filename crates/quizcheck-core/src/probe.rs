//! Targeted best-case probes.
//!
//! For each target label, answer every question with that label when the
//! question offers it and with the question's first option otherwise. A
//! target that cannot win even its own best case is effectively unreachable.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::quiz::{Label, Question, QuizStats};
use crate::scoring::{AnswerSet, ScoringEngine};

/// Outcome of probing one target label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub target: Label,
    /// Label that actually won, if any question could be answered
    pub winner: Option<Label>,
    /// Answers naming the target (0 if no question offers it)
    pub target_score: usize,
    pub success: bool,
}

/// Result of probing every target label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub successful: Vec<Label>,
    pub failed: Vec<Label>,
    /// Reference labels among the successful ones
    pub reference_successful_count: usize,
    pub probes: Vec<ProbeOutcome>,
}

/// Runs best-case probes against a quiz.
pub struct TargetedProber {
    engine: ScoringEngine,
    reference: Vec<Label>,
}

impl TargetedProber {
    pub fn new(engine: ScoringEngine, reference: Vec<Label>) -> Self {
        Self { engine, reference }
    }

    /// Answer set biased toward `target`.
    pub fn best_case_answers(questions: &[Question], target: &str) -> AnswerSet {
        AnswerSet::from_choices(questions, |question| {
            question
                .options
                .iter()
                .position(|o| o.personality == target)
                .unwrap_or(0)
        })
    }

    /// Probe a single target label.
    pub fn probe(&self, questions: &[Question], target: &str) -> ProbeOutcome {
        let answers = Self::best_case_answers(questions, target);
        let outcome = self.engine.score(&answers);

        let target_score = outcome.as_ref().map_or(0, |o| o.tally.get(target));
        let winner = outcome.map(|o| o.winner);
        let success = winner.as_deref() == Some(target);

        debug!(label = target, winner = ?winner, target_score, success, "probe finished");

        ProbeOutcome {
            target: target.to_string(),
            winner,
            target_score,
            success,
        }
    }

    /// Probe every reference label and every observed label, in sorted order.
    pub fn probe_all(&self, questions: &[Question]) -> ProbeReport {
        let stats = QuizStats::from_questions(questions);
        let targets: BTreeSet<&str> = self
            .reference
            .iter()
            .map(String::as_str)
            .chain(stats.labels())
            .collect();

        let probes: Vec<ProbeOutcome> = targets
            .iter()
            .map(|target| self.probe(questions, target))
            .collect();

        let (successful, failed): (Vec<&ProbeOutcome>, Vec<&ProbeOutcome>) =
            probes.iter().partition(|p| p.success);
        let reference_successful_count = successful
            .iter()
            .filter(|p| self.reference.contains(&p.target))
            .count();

        info!(
            targets = probes.len(),
            successful = successful.len(),
            failed = failed.len(),
            "targeted probes finished"
        );

        ProbeReport {
            successful: successful.iter().map(|p| p.target.clone()).collect(),
            failed: failed.iter().map(|p| p.target.clone()).collect(),
            reference_successful_count,
            probes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::QuizOption;
    use crate::scoring::TieBreak;

    fn question(id: u32, labels: &[&str]) -> Question {
        let options = labels.iter().map(|l| QuizOption::new("o", *l)).collect();
        Question::new(id, "Q", options)
    }

    fn prober(reference: &[&str]) -> TargetedProber {
        TargetedProber::new(
            ScoringEngine::new(),
            reference.iter().map(|l| l.to_string()).collect(),
        )
    }

    #[test]
    fn test_best_case_prefers_target_then_first_option() {
        let questions = vec![question(1, &["A", "B"]), question(2, &["C", "D"])];

        let answers = TargetedProber::best_case_answers(&questions, "B");

        assert_eq!(answers.get(1), Some("B"));
        assert_eq!(answers.get(2), Some("C"));
    }

    #[test]
    fn test_probe_success_and_failure() {
        let questions = vec![
            question(1, &["B", "A"]),
            question(2, &["A", "C"]),
            question(3, &["A", "C"]),
        ];
        let prober = prober(&[]);

        let b = prober.probe(&questions, "B");
        assert!(!b.success);
        assert_eq!(b.winner.as_deref(), Some("A"));
        assert_eq!(b.target_score, 1);

        let c = prober.probe(&questions, "C");
        assert!(c.success);
        assert_eq!(c.target_score, 2);
    }

    #[test]
    fn test_unoffered_target_scores_zero() {
        let questions = vec![question(1, &["A"])];

        let outcome = prober(&[]).probe(&questions, "Z");

        assert!(!outcome.success);
        assert_eq!(outcome.target_score, 0);
        assert_eq!(outcome.winner.as_deref(), Some("A"));
    }

    #[test]
    fn test_probe_on_empty_quiz_has_no_winner() {
        let outcome = prober(&[]).probe(&[], "A");

        assert_eq!(outcome.winner, None);
        assert!(!outcome.success);
    }

    #[test]
    fn test_probe_all_covers_reference_and_observed() {
        let questions = vec![question(1, &["A", "X"]), question(2, &["A", "X"])];

        let report = prober(&["A", "R"]).probe_all(&questions);

        let targets: Vec<_> = report.probes.iter().map(|p| p.target.as_str()).collect();
        assert_eq!(targets, vec!["A", "R", "X"]);
        assert_eq!(report.successful, vec!["A".to_string(), "X".to_string()]);
        assert_eq!(report.failed, vec!["R".to_string()]);
        assert_eq!(report.reference_successful_count, 1);
    }

    #[test]
    fn test_probe_tie_break_matters() {
        // Target B ties A 1-1; answer order puts A first.
        let questions = vec![question(1, &["A"]), question(2, &["B"])];
        let reference = vec!["B".to_string(), "A".to_string()];

        let by_answer = TargetedProber::new(ScoringEngine::new(), reference.clone());
        let by_reference = TargetedProber::new(
            ScoringEngine::with_tie_break(TieBreak::ReferenceOrder, reference.clone()),
            reference,
        );

        assert!(!by_answer.probe(&questions, "B").success);
        assert!(by_reference.probe(&questions, "B").success);
    }
}
