//! Quiz result scoring.
//!
//! A quiz result is the label named by the most answers. Ties are resolved by
//! an explicit [`TieBreak`] policy rather than by container iteration order:
//! the tally is an insertion-ordered map built by scanning answers in
//! increasing question-id order, so "first inserted" is well defined.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::quiz::{Label, Question};

/// One chosen label per question, keyed by question id.
///
/// Iteration is always in increasing question-id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    answers: BTreeMap<u32, Label>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the answer for a question, replacing any earlier answer.
    pub fn answer(&mut self, question_id: u32, label: impl Into<Label>) {
        self.answers.insert(question_id, label.into());
    }

    /// Builder-style variant of [`AnswerSet::answer`].
    pub fn with(mut self, question_id: u32, label: impl Into<Label>) -> Self {
        self.answer(question_id, label);
        self
    }

    /// Build an answer set by picking one option index per question.
    ///
    /// Questions without options are left unanswered. `pick` receives the
    /// question and must return an index into its options.
    pub fn from_choices<F>(questions: &[Question], mut pick: F) -> Self
    where
        F: FnMut(&Question) -> usize,
    {
        let mut answers = Self::new();
        for question in questions.iter().filter(|q| !q.options.is_empty()) {
            let index = pick(question).min(question.options.len() - 1);
            answers.answer(question.id, question.options[index].personality.clone());
        }
        answers
    }

    pub fn get(&self, question_id: u32) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Answers in increasing question-id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.answers.iter().map(|(id, label)| (*id, label.as_str()))
    }
}

/// How to choose among labels sharing the top tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The tied label first answered, scanning questions by increasing id
    #[default]
    AnswerOrder,
    /// The tied label earliest in the reference list; labels outside the
    /// list rank after it, in answer order
    ReferenceOrder,
}

/// Per-label answer counts in first-answered order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTally {
    counts: IndexMap<Label, usize>,
}

impl ScoreTally {
    /// Tally the labels of an answer set.
    pub fn from_answers(answers: &AnswerSet) -> Self {
        let mut counts = IndexMap::new();
        for (_, label) in answers.iter() {
            *counts.entry(label.to_string()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Highest count, if anything was tallied.
    pub fn max_count(&self) -> Option<usize> {
        self.counts.values().copied().max()
    }

    /// Labels sharing the highest count, in insertion order.
    pub fn leaders(&self) -> Vec<&str> {
        let Some(max) = self.max_count() else {
            return Vec::new();
        };
        self.iter()
            .filter(|(_, count)| *count == max)
            .map(|(label, _)| label)
            .collect()
    }

    /// Winning label under `tie_break`, or `None` for an empty tally.
    pub fn winner(&self, tie_break: TieBreak, reference: &[Label]) -> Option<&str> {
        let leaders = self.leaders();
        match tie_break {
            TieBreak::AnswerOrder => leaders.first().copied(),
            TieBreak::ReferenceOrder => leaders
                .iter()
                .copied()
                .min_by_key(|label| {
                    reference
                        .iter()
                        .position(|r| r.as_str() == *label)
                        .unwrap_or(reference.len())
                }),
        }
    }
}

/// Scores answer sets into a single winning label.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    tie_break: TieBreak,
    reference: Vec<Label>,
}

/// Outcome of scoring one answer set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub winner: Label,
    pub tally: ScoreTally,
}

impl ScoringEngine {
    /// Engine using answer-order tie-breaking.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tie_break(tie_break: TieBreak, reference: Vec<Label>) -> Self {
        Self {
            tie_break,
            reference,
        }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Score an answer set. Returns `None` when there is nothing to score.
    pub fn score(&self, answers: &AnswerSet) -> Option<ScoreOutcome> {
        let tally = ScoreTally::from_answers(answers);
        let winner = tally.winner(self.tie_break, &self.reference)?.to_string();
        Some(ScoreOutcome { winner, tally })
    }

    /// Winning label only.
    pub fn winner(&self, answers: &AnswerSet) -> Option<Label> {
        self.score(answers).map(|outcome| outcome.winner)
    }
}
