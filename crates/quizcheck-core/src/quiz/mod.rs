//! Quiz data model
//!
//! A quiz is an ordered list of [`Question`]s, each carrying an ordered list
//! of [`QuizOption`]s tagged with a personality label. Everything here is
//! immutable once produced by the [`parser`].

pub mod parser;

pub use parser::{load, parse};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Personality label attached to an option. The label space is open-ended.
pub type Label = String;

/// The fifteen personality labels every quiz is expected to cover, in
/// canonical order.
pub const REFERENCE_LABELS: [&str; 15] = [
    "Stratège",
    "Créatif",
    "Organisateur",
    "Communicant",
    "Leader",
    "Collaboratif",
    "Mentor",
    "Indépendant",
    "Entrepreneur",
    "Réaliste",
    "Visionnaire",
    "Méthodique",
    "Explorateur",
    "Idéaliste",
    "Perfectionniste",
];

/// Reference labels as owned strings.
pub fn reference_labels() -> Vec<Label> {
    REFERENCE_LABELS.iter().map(|l| l.to_string()).collect()
}

/// A selectable answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    /// Display text
    pub text: String,
    /// Personality label this option scores for
    pub personality: Label,
}

impl QuizOption {
    pub fn new(text: impl Into<String>, personality: impl Into<Label>) -> Self {
        Self {
            text: text.into(),
            personality: personality.into(),
        }
    }
}

/// A quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question identifier
    pub id: u32,
    /// Prompt text
    pub question: String,
    /// Options in source order
    pub options: Vec<QuizOption>,
}

impl Question {
    pub fn new(id: u32, question: impl Into<String>, options: Vec<QuizOption>) -> Self {
        Self {
            id,
            question: question.into(),
            options,
        }
    }

    /// Labels of this question's options, in source order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.personality.as_str())
    }

    /// Whether any option scores for `label`.
    pub fn offers(&self, label: &str) -> bool {
        self.labels().any(|l| l == label)
    }
}

/// Labels observed across a quiz and how many options carry each.
///
/// Keys are kept in the order labels are first seen while walking the
/// questions in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizStats {
    pub label_counts: IndexMap<Label, usize>,
}

impl QuizStats {
    /// Tally option labels over `questions`.
    pub fn from_questions(questions: &[Question]) -> Self {
        let mut label_counts = IndexMap::new();
        for label in questions.iter().flat_map(Question::labels) {
            *label_counts.entry(label.to_string()).or_insert(0) += 1;
        }
        Self { label_counts }
    }

    /// Total number of options across the quiz.
    pub fn total_options(&self) -> usize {
        self.label_counts.values().sum()
    }

    /// Observed labels in first-seen order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.label_counts.keys().map(String::as_str)
    }

    pub fn count(&self, label: &str) -> usize {
        self.label_counts.get(label).copied().unwrap_or(0)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.label_counts.contains_key(label)
    }
}
