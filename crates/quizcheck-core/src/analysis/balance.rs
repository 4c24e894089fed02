//! Per-question balance checks
//!
//! Every question should offer a fixed number of options spread over
//! enough distinct labels. Violations are recorded as findings; none of
//! them stop the analysis.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::quiz::{Label, Question};

const PREVIEW_CHARS: usize = 50;

/// A balance finding for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BalanceIssue {
    WrongOptionCount {
        question_id: u32,
        count: usize,
        expected: usize,
    },
    DuplicateLabels {
        question_id: u32,
        duplicates: usize,
    },
    TooFewDistinctLabels {
        question_id: u32,
        distinct: usize,
        minimum: usize,
    },
    DuplicateQuestionId {
        question_id: u32,
    },
}

impl BalanceIssue {
    pub fn question_id(&self) -> u32 {
        match self {
            BalanceIssue::WrongOptionCount { question_id, .. }
            | BalanceIssue::DuplicateLabels { question_id, .. }
            | BalanceIssue::TooFewDistinctLabels { question_id, .. }
            | BalanceIssue::DuplicateQuestionId { question_id } => *question_id,
        }
    }
}

impl fmt::Display for BalanceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceIssue::WrongOptionCount {
                question_id,
                count,
                expected,
            } => write!(f, "Question {question_id}: {count} options (expected {expected})"),
            BalanceIssue::DuplicateLabels {
                question_id,
                duplicates,
            } => write!(f, "Question {question_id}: duplicated labels ({duplicates} repeated)"),
            BalanceIssue::TooFewDistinctLabels {
                question_id,
                distinct,
                minimum,
            } => write!(
                f,
                "Question {question_id}: fewer than {minimum} distinct labels ({distinct})"
            ),
            BalanceIssue::DuplicateQuestionId { question_id } => {
                write!(f, "Question {question_id}: id used by more than one question")
            }
        }
    }
}

/// Balance detail for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBalance {
    pub id: u32,
    /// Prompt, truncated for display
    pub question: String,
    pub total_options: usize,
    pub unique_personalities: usize,
    /// Distinct labels in option order
    pub personalities: Vec<Label>,
    /// Options whose label repeats an earlier option's
    pub duplicates: usize,
}

/// Result of a balance analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    /// Human-readable findings
    pub problems: Vec<String>,
    pub issues: Vec<BalanceIssue>,
    pub avg_options: f64,
    pub avg_unique_personalities: f64,
    pub question_details: Vec<QuestionBalance>,
}

impl BalanceReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Analyzer for per-question option balance
#[derive(Debug, Clone)]
pub struct BalanceAnalyzer {
    /// Options each question should offer
    pub expected_options: usize,
    /// Fewest distinct labels a question may offer
    pub min_distinct_labels: usize,
}

impl Default for BalanceAnalyzer {
    fn default() -> Self {
        Self {
            expected_options: 4,
            min_distinct_labels: 3,
        }
    }
}

impl BalanceAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(expected_options: usize, min_distinct_labels: usize) -> Self {
        Self {
            expected_options,
            min_distinct_labels,
        }
    }

    pub fn analyze(&self, questions: &[Question]) -> BalanceReport {
        let mut issues = Vec::new();
        let mut question_details = Vec::with_capacity(questions.len());
        let mut seen_ids = HashSet::new();

        for question in questions {
            let detail = Self::inspect(question);

            if !seen_ids.insert(question.id) {
                issues.push(BalanceIssue::DuplicateQuestionId {
                    question_id: question.id,
                });
            }
            if detail.total_options != self.expected_options {
                issues.push(BalanceIssue::WrongOptionCount {
                    question_id: question.id,
                    count: detail.total_options,
                    expected: self.expected_options,
                });
            }
            if detail.duplicates > 0 {
                issues.push(BalanceIssue::DuplicateLabels {
                    question_id: question.id,
                    duplicates: detail.duplicates,
                });
            }
            if detail.unique_personalities < self.min_distinct_labels {
                issues.push(BalanceIssue::TooFewDistinctLabels {
                    question_id: question.id,
                    distinct: detail.unique_personalities,
                    minimum: self.min_distinct_labels,
                });
            }

            debug!(
                id = question.id,
                options = detail.total_options,
                distinct = detail.unique_personalities,
                "question inspected"
            );
            question_details.push(detail);
        }

        let (avg_options, avg_unique_personalities) = if question_details.is_empty() {
            (0.0, 0.0)
        } else {
            let n = question_details.len() as f64;
            (
                question_details.iter().map(|d| d.total_options).sum::<usize>() as f64 / n,
                question_details
                    .iter()
                    .map(|d| d.unique_personalities)
                    .sum::<usize>() as f64
                    / n,
            )
        };

        info!(
            questions = questions.len(),
            problems = issues.len(),
            avg_options,
            "balance analyzed"
        );

        BalanceReport {
            problems: issues.iter().map(ToString::to_string).collect(),
            issues,
            avg_options,
            avg_unique_personalities,
            question_details,
        }
    }

    fn inspect(question: &Question) -> QuestionBalance {
        let mut personalities: Vec<Label> = Vec::new();
        for label in question.labels() {
            if !personalities.iter().any(|p| p == label) {
                personalities.push(label.to_string());
            }
        }

        QuestionBalance {
            id: question.id,
            question: preview(&question.question),
            total_options: question.options.len(),
            unique_personalities: personalities.len(),
            duplicates: question.options.len() - personalities.len(),
            personalities,
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
