//! Label distribution analysis
//!
//! Compares the labels observed across all options with the reference set
//! and measures how evenly options are spread over labels.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::quiz::{reference_labels, Label, QuizStats};

/// Share of options carried by one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelShare {
    pub label: Label,
    /// Number of options carrying the label
    pub count: usize,
    /// Percentage of all options (0 when there are none)
    pub percentage: f64,
    /// Count is within tolerance of the ideal share
    pub balanced: bool,
}

/// Result of a distribution analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionReport {
    /// Reference labels no option carries
    pub missing: Vec<Label>,
    /// Observed labels outside the reference set
    pub extra: Vec<Label>,
    /// Observed label -> option count
    pub distribution: BTreeMap<Label, usize>,
    pub total_options: usize,
    /// Even share per reference label
    pub ideal_per_personality: f64,
    /// Every reference and observed label, sorted
    pub labels: Vec<LabelShare>,
    /// Largest minus smallest observed count
    pub spread: usize,
}

impl DistributionReport {
    /// No missing and no extra labels.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }

    /// Labels whose count is outside tolerance.
    pub fn imbalanced(&self) -> impl Iterator<Item = &LabelShare> {
        self.labels.iter().filter(|share| !share.balanced)
    }
}

/// Analyzer for label coverage and spread
#[derive(Debug, Clone)]
pub struct DistributionAnalyzer {
    reference: Vec<Label>,
    /// Allowed absolute deviation from the ideal share
    imbalance_tolerance: f64,
}

impl Default for DistributionAnalyzer {
    fn default() -> Self {
        Self {
            reference: reference_labels(),
            imbalance_tolerance: 2.0,
        }
    }
}

impl DistributionAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(reference: Vec<Label>, imbalance_tolerance: f64) -> Self {
        Self {
            reference,
            imbalance_tolerance,
        }
    }

    pub fn analyze(&self, stats: &QuizStats) -> DistributionReport {
        let reference: BTreeSet<&str> = self.reference.iter().map(String::as_str).collect();
        let observed: BTreeSet<&str> = stats.labels().collect();

        let missing: Vec<Label> = reference.difference(&observed).map(|l| l.to_string()).collect();
        let extra: Vec<Label> = observed.difference(&reference).map(|l| l.to_string()).collect();

        let total_options = stats.total_options();
        let ideal_per_personality = if reference.is_empty() {
            0.0
        } else {
            total_options as f64 / reference.len() as f64
        };

        let labels = reference
            .union(&observed)
            .map(|label| {
                let count = stats.count(label);
                let percentage = if total_options > 0 {
                    count as f64 / total_options as f64 * 100.0
                } else {
                    0.0
                };
                LabelShare {
                    label: label.to_string(),
                    count,
                    percentage,
                    balanced: (count as f64 - ideal_per_personality).abs()
                        <= self.imbalance_tolerance,
                }
            })
            .collect();

        let spread = match (
            stats.label_counts.values().max(),
            stats.label_counts.values().min(),
        ) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        };

        if !missing.is_empty() {
            warn!(missing = ?missing, "reference labels without options");
        }
        if !extra.is_empty() {
            warn!(extra = ?extra, "labels outside the reference set");
        }
        info!(total_options, ideal_per_personality, spread, "distribution analyzed");

        DistributionReport {
            missing,
            extra,
            distribution: stats
                .label_counts
                .iter()
                .map(|(label, count)| (label.clone(), *count))
                .collect(),
            total_options,
            ideal_per_personality,
            labels,
            spread,
        }
    }
}
