//! Validation report assembly.
//!
//! Combines the four analyses into a single score out of 100, a rating band
//! and a list of recommendations, and writes the result as JSON.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{BalanceReport, DistributionReport};
use crate::error::Result;
use crate::probe::ProbeReport;
use crate::simulation::SimulationReport;

pub const MAX_SCORE: u32 = 100;

/// Qualitative rating band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// 90-100
    Excellent,
    /// 70-89
    Good,
    /// 50-69
    Fair,
    /// 0-49
    Poor,
}

impl From<u32> for Rating {
    fn from(score: u32) -> Self {
        if score >= 90 {
            Rating::Excellent
        } else if score >= 70 {
            Rating::Good
        } else if score >= 50 {
            Rating::Fair
        } else {
            Rating::Poor
        }
    }
}

impl Rating {
    pub fn summary(&self) -> &'static str {
        match self {
            Rating::Excellent => "EXCELLENT: the quiz is very well balanced",
            Rating::Good => "GOOD: the quiz works, small adjustments needed",
            Rating::Fair => "FAIR: the quiz needs significant improvements",
            Rating::Poor => "POOR: the quiz needs a complete review",
        }
    }
}

/// Complete validation report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub generated_at: DateTime<Utc>,
    /// Quiz source the report describes
    pub source: PathBuf,
    pub score: u32,
    pub max_score: u32,
    pub rating: Rating,
    pub recommendations: Vec<String>,
    pub distribution: DistributionReport,
    pub balance: BalanceReport,
    pub simulation: SimulationReport,
    pub targeted: ProbeReport,
}

impl ValidationReport {
    /// Pretty JSON with non-ASCII text left unescaped.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), score = self.score, "report saved");
        Ok(())
    }
}

/// Scores analyses and derives recommendations.
#[derive(Debug, Clone)]
pub struct Reporter {
    /// Size of the reference label set
    reference_size: usize,
}

impl Reporter {
    pub fn new(reference_size: usize) -> Self {
        Self { reference_size }
    }

    /// Points for a count of reference labels meeting a check.
    ///
    /// Tiers sit at 13/15, 10/15 and 7/15 of the reference set, i.e. 13, 10
    /// and 7 labels for the standard fifteen.
    fn tiered(&self, count: usize) -> u32 {
        if self.reference_size == 0 {
            return 0;
        }
        let scaled = count * 15;
        if scaled >= 13 * self.reference_size {
            20
        } else if scaled >= 10 * self.reference_size {
            15
        } else if scaled >= 7 * self.reference_size {
            10
        } else {
            0
        }
    }

    fn spread_points(spread: usize) -> u32 {
        if spread <= 2 {
            20
        } else if spread <= 4 {
            15
        } else if spread <= 6 {
            10
        } else {
            0
        }
    }

    pub fn score(
        &self,
        distribution: &DistributionReport,
        balance: &BalanceReport,
        simulation: &SimulationReport,
        targeted: &ProbeReport,
    ) -> u32 {
        let mut total = 0;
        if distribution.is_complete() {
            total += 20;
        }
        if balance.is_clean() {
            total += 20;
        }
        total += self.tiered(simulation.reference_reachable_count);
        total += self.tiered(targeted.reference_successful_count);
        total += Self::spread_points(distribution.spread);
        total.min(MAX_SCORE)
    }

    pub fn recommendations(
        &self,
        distribution: &DistributionReport,
        balance: &BalanceReport,
        simulation: &SimulationReport,
        targeted: &ProbeReport,
    ) -> Vec<String> {
        let mut out = Vec::new();
        if !distribution.missing.is_empty() {
            out.push(format!("Add options for: {}", distribution.missing.join(", ")));
        }
        if !distribution.extra.is_empty() {
            out.push(format!(
                "Review labels outside the reference set: {}",
                distribution.extra.join(", ")
            ));
        }
        if !balance.problems.is_empty() {
            out.push(format!("Fix {} balance problems", balance.problems.len()));
        }
        let unreached = self
            .reference_size
            .saturating_sub(simulation.reference_reachable_count);
        if unreached > 0 {
            out.push(format!("Improve reachability of {unreached} personalities"));
        }
        if !targeted.failed.is_empty() {
            out.push(format!("Review distribution for: {}", targeted.failed.join(", ")));
        }
        out
    }

    /// Assemble the final report.
    pub fn build(
        &self,
        source: impl Into<PathBuf>,
        distribution: DistributionReport,
        balance: BalanceReport,
        simulation: SimulationReport,
        targeted: ProbeReport,
    ) -> ValidationReport {
        let score = self.score(&distribution, &balance, &simulation, &targeted);
        let recommendations = self.recommendations(&distribution, &balance, &simulation, &targeted);
        let rating = Rating::from(score);

        info!(score, rating = ?rating, "validation scored");

        ValidationReport {
            generated_at: Utc::now(),
            source: source.into(),
            score,
            max_score: MAX_SCORE,
            rating,
            recommendations,
            distribution,
            balance,
            simulation,
            targeted,
        }
    }
}
