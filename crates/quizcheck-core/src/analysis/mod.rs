//! Static analyses over a parsed quiz
//!
//! These run without answering the quiz: label coverage across the whole
//! question set, and per-question option balance.

mod balance;
mod distribution;

pub use balance::{BalanceAnalyzer, BalanceIssue, BalanceReport, QuestionBalance};
pub use distribution::{DistributionAnalyzer, DistributionReport, LabelShare};
