//! # quizcheck Core Library
//!
//! Validates the design of a static personality quiz. The quiz source is
//! parsed into questions, checked for label coverage and per-question
//! balance, then answered many times over to verify every personality can
//! actually come out on top.
//!
//! ## Architecture
//!
//! - **Extraction**: a tolerant object-literal parser turns quiz source text
//!   into [`Question`]s
//! - **Analysis**: label distribution and per-question balance checks
//! - **Scoring**: tally-and-tie-break engine shared by the dynamic phases
//! - **Simulation**: seeded Monte Carlo reachability runs
//! - **Probing**: best-case answer sets per target label
//! - **Reporting**: score out of 100, rating band and recommendations
//!
//! ## Key Components
//!
//! - [`QuizValidator`]: runs every phase from a [`QuizCheckConfig`]
//! - [`ScoringEngine`]: winner selection with an explicit [`TieBreak`]
//! - [`ReachabilitySimulator`]: Monte Carlo coverage check
//! - [`TargetedProber`]: best-case probes

pub mod analysis;
pub mod config;
pub mod error;
pub mod probe;
pub mod quiz;
pub mod report;
pub mod scoring;
pub mod simulation;
pub mod validator;

pub use analysis::{
    BalanceAnalyzer, BalanceIssue, BalanceReport, DistributionAnalyzer, DistributionReport,
    LabelShare, QuestionBalance,
};
pub use config::QuizCheckConfig;
pub use error::{ConfigError, CoreError, LoadError};
pub use probe::{ProbeOutcome, ProbeReport, TargetedProber};
pub use quiz::{Label, Question, QuizOption, QuizStats, REFERENCE_LABELS};
pub use report::{Rating, Reporter, ValidationReport};
pub use scoring::{AnswerSet, ScoreOutcome, ScoreTally, ScoringEngine, TieBreak};
pub use simulation::{ReachabilitySimulator, SimulationConfig, SimulationReport};
pub use validator::QuizValidator;
