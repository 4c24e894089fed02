pub mod analyze;
pub mod config;
pub mod probe;
pub mod questions;
pub mod simulate;

use std::path::{Path, PathBuf};

use quizcheck_core::{Question, QuizCheckConfig};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Configuration from `--config`, the default location, or built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<QuizCheckConfig, Box<dyn std::error::Error>> {
    Ok(QuizCheckConfig::load(path)?)
}

/// Load the quiz at `input`, or at the configured input path.
///
/// Load failures are the one fatal outcome of a run.
pub fn load_questions(
    config: &QuizCheckConfig,
    input: Option<PathBuf>,
) -> Result<(PathBuf, Vec<Question>), Box<dyn std::error::Error>> {
    let source = input.unwrap_or_else(|| config.input.clone());
    let questions = quizcheck_core::quiz::load(&source)
        .map_err(|e| format!("Failed to load quiz: {e}"))?;
    Ok((source, questions))
}
