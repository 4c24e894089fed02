use std::path::{Path, PathBuf};

use super::{load_config, load_questions, CommandResult};

pub fn run(config_path: Option<&Path>, input: Option<PathBuf>) -> CommandResult {
    let config = load_config(config_path)?;
    let (_, questions) = load_questions(&config, input)?;
    println!("{}", serde_json::to_string_pretty(&questions)?);
    Ok(())
}
