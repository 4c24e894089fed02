//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against temporary quiz files and verify outputs.

use std::path::Path;
use std::process::Command;

const QUIZ: &str = r#"<script>
const questions = [
  { id: 1, question: "Matin ?", options: [
    { text: "a", personality: "Visionnaire" },
    { text: "b", personality: "Mentor" },
    { text: "c", personality: "Explorateur" },
    { text: "d", personality: "Leader" },
  ] },
  { id: 2, question: "Soir ?", options: [
    { text: "a", personality: "Mentor" },
    { text: "b", personality: "Visionnaire" },
    { text: "c", personality: "Leader" },
    { text: "d", personality: "Explorateur" },
  ] },
];
</script>"#;

/// Run a CLI command with a pinned config file and return output.
fn run_cli(config: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_quizcheck"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Temp dir holding `quiz.html` and a seeded `config.toml`.
fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("quiz.html"), QUIZ).unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[simulation]\ntrials = 200\nseed = 7\n",
    )
    .unwrap();
    dir
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_analyze_writes_report() {
    let dir = fixture();
    let config = dir.path().join("config.toml");
    let quiz = dir.path().join("quiz.html");
    let report = dir.path().join("out").join("report.json");

    let output = run_cli(
        &config,
        &["analyze", path_str(&quiz), "--output", path_str(&report)],
    );

    assert_eq!(output.0, 0, "analyze failed: {}", output.2);
    assert!(output.1.contains("LABEL DISTRIBUTION"));
    assert!(output.1.contains("SCORE:"));
    assert!(output.1.contains("Report saved to:"));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["max_score"], 100);
    assert_eq!(value["distribution"]["total_options"], 8);
    assert_eq!(value["simulation"]["trials"], 200);
}

#[test]
fn test_analyze_json_output() {
    let dir = fixture();
    let config = dir.path().join("config.toml");
    let quiz = dir.path().join("quiz.html");
    let report = dir.path().join("report.json");

    let output = run_cli(
        &config,
        &["analyze", path_str(&quiz), "-o", path_str(&report), "--json", "--trials", "50"],
    );

    assert_eq!(output.0, 0, "analyze --json failed: {}", output.2);
    let value: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    assert_eq!(value["simulation"]["trials"], 50);
    assert!(report.exists());
}

#[test]
fn test_analyze_missing_input_fails() {
    let dir = fixture();
    let config = dir.path().join("config.toml");
    let missing = dir.path().join("absent.html");
    let report = dir.path().join("report.json");

    let output = run_cli(
        &config,
        &["analyze", path_str(&missing), "--output", path_str(&report)],
    );

    assert_eq!(output.0, 1);
    assert!(output.2.contains("Failed to load quiz"));
    assert!(!report.exists());
}

#[test]
fn test_questions_json() {
    let dir = fixture();
    let config = dir.path().join("config.toml");
    let quiz = dir.path().join("quiz.html");

    let output = run_cli(&config, &["questions", path_str(&quiz)]);

    assert_eq!(output.0, 0, "questions failed: {}", output.2);
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    let questions = parsed.as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["id"], 1);
    assert_eq!(questions[1]["options"][0]["personality"], "Mentor");
}

#[test]
fn test_probe_json() {
    let dir = fixture();
    let config = dir.path().join("config.toml");
    let quiz = dir.path().join("quiz.html");

    let output = run_cli(&config, &["probe", path_str(&quiz)]);

    assert_eq!(output.0, 0, "probe failed: {}", output.2);
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    let successful = parsed["successful"].as_array().unwrap();
    assert!(successful.iter().any(|l| l == "Mentor"));
}

#[test]
fn test_simulate_json() {
    let dir = fixture();
    let config = dir.path().join("config.toml");
    let quiz = dir.path().join("quiz.html");

    let output = run_cli(&config, &["simulate", path_str(&quiz), "--seed", "3"]);

    assert_eq!(output.0, 0, "simulate failed: {}", output.2);
    let parsed: serde_json::Value = serde_json::from_str(&output.1).unwrap();
    assert_eq!(parsed["trials"], 200);
    assert_eq!(parsed["seed"], 3);
}

#[test]
fn test_config_get() {
    let dir = fixture();
    let config = dir.path().join("config.toml");

    let output = run_cli(&config, &["config", "get", "simulation.trials"]);
    assert_eq!(output.0, 0);
    assert_eq!(output.1.trim(), "200");

    let output = run_cli(&config, &["config", "get", "no.such.key"]);
    assert_eq!(output.0, 1);
    assert!(output.2.contains("unknown key"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = fixture();
    let config = dir.path().join("config.toml");
    let target = dir.path().join("fresh.toml");

    let output = run_cli(&config, &["config", "init", path_str(&target)]);
    assert_eq!(output.0, 0, "config init failed: {}", output.2);
    assert!(std::fs::read_to_string(&target)
        .unwrap()
        .contains("reference_labels"));

    let output = run_cli(&config, &["config", "init", path_str(&target)]);
    assert_eq!(output.0, 1);
}

#[test]
fn test_completions() {
    let dir = fixture();
    let config = dir.path().join("config.toml");

    let output = run_cli(&config, &["completions", "bash"]);

    assert_eq!(output.0, 0);
    assert!(output.1.contains("quizcheck"));
}
