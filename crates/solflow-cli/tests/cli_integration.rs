//! Integration tests for the solflow binary's headless commands.
//!
//! Run with: `cargo test --package solflow-cli --test cli_integration`

use std::fs;
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output};

use solflow_core::APOLOGY;
use tempfile::TempDir;

const SCRUBBED_VARS: &[&str] = &[
    "RUST_LOG",
    "SOLFLOW_CONFIG",
    "SOLFLOW_API_URL",
    "SOLFLOW_API_KEY",
    "SOLFLOW_MODEL",
    "SOLFLOW_REQUEST_TIMEOUT_SECS",
    "OPENAI_API_URL",
    "OPENAI_API_KEY",
    "OPENAI_MODEL_NAME",
];

/// Run solflow inside `dir` with a clean environment: no provider variables,
/// and HOME pointed at `dir` so no user config file leaks in.
fn run_solflow_in_dir(dir: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_solflow"));
    for var in SCRUBBED_VARS {
        command.env_remove(var);
    }
    command
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .args(args)
        .output()
        .expect("Failed to execute solflow command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// A loopback port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[test]
fn test_diagram_prints_seed_json() {
    let temp = TempDir::new().unwrap();
    let output = run_solflow_in_dir(temp.path(), &["diagram"]);

    assert!(output.status.success(), "diagram failed: {output:?}");
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(json["edges"].as_array().unwrap().len(), 4);
    assert_eq!(json["nodes"][0]["data"]["label"], "Initialize Program");
}

#[test]
fn test_config_path_echoes_explicit_file() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.json");
    let config_arg = config.to_string_lossy().to_string();

    let output = run_solflow_in_dir(temp.path(), &["config", "path", "--config", &config_arg]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), config_arg);
}

#[test]
fn test_config_show_redacts_key() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("solflow.json");
    fs::write(
        &config,
        r#"{"api_key": "sk-supersecret-9876", "model_name": "gpt-4o-mini"}"#,
    )
    .unwrap();

    let output = run_solflow_in_dir(
        temp.path(),
        &["config", "show", "--config", &config.to_string_lossy()],
    );

    assert!(output.status.success(), "config show failed: {output:?}");
    let text = stdout(&output);
    assert!(text.contains("****9876"));
    assert!(!text.contains("supersecret"));
    assert!(text.contains("gpt-4o-mini"));
}

#[test]
fn test_model_flag_overrides_file() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("solflow.json");
    fs::write(&config, r#"{"model_name": "from-file"}"#).unwrap();

    let output = run_solflow_in_dir(
        temp.path(),
        &[
            "config",
            "show",
            "--config",
            &config.to_string_lossy(),
            "--model",
            "from-flag",
        ],
    );

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("from-flag"));
    assert!(!text.contains("from-file"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.json");

    let output = run_solflow_in_dir(
        temp.path(),
        &["config", "show", "--config", &missing.to_string_lossy()],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config file not found"));
}

#[test]
fn test_ask_unreachable_provider_prints_apology() {
    let temp = TempDir::new().unwrap();
    let api_url = format!("http://127.0.0.1:{}/v1", closed_port());

    let output = run_solflow_in_dir(
        temp.path(),
        &["ask", "What does the entry node do?", "--api-url", &api_url],
    );

    assert!(output.status.success(), "ask failed: {output:?}");
    assert_eq!(stdout(&output).trim(), APOLOGY);
}

#[test]
fn test_ask_blank_question_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_solflow_in_dir(temp.path(), &["ask", "   "]);

    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
}
