#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Helper struct to run bugdeck commands in an isolated temp directory
pub struct BugdeckTest {
    pub temp_dir: TempDir,
    binary_path: PathBuf,
}

impl BugdeckTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        BugdeckTest {
            temp_dir,
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_bugdeck")),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("BUGDECK_ROOT")
            .env_remove("BUGDECK_API_URL")
            .env_remove("BUGDECK_API_KEY")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to execute bugdeck command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout).unwrap_or_else(|e| {
            panic!("Command {:?} did not print JSON ({e}):\n{stdout}", args)
        })
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join(".bugdeck")
    }

    /// Write records to the default `.bugdeck/bugs.json`.
    pub fn write_bugs(&self, bugs: &Value) {
        fs::create_dir_all(self.root()).expect("Failed to create .bugdeck directory");
        fs::write(self.root().join("bugs.json"), bugs.to_string())
            .expect("Failed to write bugs file");
    }

    pub fn read_state(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.root().join("state").join(format!("{key}.json"))).ok()
    }

    pub fn write_state(&self, key: &str, content: &str) {
        let dir = self.root().join("state");
        fs::create_dir_all(&dir).expect("Failed to create state directory");
        fs::write(dir.join(format!("{key}.json")), content).expect("Failed to write state");
    }

    pub fn write_config(&self, yaml: &str) {
        fs::create_dir_all(self.root()).expect("Failed to create .bugdeck directory");
        fs::write(self.root().join("config.yaml"), yaml).expect("Failed to write config");
    }
}

/// Twelve bugs created an hour apart (bug-00 oldest), cycling through
/// severities, statuses and three reporters. bug-11 has no reporter.
pub fn sample_bugs() -> Value {
    let severities = ["low", "medium", "high", "critical"];
    let statuses = ["open", "in_progress", "resolved"];
    let reporters = ["Ali", "Dana", "Sam"];
    let bugs: Vec<Value> = (0..12)
        .map(|i| {
            let mut bug = json!({
                "id": format!("bug-{i:02}"),
                "title": format!("Issue number {i}"),
                "severity": severities[i % 4],
                "priority": "medium",
                "status": statuses[i % 3],
                "environment": "staging",
                "created_at": format!("2024-05-01T{i:02}:00:00Z"),
            });
            if i != 11 {
                bug["reporter_name"] = json!(reporters[i % 3]);
            }
            bug
        })
        .collect();
    Value::Array(bugs)
}

pub fn bug_ids(json: &Value) -> Vec<String> {
    json["bugs"]
        .as_array()
        .expect("bugs array")
        .iter()
        .map(|b| b["id"].as_str().expect("id").to_string())
        .collect()
}

/// Remove ANSI SGR sequences from command output.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
