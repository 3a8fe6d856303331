//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Each test gets
//! its own HOME so config commands never touch the real user directory.

use std::path::{Path, PathBuf};
use std::process::Command;

const PATTERN_JSON: &str = r#"{
    "user_id": "alice",
    "work_start": "09:00",
    "work_end": "12:00",
    "focus_duration": 90,
    "break_duration": 15,
    "energy": {"windows": [
        {"hour": 9, "level": "high"},
        {"hour": 10, "level": "peak"},
        {"hour": 11, "level": "peak"}
    ]}
}"#;

const PATTERN_TOML: &str = r#"
user_id = "alice"
work_start = "09:00"
work_end = "12:00"

[[energy.windows]]
hour = 9
level = "low"
"#;

const TASKS_JSON: &str = r#"[
    {"id": "t1", "title": "Write intro", "task_type": "writing", "estimated_duration": 60},
    {"id": "t2", "title": "Old review", "task_type": "review", "estimated_duration": 30,
     "completed_duration": 45, "completion_ratio": 1.0}
]"#;

const NOW: &str = "2026-03-01T20:00:00Z";

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pattern.json"), PATTERN_JSON).unwrap();
        std::fs::write(dir.path().join("pattern.toml"), PATTERN_TOML).unwrap();
        std::fs::write(dir.path().join("tasks.json"), TASKS_JSON).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn home(&self) -> &Path {
        self.dir.path()
    }

    /// `--pattern/--tasks/--config/--now` for the planning commands.
    fn inputs(&self, pattern: &str) -> Vec<String> {
        vec![
            "--pattern".into(),
            self.path(pattern).display().to_string(),
            "--tasks".into(),
            self.path("tasks.json").display().to_string(),
            "--config".into(),
            self.path("config.toml").display().to_string(),
            "--now".into(),
            NOW.into(),
        ]
    }
}

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(home: &Path, args: &[String]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "slotplan-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env_remove("SLOTPLAN_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_plan_text() {
    let fx = Fixture::new();
    let mut cmd = args(&["plan", "--start", "2026-03-02", "--days", "1"]);
    cmd.extend(fx.inputs("pattern.json"));
    let (code, stdout, stderr) = run_cli(fx.home(), &cmd);
    assert_eq!(code, 0, "plan failed: {stderr}");
    assert!(stdout.contains("Schedule for 2026-03-02"));
    assert!(stdout.contains("09:00-10:30: Write intro"));
    assert!(!stdout.contains("Old review"));
}

#[test]
fn test_plan_json_keys_by_date() {
    let fx = Fixture::new();
    let mut cmd = args(&["plan", "--start", "2026-03-02", "--days", "2", "--json"]);
    cmd.extend(fx.inputs("pattern.json"));
    let (code, stdout, _) = run_cli(fx.home(), &cmd);
    assert_eq!(code, 0, "plan --json failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let obj = parsed.as_object().unwrap();
    assert!(obj.contains_key("2026-03-02"));
    assert!(obj.contains_key("2026-03-03"));
    assert_eq!(parsed["2026-03-02"]["blocks"][0]["task"]["id"], "t1");
}

#[test]
fn test_plan_with_toml_pattern() {
    let fx = Fixture::new();
    let mut cmd = args(&["plan", "--start", "2026-03-02", "--days", "1"]);
    cmd.extend(fx.inputs("pattern.toml"));
    let (code, stdout, _) = run_cli(fx.home(), &cmd);
    assert_eq!(code, 0, "plan with TOML pattern failed");
    assert!(stdout.contains("Write intro"));
}

#[test]
fn test_export_text() {
    let fx = Fixture::new();
    let mut cmd = args(&["export", "--date", "2026-03-02", "--format", "text"]);
    cmd.extend(fx.inputs("pattern.json"));
    let (code, stdout, _) = run_cli(fx.home(), &cmd);
    assert_eq!(code, 0, "export failed");
    assert!(stdout.contains("Total work time: 90min"));
    assert!(stdout.contains("  Type: writing"));
}

#[test]
fn test_export_rejects_unknown_format() {
    let fx = Fixture::new();
    let mut cmd = args(&["export", "--date", "2026-03-02", "--format", "pdf"]);
    cmd.extend(fx.inputs("pattern.json"));
    let (code, _, stderr) = run_cli(fx.home(), &cmd);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: Unsupported export format: pdf"));
}

#[test]
fn test_suggest_json() {
    let fx = Fixture::new();
    let mut cmd = args(&["suggest", "--date", "2026-03-02", "--json"]);
    cmd.extend(fx.inputs("pattern.json"));
    let (code, stdout, _) = run_cli(fx.home(), &cmd);
    assert_eq!(code, 0, "suggest failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed.is_array());
}

#[test]
fn test_insights_counts_completed() {
    let fx = Fixture::new();
    let mut cmd = args(&["insights", "--json"]);
    cmd.extend(fx.inputs("pattern.json"));
    let (code, stdout, _) = run_cli(fx.home(), &cmd);
    assert_eq!(code, 0, "insights failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["total_completed_tasks"], 1);
    assert_eq!(parsed["task_type_performance"]["review"], 1.5);
}

#[test]
fn test_missing_pattern_file_fails() {
    let fx = Fixture::new();
    let mut cmd = args(&["plan"]);
    cmd.extend(fx.inputs("nope.json"));
    let (code, _, stderr) = run_cli(fx.home(), &cmd);
    assert_eq!(code, 1);
    assert!(stderr.contains("cannot read pattern file"));
}

#[test]
fn test_energy_default_curve() {
    let fx = Fixture::new();
    let (code, stdout, _) = run_cli(fx.home(), &args(&["energy", "--from", "9", "--to", "12"]));
    assert_eq!(code, 0, "energy failed");
    assert!(stdout.contains("10:00"));
    assert!(stdout.contains("PEAK"));
    assert!(stdout.contains("Peak hours: 10:00, 11:00"));
}

#[test]
fn test_config_set_get_reset() {
    let fx = Fixture::new();
    let home = fx.home();

    let (code, stdout, _) = run_cli(home, &args(&["config", "get", "optimizer.min_task_block_minutes"]));
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "30");

    let (code, _, _) = run_cli(home, &args(&["config", "set", "optimizer.min_task_block_minutes", "45"]));
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home, &args(&["config", "get", "optimizer.min_task_block_minutes"]));
    assert_eq!(stdout.trim(), "45");
    assert!(home.join(".config/slotplan/config.toml").exists());

    let (code, _, _) = run_cli(home, &args(&["config", "reset"]));
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home, &args(&["config", "get", "optimizer.min_task_block_minutes"]));
    assert_eq!(stdout.trim(), "30");
}

#[test]
fn test_config_rejects_unknown_key() {
    let fx = Fixture::new();
    let (code, _, stderr) = run_cli(fx.home(), &args(&["config", "set", "optimizer.bogus", "1"]));
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key: optimizer.bogus"));

    let (code, _, stderr) = run_cli(fx.home(), &args(&["config", "get", "optimizer.bogus"]));
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key: optimizer.bogus"));
}

#[test]
fn test_config_list() {
    let fx = Fixture::new();
    let (code, stdout, _) = run_cli(fx.home(), &args(&["config", "list"]));
    assert_eq!(code, 0);
    assert!(stdout.contains("optimizer.deadline_urgency_weight = 2.0"));
}
