#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};
use tempfile::TempDir;

#[derive(Debug)]
pub struct BqRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
    pub duration: Duration,
    pub log_path: PathBuf,
}

pub struct BqWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub log_dir: PathBuf,
}

impl BqWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let log_dir = root.join("logs");
        fs::create_dir_all(&log_dir).expect("log dir");
        Self {
            temp_dir,
            root,
            log_dir,
        }
    }

    /// Write records as a JSON array and return the file name.
    pub fn write_records(&self, name: &str, records: &[Value]) -> String {
        let body = serde_json::to_string_pretty(records).expect("serialize records");
        self.write_file(name, &body);
        name.to_string()
    }

    pub fn write_file(&self, name: &str, body: &str) {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dir");
        }
        fs::write(path, body).expect("write file");
    }
}

pub fn run_bq<I, S>(workspace: &BqWorkspace, args: I, label: &str) -> BqRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_bq_with_env(
        workspace,
        args,
        std::iter::empty::<(String, String)>(),
        label,
    )
}

pub fn run_bq_with_env<I, S, E, K, V>(
    workspace: &BqWorkspace,
    args: I,
    env_vars: E,
    label: &str,
) -> BqRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bq"));
    cmd.current_dir(&workspace.root);
    cmd.args(args);
    cmd.env("NO_COLOR", "1");
    cmd.env("RUST_LOG", "bug_query=debug");
    cmd.env("RUST_BACKTRACE", "1");
    cmd.env("HOME", &workspace.root);
    cmd.envs(env_vars);

    let start = Instant::now();
    let output = cmd.output().expect("run bq");
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let log_path = workspace.log_dir.join(format!("{label}.log"));
    let timestamp = SystemTime::now();
    let log_body = format!(
        "label: {label}\nstarted: {:?}\nduration: {:?}\nstatus: {}\ncwd: {}\n\nstdout:\n{}\n\nstderr:\n{}\n",
        timestamp,
        duration,
        output.status,
        workspace.root.display(),
        stdout,
        stderr
    );
    fs::write(&log_path, log_body).expect("write log");

    BqRun {
        stdout,
        stderr,
        status: output.status,
        duration,
        log_path,
    }
}

/// Pull the JSON document out of output that may carry log lines before it.
pub fn extract_json_payload(output: &str) -> String {
    let lines: Vec<&str> = output.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            let tail: Vec<&str> = lines[idx..]
                .iter()
                .copied()
                .take_while(|line| !line.contains(" DEBUG ") && !line.contains(" WARN "))
                .collect();
            return tail.join("\n").trim().to_string();
        }
    }
    output.trim().to_string()
}

pub fn parse_json(output: &str) -> Value {
    let payload = extract_json_payload(output);
    serde_json::from_str(&payload).unwrap_or_else(|err| panic!("invalid JSON ({err}): {payload}"))
}
