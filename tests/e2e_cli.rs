//! E2E tests for the `bq` binary.
//!
//! Runs list, search, count and fields against record exports written into a
//! temporary workspace, and checks config precedence and structured errors.

mod common;

use assert_cmd::Command;
use common::cli::{BqWorkspace, parse_json, run_bq, run_bq_with_env};
use common::fixtures::{RecordBuilder, sample_export};
use predicates::prelude::*;
use serde_json::Value;

fn workspace_with_sample() -> (BqWorkspace, String) {
    let workspace = BqWorkspace::new();
    let file = workspace.write_records("bugs.json", &sample_export());
    (workspace, file)
}

fn record_ids(json: &Value) -> Vec<String> {
    json["records"]
        .as_array()
        .expect("records array")
        .iter()
        .map(|record| record["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

// ============================================================================
// list
// ============================================================================

#[test]
fn e2e_list_text_default_sort() {
    let _log = common::test_log("e2e_list_text_default_sort");
    let (workspace, file) = workspace_with_sample();

    let list = run_bq(&workspace, ["list", file.as_str()], "list_text");
    assert!(list.status.success(), "list failed: {}", list.stderr);
    assert!(list.stdout.contains("BUG-1 [Open] [High] [Bug] Login fails on Safari @Alice Moreau"));
    assert!(list.stdout.contains("5 record(s)"));

    // Assignee descending: "Carol, Alice Moreau" first, unassigned records last.
    let lines: Vec<&str> = list.stdout.lines().collect();
    assert!(lines[0].starts_with("BUG-3 "), "unexpected first line: {}", lines[0]);
    assert!(lines[1].starts_with("BUG-2 "), "unexpected second line: {}", lines[1]);
    assert!(lines[3].starts_with("BUG-4 "), "unexpected fourth line: {}", lines[3]);
}

#[test]
fn e2e_list_json_filters_and_sort() {
    let _log = common::test_log("e2e_list_json_filters_and_sort");
    let (workspace, file) = workspace_with_sample();

    let list = run_bq(
        &workspace,
        [
            "list",
            file.as_str(),
            "--filter",
            "Status=open",
            "--sort",
            "id",
            "--json",
        ],
        "list_bad_sort",
    );
    assert!(!list.status.success(), "unknown sort field should fail");

    let list = run_bq(
        &workspace,
        [
            "list",
            file.as_str(),
            "--filter",
            "Status=open",
            "--sort",
            "title",
            "--json",
        ],
        "list_unknown_title_sort",
    );
    assert!(!list.status.success());

    let list = run_bq(
        &workspace,
        [
            "list",
            file.as_str(),
            "--filter",
            "Status=open",
            "--sort",
            "status",
            "--asc",
            "--json",
        ],
        "list_json",
    );
    assert!(list.status.success(), "list failed: {}", list.stderr);
    let json = parse_json(&list.stdout);
    assert_eq!(json["total"], 2);
    let mut ids = record_ids(&json);
    ids.sort();
    assert_eq!(ids, vec!["BUG-1", "BUG-4"]);
    assert_eq!(json["query"]["sortField"], "Status");
    assert_eq!(json["query"]["sortDirection"], "ascending");
    assert!(json.get("groups").is_none());
}

#[test]
fn e2e_list_or_filter_is_still_required() {
    let _log = common::test_log("e2e_list_or_filter_is_still_required");
    let (workspace, file) = workspace_with_sample();

    let list = run_bq(
        &workspace,
        [
            "list",
            file.as_str(),
            "--filter",
            "Status=open",
            "--or-filter",
            "Priority=Low",
            "--json",
        ],
        "list_or",
    );
    assert!(list.status.success(), "list failed: {}", list.stderr);
    let json = parse_json(&list.stdout);
    assert_eq!(json["total"], 0);
    assert_eq!(json["query"]["clauses"][1]["combinator"], "OR");
}

#[test]
fn e2e_list_grouped_with_limit() {
    let _log = common::test_log("e2e_list_grouped_with_limit");
    let (workspace, file) = workspace_with_sample();

    let list = run_bq(
        &workspace,
        ["list", file.as_str(), "--group", "--limit", "3", "--format", "json"],
        "list_grouped",
    );
    assert!(list.status.success(), "list failed: {}", list.stderr);
    let json = parse_json(&list.stdout);
    assert_eq!(json["total"], 5);
    assert_eq!(record_ids(&json).len(), 3);
    let groups = json["groups"].as_array().expect("groups");
    let grouped: u64 = groups.iter().filter_map(|group| group["count"].as_u64()).sum();
    assert_eq!(grouped, 3);
}

#[test]
fn e2e_list_date_filter_accepts_rfc3339() {
    let _log = common::test_log("e2e_list_date_filter_accepts_rfc3339");
    let (workspace, file) = workspace_with_sample();

    let list = run_bq(
        &workspace,
        [
            "list",
            file.as_str(),
            "--filter",
            "Due date=2024-05-01T09:30:00Z",
            "--json",
        ],
        "list_due",
    );
    assert!(list.status.success(), "list failed: {}", list.stderr);
    let json = parse_json(&list.stdout);
    assert_eq!(json["query"]["clauses"][0]["value"], "2024-05-01");
    // Records without a due date pass date clauses.
    assert_eq!(json["total"], 5);
}

#[test]
fn e2e_list_reads_jsonl_from_stdin() {
    let _log = common::test_log("e2e_list_reads_jsonl_from_stdin");
    let workspace = BqWorkspace::new();
    let lines = [
        RecordBuilder::new("s-1").status("Open").value(),
        RecordBuilder::new("s-2").status("Closed").value(),
    ]
    .iter()
    .map(Value::to_string)
    .collect::<Vec<_>>()
    .join("\n");

    Command::new(assert_cmd::cargo::cargo_bin!("bq"))
        .current_dir(&workspace.root)
        .env("HOME", &workspace.root)
        .env("NO_COLOR", "1")
        .args(["list", "-", "--filter", "Status=closed"])
        .write_stdin(lines)
        .assert()
        .success()
        .stdout(predicate::str::contains("s-2 [Closed]"))
        .stdout(predicate::str::contains("s-1").not());
}

// ============================================================================
// search
// ============================================================================

#[test]
fn e2e_search_groups_by_default() {
    let _log = common::test_log("e2e_search_groups_by_default");
    let (workspace, file) = workspace_with_sample();

    let search = run_bq(&workspace, ["search", file.as_str(), "frontend"], "search_text");
    assert!(search.status.success(), "search failed: {}", search.stderr);
    assert!(search.stdout.starts_with("Found 2 record(s) matching 'frontend'"));
    assert!(search.stdout.contains("Carol, Alice Moreau (1)"));
    assert!(search.stdout.contains("Alice Moreau (1)"));

    let search = run_bq(
        &workspace,
        ["search", file.as_str(), "frontend", "--no-group", "--json"],
        "search_flat",
    );
    let json = parse_json(&search.stdout);
    assert!(json.get("groups").is_none());
    assert_eq!(json["query"]["searchText"], "frontend");
}

#[test]
fn e2e_search_group_default_from_project_config() {
    let _log = common::test_log("e2e_search_group_default_from_project_config");
    let (workspace, file) = workspace_with_sample();
    workspace.write_file(".bq/config.yaml", "search:\n  group: false\n");

    let search = run_bq(
        &workspace,
        ["search", file.as_str(), "safari", "--json"],
        "search_config",
    );
    assert!(search.status.success(), "search failed: {}", search.stderr);
    let json = parse_json(&search.stdout);
    assert!(json.get("groups").is_none());
    assert_eq!(record_ids(&json), vec!["BUG-1"]);
}

// ============================================================================
// count / fields
// ============================================================================

#[test]
fn e2e_count_by_field() {
    let _log = common::test_log("e2e_count_by_field");
    let (workspace, file) = workspace_with_sample();

    let count = run_bq(&workspace, ["count", file.as_str()], "count_total");
    assert!(count.status.success(), "count failed: {}", count.stderr);
    assert_eq!(count.stdout.trim(), "5");

    let count = run_bq(
        &workspace,
        ["count", file.as_str(), "--by", "priority", "--json"],
        "count_by",
    );
    assert!(count.status.success(), "count failed: {}", count.stderr);
    let json = parse_json(&count.stdout);
    assert_eq!(json["total"], 5);
    assert_eq!(json["by"], "Priority");
    let groups = json["groups"].as_array().expect("groups");
    assert!(
        groups
            .iter()
            .any(|group| group["group"] == "High" && group["count"] == 2)
    );
    assert!(
        groups
            .iter()
            .any(|group| group["group"] == "No Priority" && group["count"] == 1)
    );
}

#[test]
fn e2e_fields_lists_known_fields() {
    let _log = common::test_log("e2e_fields_lists_known_fields");
    let workspace = BqWorkspace::new();

    let fields = run_bq(&workspace, ["fields", "--json"], "fields_json");
    assert!(fields.status.success(), "fields failed: {}", fields.stderr);
    let json = parse_json(&fields.stdout);
    let names: Vec<&str> = json
        .as_array()
        .expect("fields array")
        .iter()
        .filter_map(|field| field["name"].as_str())
        .collect();
    assert_eq!(names.len(), 9);
    assert!(names.contains(&"Due date"));
    assert!(names.contains(&"Created by"));
}

// ============================================================================
// config precedence
// ============================================================================

#[test]
fn e2e_config_precedence_env_over_project() {
    let _log = common::test_log("e2e_config_precedence_env_over_project");
    let (workspace, file) = workspace_with_sample();
    workspace.write_file(
        ".bq/config.yaml",
        "sort:\n  field: Status\n  direction: ascending\n",
    );

    let list = run_bq(&workspace, ["list", file.as_str(), "--json"], "config_project");
    let json = parse_json(&list.stdout);
    assert_eq!(json["query"]["sortField"], "Status");
    assert_eq!(json["query"]["sortDirection"], "ascending");

    let list = run_bq_with_env(
        &workspace,
        ["list", file.as_str(), "--json"],
        [("BQ_SORT_FIELD", "Priority")],
        "config_env",
    );
    let json = parse_json(&list.stdout);
    assert_eq!(json["query"]["sortField"], "Priority");
    assert_eq!(json["query"]["sortDirection"], "ascending");

    let list = run_bq_with_env(
        &workspace,
        ["list", file.as_str(), "--sort", "tags", "--desc", "--json"],
        [("BQ_SORT_FIELD", "Priority")],
        "config_cli",
    );
    let json = parse_json(&list.stdout);
    assert_eq!(json["query"]["sortField"], "Tags");
    assert_eq!(json["query"]["sortDirection"], "descending");
}

#[test]
fn e2e_explicit_config_file_overrides_project() {
    let _log = common::test_log("e2e_explicit_config_file_overrides_project");
    let (workspace, file) = workspace_with_sample();
    workspace.write_file(".bq/config.yaml", "sort:\n  field: Status\n");
    workspace.write_file("team.yaml", "sort:\n  field: Created by\n");

    let list = run_bq(
        &workspace,
        ["list", file.as_str(), "--config", "team.yaml", "--json"],
        "config_explicit",
    );
    assert!(list.status.success(), "list failed: {}", list.stderr);
    let json = parse_json(&list.stdout);
    assert_eq!(json["query"]["sortField"], "Created by");
}

// ============================================================================
// errors
// ============================================================================

#[test]
fn e2e_unknown_field_is_structured_error() {
    let _log = common::test_log("e2e_unknown_field_is_structured_error");
    let (workspace, file) = workspace_with_sample();

    let list = run_bq(
        &workspace,
        ["list", file.as_str(), "--filter", "Severity=high", "--json"],
        "error_unknown_field",
    );
    assert_eq!(list.status.code(), Some(4));
    let json = parse_json(&list.stderr);
    assert_eq!(json["error"]["code"], "UNKNOWN_FIELD");
    assert_eq!(json["error"]["hint"], "Run: bq fields");
}

#[test]
fn e2e_missing_records_file() {
    let _log = common::test_log("e2e_missing_records_file");
    let workspace = BqWorkspace::new();

    Command::new(assert_cmd::cargo::cargo_bin!("bq"))
        .current_dir(&workspace.root)
        .env("HOME", &workspace.root)
        .args(["list", "nope.json", "--json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("RECORDS_NOT_FOUND"));
}

#[test]
fn e2e_missing_explicit_config() {
    let _log = common::test_log("e2e_missing_explicit_config");
    let (workspace, file) = workspace_with_sample();

    let list = run_bq(
        &workspace,
        ["list", file.as_str(), "--config", "missing.yaml", "--json"],
        "error_config",
    );
    assert_eq!(list.status.code(), Some(7));
    let json = parse_json(&list.stderr);
    assert_eq!(json["error"]["code"], "CONFIG_ERROR");
}

#[test]
fn e2e_bad_date_clause() {
    let _log = common::test_log("e2e_bad_date_clause");
    let (workspace, file) = workspace_with_sample();

    let list = run_bq(
        &workspace,
        ["list", file.as_str(), "--filter", "Date closed=+2h", "--json"],
        "error_date",
    );
    assert_eq!(list.status.code(), Some(4));
    let json = parse_json(&list.stderr);
    assert_eq!(json["error"]["code"], "INVALID_DATE");
}
