#![forbid(unsafe_code)]

use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const ENV_KEYS: &[&str] = &[
    "FEATURE_LOOKUP_DB",
    "FEATURE_LOOKUP_ID",
    "FEATURE_LOOKUP_FIELDS",
    "FEATURE_LOOKUP_FORMAT",
    "FEATURE_LOOKUP_LABELS",
    "FEATURE_LOOKUP_TABLE",
    "FEATURE_LOOKUP_BUSY_TIMEOUT_MS",
    "FEATURE_LOOKUP_LOG_DIR",
    "PROJECT_DIR",
];

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("fl_cli_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn seed_features_db(dir: &Path) -> PathBuf {
    let db_path = dir.join("features.db");
    let conn = Connection::open(&db_path).expect("fixture db must open");
    conn.execute_batch(
        r#"
        CREATE TABLE features (
          id INTEGER PRIMARY KEY,
          priority INTEGER,
          category TEXT,
          name TEXT,
          description TEXT,
          steps TEXT,
          passes BOOLEAN,
          in_progress BOOLEAN
        );
        "#,
    )
    .expect("fixture schema must install");
    conn.execute(
        "INSERT INTO features(id, priority, category, name, description, steps, passes, in_progress) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![30, "high", "core", "Widget", "desc", "step1;step2", 0, 0],
    )
    .expect("row 30 must insert");
    conn.execute(
        "INSERT INTO features(id, priority, category, name, description, steps, passes, in_progress) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            242,
            7,
            "ui",
            "Upload panel",
            "Dropzone on client page",
            r#"["open page","drop file"]"#,
            1,
            0
        ],
    )
    .expect("row 242 must insert");
    db_path
}

/// Runs the binary with a clean environment; diagnostics go to `<dir>/logs`.
fn run(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_feature_lookup"));
    cmd.args(args).current_dir(dir);
    for key in ENV_KEYS {
        cmd.env_remove(key);
    }
    cmd.env("FEATURE_LOOKUP_LOG_DIR", dir.join("logs"));
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().expect("run feature_lookup")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn found_record_prints_one_line_per_requested_field() {
    let dir = temp_dir("found");
    seed_features_db(&dir);

    let output = run(
        &dir,
        &["30", "--fields", "id,priority,category,name,description,steps"],
        &[],
    );
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "id: 30\npriority: high\ncategory: core\nname: Widget\ndescription: desc\nsteps: step1;step2\n"
    );
}

#[test]
fn missing_record_prints_absence_line_and_exits_zero() {
    let dir = temp_dir("not-found");
    seed_features_db(&dir);

    let output = run(&dir, &["--id", "9999"], &[]);
    assert_eq!(output.status.code(), Some(0), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output), "Feature #9999 not found\n");

    let session = std::fs::read_to_string(dir.join("logs").join("feature_lookup_last_session.txt"))
        .expect("session log must be written");
    assert!(session.contains("id=9999\n"));
    assert!(session.contains("outcome=not_found\n"));
}

#[test]
fn json_output_is_key_ordered_and_typed() {
    let dir = temp_dir("json");
    seed_features_db(&dir);

    let output = run(
        &dir,
        &[
            "242",
            "--format",
            "json",
            "--fields",
            "id,category,name,description,steps,passes,in_progress",
        ],
        &[],
    );
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(
        stdout(&output),
        r#"{
  "id": 242,
  "category": "ui",
  "name": "Upload panel",
  "description": "Dropzone on client page",
  "steps": [
    "open page",
    "drop file"
  ],
  "passes": true,
  "in_progress": false
}
"#
    );
}

#[test]
fn title_labels_and_yaml() {
    let dir = temp_dir("labels");
    seed_features_db(&dir);

    let titled = run(&dir, &["30", "--fields", "id,priority,in_progress", "--labels", "title"], &[]);
    assert!(titled.status.success(), "stderr={}", stderr(&titled));
    assert_eq!(stdout(&titled), "ID: 30\nPriority: high\nIn Progress: false\n");

    let yaml = run(&dir, &["30", "--fields", "name,category", "--format", "yaml"], &[]);
    assert!(yaml.status.success(), "stderr={}", stderr(&yaml));
    assert_eq!(stdout(&yaml), "name: Widget\ncategory: core\n");
}

#[test]
fn configuration_comes_from_environment_without_flags() {
    let dir = temp_dir("env-config");
    let project = dir.join("project");
    std::fs::create_dir_all(&project).expect("create project dir");
    seed_features_db(&project);
    let project_str = project.to_string_lossy().to_string();

    let output = run(
        &dir,
        &[],
        &[
            ("PROJECT_DIR", project_str.as_str()),
            ("FEATURE_LOOKUP_ID", "242"),
            ("FEATURE_LOOKUP_FIELDS", "name,passes"),
        ],
    );
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output), "name: Upload panel\npasses: true\n");
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = temp_dir("idempotent");
    seed_features_db(&dir);

    let first = run(&dir, &["242", "--format", "json"], &[]);
    let second = run(&dir, &["242", "--format", "json"], &[]);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn unknown_field_fails_before_the_store_is_opened() {
    let dir = temp_dir("schema-mismatch");
    // No database exists here: the failure must come from field validation alone.
    let output = run(&dir, &["30", "--fields", "id,owner"], &[]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert!(err.starts_with("error[SCHEMA_MISMATCH]"), "stderr={err}");
    assert!(err.contains("owner"));
}

#[test]
fn store_missing_a_column_is_schema_mismatch() {
    let dir = temp_dir("legacy-store");
    let conn = Connection::open(dir.join("features.db")).expect("db must open");
    conn.execute_batch(
        "CREATE TABLE features (id INTEGER PRIMARY KEY, name TEXT);\
         INSERT INTO features(id, name) VALUES (1, 'x');",
    )
    .expect("schema must install");
    drop(conn);

    let output = run(&dir, &["1", "--fields", "id,name,priority"], &[]);
    assert_eq!(output.status.code(), Some(4), "stderr={}", stderr(&output));
    assert!(stderr(&output).contains("priority"));
}

#[test]
fn missing_store_is_source_unavailable() {
    let dir = temp_dir("missing-store");

    let output = run(&dir, &["30", "--db", "absent.db"], &[]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).starts_with("error[SOURCE_UNAVAILABLE]"));
    assert!(!dir.join("absent.db").exists(), "lookup must never create the store");

    let session = std::fs::read_to_string(dir.join("logs").join("feature_lookup_last_session.txt"))
        .expect("session log must be written");
    assert!(session.contains("outcome=error:SOURCE_UNAVAILABLE\n"));
}

#[test]
fn missing_id_is_a_usage_error() {
    let dir = temp_dir("no-id");
    seed_features_db(&dir);

    let output = run(&dir, &[], &[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("missing feature id"));
}

#[test]
fn list_fields_prints_the_catalog() {
    let dir = temp_dir("list-fields");

    let output = run(&dir, &["--list-fields"], &[]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert_eq!(text.lines().count(), 8);
    assert!(text.contains("steps\tjson\n"));
}

#[test]
fn null_columns_render_as_null() {
    let dir = temp_dir("null-column");
    let db_path = seed_features_db(&dir);
    let conn = Connection::open(&db_path).expect("db must open");
    conn.execute(
        "INSERT INTO features(id, priority, category, name, description, steps, passes, in_progress) \
         VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, ?7)",
        params![77, 1, "core", "Draft", "[]", 0, 0],
    )
    .expect("row 77 must insert");
    drop(conn);

    let lines = run(&dir, &["77", "--fields", "id,name,description"], &[]);
    assert!(lines.status.success(), "stderr={}", stderr(&lines));
    assert_eq!(stdout(&lines), "id: 77\nname: Draft\ndescription: null\n");

    let json = run(&dir, &["77", "--fields", "description,steps", "--format", "json"], &[]);
    assert!(json.status.success(), "stderr={}", stderr(&json));
    assert_eq!(stdout(&json), "{\n  \"description\": null,\n  \"steps\": []\n}\n");
}

#[test]
fn unknown_field_message_does_not_name_the_default_table() {
    let dir = temp_dir("unknown-field-table");

    let output = run(&dir, &["30", "--table", "archive", "--fields", "id,owner"], &[]);
    assert_eq!(output.status.code(), Some(4));
    let err = stderr(&output);
    assert!(err.contains("unknown field `owner`"), "stderr={err}");
    assert!(!err.contains("features"), "stderr={err}");
}
