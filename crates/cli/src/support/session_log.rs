#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

pub(crate) const SESSION_LOG_FILE: &str = "feature_lookup_last_session.txt";

/// Bounded `key=value` record of the last invocation. Never written to stdout or stderr.
#[derive(Clone, Debug)]
pub(crate) struct SessionLog {
    path: Option<PathBuf>,
    start_rfc3339: String,
    pid: u32,
    build: String,
    cwd: String,
    args: Vec<String>,
    db: Option<String>,
    id: Option<i64>,
    outcome: Option<String>,
    last_error: Option<String>,
}

impl SessionLog {
    pub(crate) fn new(log_dir: Option<&Path>, args: &[String]) -> Self {
        let cwd = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .to_string_lossy()
            .to_string();
        let this = Self {
            path: log_dir.map(|dir| dir.join(SESSION_LOG_FILE)),
            start_rfc3339: crate::support::now_rfc3339(),
            pid: std::process::id(),
            build: crate::support::build_fingerprint(),
            cwd,
            args: args.to_vec(),
            db: None,
            id: None,
            outcome: None,
            last_error: None,
        };
        this.flush();
        this
    }

    pub(crate) fn note_request(&mut self, db: &Path, id: i64) {
        self.db = Some(truncate(&db.to_string_lossy(), 240));
        self.id = Some(id);
        self.flush();
    }

    pub(crate) fn note_outcome(&mut self, outcome: &str) {
        self.outcome = Some(truncate(outcome.trim(), 64));
        self.flush();
    }

    pub(crate) fn note_error(&mut self, code: &str, error: &str) {
        let error = error.trim();
        if error.is_empty() {
            return;
        }
        self.outcome = Some(format!("error:{code}"));
        self.last_error = Some(truncate(error, 300));
        self.flush();
    }

    fn flush(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }

        let mut out = String::new();
        push_kv(&mut out, "ts_start", &self.start_rfc3339);
        push_kv(&mut out, "pid", &self.pid.to_string());
        push_kv(&mut out, "build", &self.build);
        push_kv(&mut out, "cwd", &self.cwd);
        push_kv(&mut out, "args", &format!("{:?}", self.args));
        if let Some(db) = &self.db {
            push_kv(&mut out, "db", db);
        }
        if let Some(id) = self.id {
            push_kv(&mut out, "id", &id.to_string());
        }
        if let Some(outcome) = &self.outcome {
            push_kv(&mut out, "outcome", outcome);
        }
        if let Some(err) = &self.last_error {
            push_kv(&mut out, "last_error", err);
        }

        let _ = std::fs::write(path, out);
    }
}

fn push_kv(out: &mut String, key: &str, value: &str) {
    use std::fmt::Write as _;
    let _ = writeln!(out, "{key}={value}");
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
