#![forbid(unsafe_code)]

use std::path::PathBuf;

pub(crate) const LOG_DIR_ENV: &str = "FEATURE_LOOKUP_LOG_DIR";
const LOG_DIRNAME: &str = "feature_lookup";

/// Where diagnostics files go. `None` disables them.
pub(crate) fn parse_log_dir() -> Option<PathBuf> {
    resolve_log_dir(
        std::env::var(LOG_DIR_ENV).ok(),
        std::env::var("XDG_RUNTIME_DIR").ok(),
    )
}

fn resolve_log_dir(explicit: Option<String>, runtime_dir: Option<String>) -> Option<PathBuf> {
    if let Some(raw) = explicit {
        let raw = raw.trim();
        if matches!(raw, "off" | "0" | "false" | "none") {
            return None;
        }
        if !raw.is_empty() {
            return Some(PathBuf::from(raw));
        }
    }
    let base = runtime_dir
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .unwrap_or_else(std::env::temp_dir);
    Some(base.join(LOG_DIRNAME))
}
