#![forbid(unsafe_code)]

mod config;
mod error;
mod render;
mod support;

use config::{Command, LookupConfig};
use error::CliError;
use fl_storage::{LookupRequest, StoreOptions};
use std::fmt::Write as _;
use std::io::Write as _;
use std::process::ExitCode;
use support::SessionLog;

const BIN_NAME: &str = "feature_lookup";
const CRASH_FILE: &str = "feature_lookup_last_crash.txt";

fn usage() -> &'static str {
    "feature_lookup: print one row of a features database by id\n\n\
USAGE:\n\
  feature_lookup [N] [--id N] [--db PATH] [--fields LIST]\n\
                 [--format lines|json|yaml] [--labels field|title]\n\
                 [--table NAME] [--busy-timeout-ms MS]\n\
  feature_lookup --list-fields [--format lines|json|yaml]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version/build and exit\n\
\n\
ENVIRONMENT:\n\
  FEATURE_LOOKUP_DB, FEATURE_LOOKUP_ID, FEATURE_LOOKUP_FIELDS,\n\
  FEATURE_LOOKUP_FORMAT, FEATURE_LOOKUP_LABELS, FEATURE_LOOKUP_TABLE,\n\
  FEATURE_LOOKUP_BUSY_TIMEOUT_MS, FEATURE_LOOKUP_LOG_DIR (off to disable)\n\
  PROJECT_DIR      Store defaults to $PROJECT_DIR/features.db\n\
\n\
EXIT CODES:\n\
  0 found or not found, 2 usage, 3 store unavailable, 4 schema mismatch,\n\
  5 timed out on a lock, 1 anything else\n"
}

fn version_line() -> String {
    format!(
        "{BIN_NAME} {} build={}",
        env!("CARGO_PKG_VERSION"),
        support::build_fingerprint()
    )
}

fn write_last_crash(log_dir: &std::path::Path, detail: &str) {
    let _ = std::fs::create_dir_all(log_dir);
    let mut out = String::new();
    let _ = writeln!(out, "ts={}", support::now_rfc3339());
    let _ = writeln!(out, "pid={}", std::process::id());
    let _ = writeln!(out, "build={}", support::build_fingerprint());
    let _ = writeln!(out, "args={:?}", std::env::args().collect::<Vec<_>>());
    let _ = writeln!(out, "detail={detail}");
    let _ = std::fs::write(log_dir.join(CRASH_FILE), out);
}

fn install_crash_reporter(log_dir: std::path::PathBuf) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let mut detail = info.to_string();
        let backtrace = std::backtrace::Backtrace::force_capture();
        let _ = write!(&mut detail, "\nbacktrace:\n{backtrace}");
        write_last_crash(&log_dir, &detail);
        default_hook(info);
    }));
}

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let log_dir = support::parse_log_dir();
    if let Some(dir) = &log_dir {
        install_crash_reporter(dir.clone());
    }
    let mut session = SessionLog::new(log_dir.as_deref(), &args);

    match run(&args, &mut session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            session.note_error(err.code(), &err.to_string());
            eprintln!("error[{}]: {err}", err.code());
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(args: &[String], session: &mut SessionLog) -> Result<(), CliError> {
    let cwd = std::env::current_dir().map_err(|err| {
        CliError::Usage(format!("cannot resolve current directory: {err}"))
    })?;
    match config::parse_args(args, config::env_var, &cwd)? {
        Command::Help => emit(usage()),
        Command::Version => emit(&format!("{}\n", version_line())),
        Command::ListFields { format } => emit(&render::render_catalog(format)?),
        Command::Lookup(cfg) => run_lookup(&cfg, session),
    }
}

fn run_lookup(cfg: &LookupConfig, session: &mut SessionLog) -> Result<(), CliError> {
    session.note_request(&cfg.db_path, cfg.id.get());

    let request = LookupRequest::new(cfg.id, cfg.projection.clone()).with_table(&cfg.table);
    let options = StoreOptions {
        busy_timeout: cfg.busy_timeout,
    };
    let record = fl_storage::lookup(&cfg.db_path, &request, &options)?;

    let rendered = render::render_lookup(record.as_ref(), cfg.id, cfg.format, cfg.labels)?;
    emit(&rendered)?;
    session.note_outcome(if record.is_some() { "found" } else { "not_found" });
    Ok(())
}

fn emit(text: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes()).map_err(CliError::Output)?;
    stdout.flush().map_err(CliError::Output)
}
