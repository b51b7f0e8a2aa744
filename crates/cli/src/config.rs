#![forbid(unsafe_code)]

use crate::error::CliError;
use crate::render::{LabelStyle, OutputFormat};
use fl_core::Projection;
use fl_core::ids::FeatureId;
use fl_storage::{DEFAULT_BUSY_TIMEOUT, DEFAULT_TABLE, StoreError, checked_table_name};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub(crate) const DEFAULT_DB_FILE: &str = "features.db";

pub(crate) const ENV_DB: &str = "FEATURE_LOOKUP_DB";
pub(crate) const ENV_ID: &str = "FEATURE_LOOKUP_ID";
pub(crate) const ENV_FIELDS: &str = "FEATURE_LOOKUP_FIELDS";
pub(crate) const ENV_FORMAT: &str = "FEATURE_LOOKUP_FORMAT";
pub(crate) const ENV_LABELS: &str = "FEATURE_LOOKUP_LABELS";
pub(crate) const ENV_TABLE: &str = "FEATURE_LOOKUP_TABLE";
pub(crate) const ENV_BUSY_TIMEOUT_MS: &str = "FEATURE_LOOKUP_BUSY_TIMEOUT_MS";
pub(crate) const ENV_PROJECT_DIR: &str = "PROJECT_DIR";

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Version,
    ListFields { format: OutputFormat },
    Lookup(LookupConfig),
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LookupConfig {
    pub(crate) db_path: PathBuf,
    pub(crate) id: FeatureId,
    pub(crate) projection: Projection,
    pub(crate) format: OutputFormat,
    pub(crate) labels: LabelStyle,
    pub(crate) table: String,
    pub(crate) busy_timeout: Duration,
}

pub(crate) fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|v| {
        let v = v.trim();
        if v.is_empty() { None } else { Some(v.to_string()) }
    })
}

/// Flags win over environment variables, which win over defaults. Everything is validated
/// here, before the store is touched.
pub(crate) fn parse_args(
    args: &[String],
    env: impl Fn(&str) -> Option<String>,
    cwd: &Path,
) -> Result<Command, CliError> {
    if args.iter().any(|a| a == "-h" || a == "--help") {
        return Ok(Command::Help);
    }
    if args.iter().any(|a| a == "-V" || a == "--version") {
        return Ok(Command::Version);
    }

    let mut db_path: Option<PathBuf> = env(ENV_DB).map(PathBuf::from);
    let mut id_raw: Option<String> = env(ENV_ID);
    let mut fields_raw: Option<String> = env(ENV_FIELDS);
    let mut format_raw: Option<String> = env(ENV_FORMAT);
    let mut labels_raw: Option<String> = env(ENV_LABELS);
    let mut table: String = env(ENV_TABLE).unwrap_or_else(|| DEFAULT_TABLE.to_string());
    let mut busy_raw: Option<String> = env(ENV_BUSY_TIMEOUT_MS);
    let mut list_fields = false;
    let mut id_from_args = false;

    let mut i = 0usize;
    while i < args.len() {
        let a = args[i].as_str();
        match a {
            "--db" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| usage("--db requires PATH"))?;
                db_path = Some(PathBuf::from(v));
            }
            "--id" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| usage("--id requires N"))?;
                if id_from_args {
                    return Err(usage("feature id given more than once"));
                }
                id_raw = Some(v.to_string());
                id_from_args = true;
            }
            "--fields" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| usage("--fields requires LIST"))?;
                fields_raw = Some(v.to_string());
            }
            "--format" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| usage("--format requires lines|json|yaml"))?;
                format_raw = Some(v.to_string());
            }
            "--labels" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| usage("--labels requires field|title"))?;
                labels_raw = Some(v.to_string());
            }
            "--table" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| usage("--table requires NAME"))?;
                table = v.to_string();
            }
            "--busy-timeout-ms" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| usage("--busy-timeout-ms requires MS"))?;
                busy_raw = Some(v.to_string());
            }
            "--list-fields" => {
                list_fields = true;
            }
            other if other.starts_with('-') => {
                return Err(usage(&format!("unknown flag: {other}")));
            }
            other => {
                if id_from_args {
                    return Err(usage(&format!("unexpected argument: {other}")));
                }
                id_raw = Some(other.to_string());
                id_from_args = true;
            }
        }
        i += 1;
    }

    let format = match format_raw {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| usage(&format!("unknown format: {raw} (expected lines|json|yaml)")))?,
        None => OutputFormat::Lines,
    };
    if list_fields {
        return Ok(Command::ListFields { format });
    }

    let labels = match labels_raw {
        Some(raw) => LabelStyle::parse(&raw)
            .ok_or_else(|| usage(&format!("unknown label style: {raw} (expected field|title)")))?,
        None => LabelStyle::Field,
    };

    let projection = match fields_raw {
        Some(raw) => Projection::parse(&raw).map_err(StoreError::from)?,
        None => Projection::all(),
    };

    checked_table_name(&table)?;

    let busy_timeout = match busy_raw {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| usage("--busy-timeout-ms must be an integer (milliseconds)"))?,
        None => DEFAULT_BUSY_TIMEOUT,
    };

    let id_raw = id_raw.ok_or_else(|| {
        usage("missing feature id (pass N, --id N, or set FEATURE_LOOKUP_ID)")
    })?;
    let id = FeatureId::parse(&id_raw)
        .map_err(|err| usage(&format!("invalid feature id `{id_raw}`: {err}")))?;

    let db_path = db_path.unwrap_or_else(|| match env(ENV_PROJECT_DIR) {
        Some(dir) => PathBuf::from(dir).join(DEFAULT_DB_FILE),
        None => PathBuf::from(DEFAULT_DB_FILE),
    });
    let db_path = if db_path.is_absolute() {
        db_path
    } else {
        cwd.join(db_path)
    };

    Ok(Command::Lookup(LookupConfig {
        db_path,
        id,
        projection,
        format,
        labels,
        table,
        busy_timeout,
    }))
}

fn usage(message: &str) -> CliError {
    CliError::Usage(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fl_core::FieldName;
    use std::collections::HashMap;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn lookup_config(command: Command) -> LookupConfig {
        match command {
            Command::Lookup(cfg) => cfg,
            other => panic!("expected lookup command, got {other:?}"),
        }
    }

    #[test]
    fn defaults_resolve_features_db_in_cwd() {
        let cwd = Path::new("/work");
        let cfg = lookup_config(parse_args(&args(&["30"]), no_env, cwd).unwrap());
        assert_eq!(cfg.db_path, PathBuf::from("/work/features.db"));
        assert_eq!(cfg.id.get(), 30);
        assert_eq!(cfg.projection, Projection::all());
        assert_eq!(cfg.format, OutputFormat::Lines);
        assert_eq!(cfg.labels, LabelStyle::Field);
        assert_eq!(cfg.table, "features");
        assert_eq!(cfg.busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn flags_override_environment() {
        let env: HashMap<&str, &str> = [
            (ENV_DB, "/env/features.db"),
            (ENV_ID, "74"),
            (ENV_FIELDS, "id"),
            (ENV_FORMAT, "yaml"),
            (ENV_BUSY_TIMEOUT_MS, "10"),
        ]
        .into_iter()
        .collect();
        let lookup_env = |key: &str| env.get(key).map(|v| v.to_string());

        let from_env = lookup_config(parse_args(&[], lookup_env, Path::new("/")).unwrap());
        assert_eq!(from_env.db_path, PathBuf::from("/env/features.db"));
        assert_eq!(from_env.id.get(), 74);
        assert_eq!(from_env.projection.fields(), &[FieldName::Id]);
        assert_eq!(from_env.format, OutputFormat::Yaml);
        assert_eq!(from_env.busy_timeout, Duration::from_millis(10));

        let cfg = lookup_config(
            parse_args(
                &args(&[
                    "--db", "rel/other.db", "--id", "242", "--fields", "name, steps",
                    "--format", "json", "--labels", "title", "--table", "archive",
                ]),
                lookup_env,
                Path::new("/work"),
            )
            .unwrap(),
        );
        assert_eq!(cfg.db_path, PathBuf::from("/work/rel/other.db"));
        assert_eq!(cfg.id.get(), 242);
        assert_eq!(cfg.projection.fields(), &[FieldName::Name, FieldName::Steps]);
        assert_eq!(cfg.format, OutputFormat::Json);
        assert_eq!(cfg.labels, LabelStyle::Title);
        assert_eq!(cfg.table, "archive");
    }

    #[test]
    fn project_dir_locates_the_store() {
        let env = |key: &str| (key == ENV_PROJECT_DIR).then(|| "/projects/app".to_string());
        let cfg = lookup_config(parse_args(&args(&["--id", "74"]), env, Path::new("/")).unwrap());
        assert_eq!(cfg.db_path, PathBuf::from("/projects/app/features.db"));
    }

    #[test]
    fn unknown_field_is_schema_mismatch() {
        let err = parse_args(&args(&["30", "--fields", "id,owner"]), no_env, Path::new("/"))
            .unwrap_err();
        assert_eq!(err.code(), "SCHEMA_MISMATCH");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn malformed_input_is_a_usage_error() {
        let cwd = Path::new("/");
        for bad in [
            vec![],
            vec!["0"],
            vec!["abc"],
            vec!["-5"],
            vec!["30", "31"],
            vec!["--id"],
            vec!["30", "--format", "xml"],
            vec!["30", "--labels", "loud"],
            vec!["30", "--fields", "id,id"],
            vec!["30", "--table", "bad name"],
            vec!["30", "--busy-timeout-ms", "soon"],
            vec!["30", "--verbose"],
        ] {
            let err = parse_args(&args(&bad), no_env, cwd).unwrap_err();
            assert_eq!(err.exit_code(), 2, "args {bad:?} gave {err}");
        }
    }

    #[test]
    fn help_version_and_catalog_need_no_id() {
        let cwd = Path::new("/");
        assert_eq!(parse_args(&args(&["--help"]), no_env, cwd).unwrap(), Command::Help);
        assert_eq!(parse_args(&args(&["-V"]), no_env, cwd).unwrap(), Command::Version);
        assert_eq!(
            parse_args(&args(&["--list-fields", "--format", "json"]), no_env, cwd).unwrap(),
            Command::ListFields {
                format: OutputFormat::Json
            }
        );
    }
}
