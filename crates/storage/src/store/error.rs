#![forbid(unsafe_code)]

use fl_core::ProjectionError;
use fl_core::ids::FeatureIdError;
use rusqlite::ErrorCode;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum StoreError {
    Sql(rusqlite::Error),
    InvalidInput(&'static str),
    SourceUnavailable {
        path: PathBuf,
        detail: String,
    },
    SchemaMismatch {
        table: String,
        field: Option<String>,
    },
    UnknownField {
        name: String,
    },
    Timeout {
        detail: String,
    },
}

impl StoreError {
    /// Stable machine-readable tag, printed on stderr and recorded in the session log.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sql(_) => "SQLITE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            Self::SchemaMismatch { .. } | Self::UnknownField { .. } => "SCHEMA_MISMATCH",
            Self::Timeout { .. } => "TIMEOUT",
        }
    }

    pub(crate) fn source_unavailable(path: &Path, detail: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable {
            path: path.to_path_buf(),
            detail: detail.to_string(),
        }
    }

    /// Errors raised while opening or probing the file. Lock contention stays a timeout,
    /// everything else means the store cannot be used.
    pub(crate) fn from_open(path: &Path, err: rusqlite::Error) -> Self {
        if is_busy(&err) {
            return Self::Timeout {
                detail: err.to_string(),
            };
        }
        Self::source_unavailable(path, err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::SourceUnavailable { path, detail } => write!(
                f,
                "source unavailable (path={}): {detail}",
                path.display()
            ),
            Self::SchemaMismatch { table, field } => match field {
                Some(field) => write!(
                    f,
                    "schema mismatch: table `{table}` has no column `{field}`"
                ),
                None => write!(f, "schema mismatch: table `{table}` does not exist"),
            },
            Self::UnknownField { name } => write!(
                f,
                "schema mismatch: unknown field `{name}` (see --list-fields)"
            ),
            Self::Timeout { detail } => write!(f, "timed out waiting for the store: {detail}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sql(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        if is_busy(&value) {
            return Self::Timeout {
                detail: value.to_string(),
            };
        }
        Self::Sql(value)
    }
}

impl From<ProjectionError> for StoreError {
    fn from(value: ProjectionError) -> Self {
        match value {
            ProjectionError::UnknownField { name } => Self::UnknownField { name },
            ProjectionError::Empty => Self::InvalidInput("field list is empty"),
            ProjectionError::EmptyName => Self::InvalidInput("field list contains an empty name"),
            ProjectionError::DuplicateField { .. } => {
                Self::InvalidInput("field list contains a duplicate field")
            }
        }
    }
}

impl From<FeatureIdError> for StoreError {
    fn from(value: FeatureIdError) -> Self {
        match value {
            FeatureIdError::Empty => Self::InvalidInput("feature id is empty"),
            FeatureIdError::NotANumber => Self::InvalidInput("feature id must be an integer"),
            FeatureIdError::NotPositive { .. } => {
                Self::InvalidInput("feature id must be positive")
            }
        }
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}
