#![forbid(unsafe_code)]

use crate::render::RenderError;
use fl_storage::StoreError;

#[derive(Debug)]
pub(crate) enum CliError {
    Usage(String),
    Store(StoreError),
    Render(RenderError),
    Output(std::io::Error),
}

impl CliError {
    pub(crate) fn code(&self) -> &'static str {
        match self {
            Self::Usage(_) => "USAGE",
            Self::Store(err) => err.code(),
            Self::Render(_) => "RENDER",
            Self::Output(_) => "OUTPUT",
        }
    }

    pub(crate) fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            Self::Store(StoreError::InvalidInput(_)) => 2,
            Self::Store(StoreError::SourceUnavailable { .. }) => 3,
            Self::Store(StoreError::SchemaMismatch { .. } | StoreError::UnknownField { .. }) => 4,
            Self::Store(StoreError::Timeout { .. }) => 5,
            Self::Store(StoreError::Sql(_)) => 1,
            Self::Render(_) | Self::Output(_) => 1,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(message) => write!(f, "{message}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "render: {err}"),
            Self::Output(err) => write!(f, "stdout: {err}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RenderError> for CliError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}
