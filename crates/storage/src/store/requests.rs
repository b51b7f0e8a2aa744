#![forbid(unsafe_code)]

use fl_core::Projection;
use fl_core::ids::FeatureId;
use std::time::Duration;

pub const DEFAULT_TABLE: &str = "features";
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupRequest {
    pub id: FeatureId,
    pub projection: Projection,
    pub table: String,
}

impl LookupRequest {
    pub fn new(id: FeatureId, projection: Projection) -> Self {
        Self {
            id,
            projection,
            table: DEFAULT_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    /// How long a read waits on a writer's lock before failing with `Timeout`.
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}
