#![forbid(unsafe_code)]

pub mod ids {
    /// Primary key of a row in the features table. Always positive.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct FeatureId(i64);

    impl FeatureId {
        pub fn get(self) -> i64 {
            self.0
        }

        pub fn try_new(value: i64) -> Result<Self, FeatureIdError> {
            if value <= 0 {
                return Err(FeatureIdError::NotPositive { value });
            }
            Ok(Self(value))
        }

        pub fn parse(value: &str) -> Result<Self, FeatureIdError> {
            let value = value.trim();
            if value.is_empty() {
                return Err(FeatureIdError::Empty);
            }
            let raw = value.strip_prefix('#').unwrap_or(value);
            let parsed = raw
                .parse::<i64>()
                .map_err(|_| FeatureIdError::NotANumber)?;
            Self::try_new(parsed)
        }
    }

    impl std::fmt::Display for FeatureId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum FeatureIdError {
        Empty,
        NotANumber,
        NotPositive { value: i64 },
    }

    impl std::fmt::Display for FeatureIdError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Empty => write!(f, "feature id is empty"),
                Self::NotANumber => write!(f, "feature id must be an integer"),
                Self::NotPositive { value } => {
                    write!(f, "feature id must be positive (got {value})")
                }
            }
        }
    }

    impl std::error::Error for FeatureIdError {}
}

pub mod record;

pub use record::*;
