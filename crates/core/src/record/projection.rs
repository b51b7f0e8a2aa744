#![forbid(unsafe_code)]

use super::FieldName;

/// Non-empty, duplicate-free, ordered list of fields to read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<FieldName>,
}

impl Projection {
    pub fn all() -> Self {
        Self {
            fields: FieldName::ALL.to_vec(),
        }
    }

    pub fn try_new(fields: Vec<FieldName>) -> Result<Self, ProjectionError> {
        if fields.is_empty() {
            return Err(ProjectionError::Empty);
        }
        for (index, field) in fields.iter().enumerate() {
            if fields[..index].contains(field) {
                return Err(ProjectionError::DuplicateField { field: *field });
            }
        }
        Ok(Self { fields })
    }

    /// Parses a comma separated list such as `id, name,steps`. Names are case-sensitive.
    pub fn parse(value: &str) -> Result<Self, ProjectionError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ProjectionError::Empty);
        }

        let mut fields = Vec::new();
        for segment in value.split(',') {
            let name = segment.trim();
            if name.is_empty() {
                return Err(ProjectionError::EmptyName);
            }
            let field = FieldName::parse(name).ok_or_else(|| ProjectionError::UnknownField {
                name: name.to_string(),
            })?;
            fields.push(field);
        }
        Self::try_new(fields)
    }

    pub fn fields(&self) -> &[FieldName] {
        &self.fields
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.fields.contains(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectionError {
    Empty,
    EmptyName,
    UnknownField { name: String },
    DuplicateField { field: FieldName },
}

impl ProjectionError {
    /// Unknown names are a schema problem; everything else is malformed input.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::UnknownField { .. })
    }
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "field list is empty"),
            Self::EmptyName => write!(f, "field list contains an empty name"),
            Self::UnknownField { name } => write!(f, "unknown field: {name}"),
            Self::DuplicateField { field } => write!(f, "duplicate field: {field}"),
        }
    }
}

impl std::error::Error for ProjectionError {}
