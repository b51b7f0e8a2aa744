#![forbid(unsafe_code)]

/// Storage kind of a catalog column. Drives how raw SQLite values are decoded and rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    JsonText,
    Boolean,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Text => "text",
            Self::JsonText => "json",
            Self::Boolean => "boolean",
        }
    }
}

/// Closed catalog of the columns of the features table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    Id,
    Priority,
    Category,
    Name,
    Description,
    Steps,
    Passes,
    InProgress,
}

impl FieldName {
    /// Canonical column order.
    pub const ALL: [FieldName; 8] = [
        FieldName::Id,
        FieldName::Priority,
        FieldName::Category,
        FieldName::Name,
        FieldName::Description,
        FieldName::Steps,
        FieldName::Passes,
        FieldName::InProgress,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Priority => "priority",
            Self::Category => "category",
            Self::Name => "name",
            Self::Description => "description",
            Self::Steps => "steps",
            Self::Passes => "passes",
            Self::InProgress => "in_progress",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == value)
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Id | Self::Priority => FieldKind::Integer,
            Self::Category | Self::Name | Self::Description => FieldKind::Text,
            Self::Steps => FieldKind::JsonText,
            Self::Passes | Self::InProgress => FieldKind::Boolean,
        }
    }

    pub fn title_label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Priority => "Priority",
            Self::Category => "Category",
            Self::Name => "Name",
            Self::Description => "Description",
            Self::Steps => "Steps",
            Self::Passes => "Passes",
            Self::InProgress => "In Progress",
        }
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
