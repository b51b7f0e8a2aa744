#![forbid(unsafe_code)]

use fl_core::ids::FeatureId;
use fl_core::{FieldKind, FieldName, FieldValue, Record, hex};
use serde::Serialize;
use serde_json::{Map, Number, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Lines,
    Json,
    Yaml,
}

impl OutputFormat {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lines" | "text" => Some(Self::Lines),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LabelStyle {
    /// Column name as stored: `in_progress: false`.
    Field,
    /// Human label: `In Progress: false`.
    Title,
}

impl LabelStyle {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "field" | "raw" => Some(Self::Field),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    fn label(self, field: FieldName) -> &'static str {
        match self {
            Self::Field => field.as_str(),
            Self::Title => field.title_label(),
        }
    }
}

#[derive(Debug)]
pub(crate) enum RenderError {
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "json: {err}"),
            Self::Yaml(err) => write!(f, "yaml: {err}"),
        }
    }
}

impl std::error::Error for RenderError {}

pub(crate) fn not_found_line(id: FeatureId) -> String {
    format!("Feature #{id} not found\n")
}

pub(crate) fn render_lookup(
    record: Option<&Record>,
    id: FeatureId,
    format: OutputFormat,
    labels: LabelStyle,
) -> Result<String, RenderError> {
    let Some(record) = record else {
        return Ok(not_found_line(id));
    };
    match format {
        OutputFormat::Lines => Ok(render_lines(record, labels)),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&record_object(record, labels))
                .map_err(RenderError::Json)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(&record_object(record, labels)).map_err(RenderError::Yaml)
        }
    }
}

fn render_lines(record: &Record, labels: LabelStyle) -> String {
    let mut out = String::new();
    for (field, value) in record.fields() {
        out.push_str(labels.label(*field));
        out.push_str(": ");
        out.push_str(&value.to_string());
        out.push('\n');
    }
    out
}

// Insertion-ordered (serde_json `preserve_order`), so keys follow the projection.
fn record_object(record: &Record, labels: LabelStyle) -> Value {
    let mut object = Map::new();
    for (field, value) in record.fields() {
        object.insert(labels.label(*field).to_string(), json_value(*field, value));
    }
    Value::Object(object)
}

fn json_value(field: FieldName, value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Integer(value) => Value::from(*value),
        FieldValue::Real(value) => Number::from_f64(*value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        FieldValue::Text(text) if field.kind() == FieldKind::JsonText => embedded_json(text),
        FieldValue::Text(text) => Value::String(text.clone()),
        FieldValue::Bool(value) => Value::Bool(*value),
        FieldValue::Blob(bytes) => Value::String(hex(bytes)),
    }
}

// Only arrays and objects are lifted; a bare `"x"` or `3` stays the literal text.
fn embedded_json(text: &str) -> Value {
    let trimmed = text.trim_start();
    if (trimmed.starts_with('[') || trimmed.starts_with('{'))
        && let Ok(value) = serde_json::from_str::<Value>(text)
    {
        return value;
    }
    Value::String(text.to_string())
}

#[derive(Serialize)]
struct CatalogEntry {
    name: &'static str,
    kind: &'static str,
}

pub(crate) fn render_catalog(format: OutputFormat) -> Result<String, RenderError> {
    let entries = FieldName::ALL
        .iter()
        .map(|field| CatalogEntry {
            name: field.as_str(),
            kind: field.kind().as_str(),
        })
        .collect::<Vec<_>>();
    match format {
        OutputFormat::Lines => {
            let mut out = String::new();
            for entry in &entries {
                out.push_str(entry.name);
                out.push('\t');
                out.push_str(entry.kind);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&entries).map_err(RenderError::Json)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => serde_yaml::to_string(&entries).map_err(RenderError::Yaml),
    }
}
