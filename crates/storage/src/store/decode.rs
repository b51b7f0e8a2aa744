#![forbid(unsafe_code)]

use fl_core::{FieldKind, FieldName, FieldValue};
use rusqlite::types::ValueRef;

pub(crate) fn decode_value(field: FieldName, raw: ValueRef<'_>) -> FieldValue {
    match (field.kind(), raw) {
        (_, ValueRef::Null) => FieldValue::Null,
        (FieldKind::Boolean, ValueRef::Integer(value)) => FieldValue::Bool(value != 0),
        (_, ValueRef::Integer(value)) => FieldValue::Integer(value),
        (_, ValueRef::Real(value)) => FieldValue::Real(value),
        (_, ValueRef::Text(bytes)) => FieldValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        (_, ValueRef::Blob(bytes)) => FieldValue::Blob(bytes.to_vec()),
    }
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
