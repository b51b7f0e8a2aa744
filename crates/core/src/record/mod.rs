#![forbid(unsafe_code)]

mod fields;
mod projection;
mod value;

pub use fields::*;
pub use projection::*;
pub use value::*;

use crate::ids::FeatureId;

/// One row read from the store, holding only the projected fields in projection order.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    id: FeatureId,
    fields: Vec<(FieldName, FieldValue)>,
}

impl Record {
    pub fn new(id: FeatureId, fields: Vec<(FieldName, FieldValue)>) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> FeatureId {
        self.id
    }

    pub fn fields(&self) -> &[(FieldName, FieldValue)] {
        &self.fields
    }

    pub fn get(&self, field: FieldName) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
