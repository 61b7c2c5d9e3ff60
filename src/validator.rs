//! Required-field validation for the single prediction form

use crate::models::FormField;

/// Styling hint for a field after validation
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldMark {
    Valid,
    Invalid,
}

/// Outcome of validating the form
#[derive(Clone, Debug, PartialEq)]
pub struct Validation {
    pub is_valid: bool,
    /// Names of empty fields, in declaration order
    pub missing_fields: Vec<String>,
    /// One mark per field, parallel to the input
    pub marks: Vec<FieldMark>,
}

/// Check that every required field has a non-empty value.
pub fn validate(fields: &[FormField]) -> Validation {
    let mut missing_fields = Vec::new();
    let mut marks = Vec::with_capacity(fields.len());

    for field in fields {
        if field.value().is_empty() {
            missing_fields.push(field.name.clone());
            marks.push(FieldMark::Invalid);
        } else {
            marks.push(FieldMark::Valid);
        }
    }

    Validation {
        is_valid: missing_fields.is_empty(),
        missing_fields,
        marks,
    }
}
