//! Submission validation
//!
//! Turns an external JSON payload into a `NewWheelSpecification`, or into a
//! field-scoped error map. Every field is checked; errors from all fields
//! are reported together. Validation is pure and never touches storage.
//!
//! Per-field rules, in order:
//! - key missing → required
//! - `null` → may not be null
//! - booleans, arrays, objects → not a valid string (numbers become text)
//! - surrounding whitespace is trimmed
//! - blank after trimming → may not be blank
//! - longer than the field's ceiling → too long

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use super::fields::{Measurements, MEASUREMENT_FIELDS};
use super::model::{FormStatus, NewWheelSpecification, FORM_NUMBER_PREFIX};

pub const FORM_NUMBER: &str = "formNumber";
pub const SUBMITTED_BY: &str = "submittedBy";
pub const SUBMITTED_DATE: &str = "submittedDate";
pub const FIELDS: &str = "fields";
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Ceiling for `formNumber`
pub const FORM_NUMBER_MAX_LENGTH: usize = 50;
/// Ceiling for `submittedBy`
pub const SUBMITTED_BY_MAX_LENGTH: usize = 100;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_NULL: &str = "This field may not be null.";
pub const MSG_BLANK: &str = "This field may not be blank.";
pub const MSG_NOT_A_STRING: &str = "Not a valid string.";
pub const MSG_BAD_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
pub const MSG_BAD_PREFIX: &str = "Form number must start with 'WHEEL-'";

fn too_long(max_length: usize) -> String {
    format!("Ensure this field has no more than {} characters.", max_length)
}

fn not_a_dictionary(value: &Value) -> String {
    format!(
        "Invalid data. Expected a dictionary, but got {}.",
        json_type_name(value)
    )
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Errors for one key: either a list of messages, or, for the nested
/// `fields` object, a map of measurement name to messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldErrors {
    Messages(Vec<String>),
    Nested(BTreeMap<String, Vec<String>>),
}

/// Field name → error messages. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, FieldErrors>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single message on a single top-level field
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Add a message to a top-level field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let entry = self
            .0
            .entry(field.to_string())
            .or_insert_with(|| FieldErrors::Messages(Vec::new()));
        if let FieldErrors::Messages(messages) = entry {
            messages.push(message.into());
        }
    }

    /// Add a message to a field nested under `parent`
    pub fn add_nested(&mut self, parent: &str, field: &str, message: impl Into<String>) {
        let entry = self
            .0
            .entry(parent.to_string())
            .or_insert_with(|| FieldErrors::Nested(BTreeMap::new()));
        if let FieldErrors::Nested(nested) = entry {
            nested
                .entry(field.to_string())
                .or_default()
                .push(message.into());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of top-level fields with errors
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&FieldErrors> {
        self.0.get(field)
    }

    /// Messages on a top-level field
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        match self.0.get(field)? {
            FieldErrors::Messages(messages) => Some(messages),
            FieldErrors::Nested(_) => None,
        }
    }

    /// Messages on a field nested under `parent`
    pub fn nested_messages(&self, parent: &str, field: &str) -> Option<&[String]> {
        match self.0.get(parent)? {
            FieldErrors::Nested(nested) => nested.get(field).map(Vec::as_slice),
            FieldErrors::Messages(_) => None,
        }
    }

    /// Field names with errors, in sorted order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Where an error for a given key should be recorded.
enum Slot<'a> {
    Top(&'a str),
    Nested(&'a str, &'a str),
}

impl Slot<'_> {
    fn record(&self, errors: &mut ValidationErrors, message: impl Into<String>) {
        match self {
            Slot::Top(field) => errors.add(field, message),
            Slot::Nested(parent, field) => errors.add_nested(parent, field, message),
        }
    }
}

/// Clean a string field. Records an error and returns `None` on failure.
fn clean_string(
    object: &Map<String, Value>,
    key: &str,
    max_length: usize,
    slot: Slot<'_>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let text = match object.get(key) {
        None => {
            slot.record(errors, MSG_REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            slot.record(errors, MSG_NULL);
            return None;
        }
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            slot.record(errors, MSG_NOT_A_STRING);
            return None;
        }
    };

    if text.is_empty() {
        slot.record(errors, MSG_BLANK);
        return None;
    }
    if text.chars().count() > max_length {
        slot.record(errors, too_long(max_length));
        return None;
    }
    Some(text)
}

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_form_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn clean_date(
    object: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    match object.get(key) {
        None => {
            errors.add(key, MSG_REQUIRED);
            None
        }
        Some(Value::Null) => {
            errors.add(key, MSG_NULL);
            None
        }
        Some(Value::String(s)) => {
            let parsed = parse_form_date(s);
            if parsed.is_none() {
                errors.add(key, MSG_BAD_DATE);
            }
            parsed
        }
        Some(_) => {
            errors.add(key, MSG_BAD_DATE);
            None
        }
    }
}

fn clean_measurements(
    object: &Map<String, Value>,
    errors: &mut ValidationErrors,
) -> Option<Measurements> {
    let nested = match object.get(FIELDS) {
        None => {
            errors.add(FIELDS, MSG_REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add(FIELDS, MSG_NULL);
            return None;
        }
        Some(Value::Object(nested)) => nested,
        Some(other) => {
            errors.add_nested(FIELDS, NON_FIELD_ERRORS, not_a_dictionary(other));
            return None;
        }
    };

    let mut measurements = Measurements::default();
    let mut complete = true;
    for spec in MEASUREMENT_FIELDS {
        let slot = Slot::Nested(FIELDS, spec.external);
        match clean_string(nested, spec.external, spec.max_length, slot, errors) {
            Some(value) => (spec.set)(&mut measurements, value),
            None => complete = false,
        }
    }
    complete.then_some(measurements)
}

/// Validate and transform an external payload.
///
/// On success the result carries internal names and `status = saved`.
pub fn validate_submission(payload: &Value) -> Result<NewWheelSpecification, ValidationErrors> {
    let object = payload
        .as_object()
        .ok_or_else(|| ValidationErrors::single(NON_FIELD_ERRORS, not_a_dictionary(payload)))?;

    let mut errors = ValidationErrors::new();

    let form_number = clean_string(
        object,
        FORM_NUMBER,
        FORM_NUMBER_MAX_LENGTH,
        Slot::Top(FORM_NUMBER),
        &mut errors,
    )
    .and_then(|value| {
        if value.starts_with(FORM_NUMBER_PREFIX) {
            Some(value)
        } else {
            errors.add(FORM_NUMBER, MSG_BAD_PREFIX);
            None
        }
    });
    let submitted_by = clean_string(
        object,
        SUBMITTED_BY,
        SUBMITTED_BY_MAX_LENGTH,
        Slot::Top(SUBMITTED_BY),
        &mut errors,
    );
    let submitted_date = clean_date(object, SUBMITTED_DATE, &mut errors);
    let measurements = clean_measurements(object, &mut errors);

    match (form_number, submitted_by, submitted_date, measurements) {
        (Some(form_number), Some(submitted_by), Some(submitted_date), Some(measurements))
            if errors.is_empty() =>
        {
            Ok(NewWheelSpecification {
                form_number,
                submitted_by,
                submitted_date,
                status: FormStatus::Saved,
                measurements,
            })
        }
        _ => Err(errors),
    }
}
