//! Wheel specification forms
//!
//! - `fields`: the measurement set and its external ↔ internal name table
//! - `model`: validated submissions, stored records, list filters
//! - `validate`: payload validation and transformation
//! - `response`: response envelopes and views

pub mod fields;
pub mod model;
pub mod response;
pub mod validate;

pub use fields::{FieldSpec, Measurements, MEASUREMENT_FIELDS};
pub use model::{
    FormStatus, ListFilter, NewWheelSpecification, WheelSpecification, FORM_NUMBER_PREFIX,
};
pub use response::{ApiResponse, ListItemView, SubmissionView, WheelFieldsSummary};
pub use validate::{validate_submission, FieldErrors, ValidationErrors};
