//! Response shapes for the forms API
//!
//! The creation response echoes the form metadata; the list response adds a
//! four-field summary of the measurements.

use chrono::NaiveDate;
use serde::Serialize;

use super::model::{FormStatus, WheelSpecification};

pub const CREATED_MESSAGE: &str = "Wheel specification submitted successfully.";
pub const LISTED_MESSAGE: &str = "Filtered wheel specification forms fetched successfully.";

/// Success envelope: `{"success": true, "message": ..., "data": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: &'static str,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message,
            data,
        }
    }
}

/// Form metadata returned after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    pub form_number: String,
    pub submitted_by: String,
    pub submitted_date: NaiveDate,
    pub status: FormStatus,
}

impl From<&WheelSpecification> for SubmissionView {
    fn from(record: &WheelSpecification) -> Self {
        Self {
            form_number: record.form_number.clone(),
            submitted_by: record.submitted_by.clone(),
            submitted_date: record.submitted_date,
            status: record.status,
        }
    }
}

/// The summary subset of measurements shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelFieldsSummary {
    pub condemning_dia: String,
    pub last_shop_issue_size: String,
    pub tread_diameter_new: String,
    pub wheel_gauge: String,
}

/// One row of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemView {
    pub form_number: String,
    pub submitted_by: String,
    pub submitted_date: NaiveDate,
    pub wheel_fields: WheelFieldsSummary,
    pub status: FormStatus,
}

impl From<&WheelSpecification> for ListItemView {
    fn from(record: &WheelSpecification) -> Self {
        let m = &record.measurements;
        Self {
            form_number: record.form_number.clone(),
            submitted_by: record.submitted_by.clone(),
            submitted_date: record.submitted_date,
            wheel_fields: WheelFieldsSummary {
                condemning_dia: m.condemning_dia.clone(),
                last_shop_issue_size: m.last_shop_issue_size.clone(),
                tread_diameter_new: m.tread_diameter_new.clone(),
                wheel_gauge: m.wheel_gauge.clone(),
            },
            status: record.status,
        }
    }
}
