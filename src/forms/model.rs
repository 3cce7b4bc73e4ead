//! Wheel specification records

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::fields::Measurements;

/// Required prefix of every form number
pub const FORM_NUMBER_PREFIX: &str = "WHEEL-";

/// Lifecycle status of a submitted form.
///
/// Forms are written once and never transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    #[default]
    Saved,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Saved => "saved",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated submission that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWheelSpecification {
    pub form_number: String,
    pub submitted_by: String,
    pub submitted_date: NaiveDate,
    pub status: FormStatus,
    pub measurements: Measurements,
}

/// A persisted wheel specification.
///
/// Serialized with internal (snake_case) names; this is the stored shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelSpecification {
    /// Store-assigned row id, increasing in insertion order
    pub id: u64,
    pub form_number: String,
    pub submitted_by: String,
    pub submitted_date: NaiveDate,
    pub status: FormStatus,
    #[serde(flatten)]
    pub measurements: Measurements,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl WheelSpecification {
    /// Materialize a submission as a stored row.
    pub fn from_new(new: NewWheelSpecification, id: u64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            form_number: new.form_number,
            submitted_by: new.submitted_by,
            submitted_date: new.submitted_date,
            status: new.status,
            measurements: new.measurements,
            created_at: now,
            modified_at: now,
        }
    }

    /// Default listing order: newest `created_at` first, then highest id.
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}

impl fmt::Display for WheelSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} on {}",
            self.form_number, self.submitted_by, self.submitted_date
        )
    }
}

/// Exact-match filters for listing. Unset filters match everything;
/// set filters combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub form_number: Option<String>,
    pub submitted_by: Option<String>,
    pub submitted_date: Option<NaiveDate>,
}

impl ListFilter {
    /// A filter that matches every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_form_number(mut self, form_number: impl Into<String>) -> Self {
        self.form_number = Some(form_number.into());
        self
    }

    pub fn with_submitted_by(mut self, submitted_by: impl Into<String>) -> Self {
        self.submitted_by = Some(submitted_by.into());
        self
    }

    pub fn with_submitted_date(mut self, submitted_date: NaiveDate) -> Self {
        self.submitted_date = Some(submitted_date);
        self
    }

    /// Returns true if no filter is set
    pub fn is_empty(&self) -> bool {
        self.form_number.is_none() && self.submitted_by.is_none() && self.submitted_date.is_none()
    }

    pub fn matches(&self, record: &WheelSpecification) -> bool {
        self.form_number
            .as_ref()
            .map_or(true, |v| *v == record.form_number)
            && self
                .submitted_by
                .as_ref()
                .map_or(true, |v| *v == record.submitted_by)
            && self
                .submitted_date
                .map_or(true, |v| v == record.submitted_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: u64, form_number: &str, submitted_by: &str, secs: i64) -> WheelSpecification {
        let now = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
        WheelSpecification::from_new(
            NewWheelSpecification {
                form_number: form_number.to_string(),
                submitted_by: submitted_by.to_string(),
                submitted_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                status: FormStatus::Saved,
                measurements: Measurements::default(),
            },
            id,
            now,
        )
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(FormStatus::Saved).unwrap(), "saved");
        assert_eq!(FormStatus::default(), FormStatus::Saved);
    }

    #[test]
    fn test_from_new_sets_both_timestamps() {
        let r = record(1, "WHEEL-1", "inspector", 0);
        assert_eq!(r.created_at, r.modified_at);
        assert_eq!(r.status, FormStatus::Saved);
    }

    #[test]
    fn test_stored_shape_is_flat_snake_case() {
        let value = serde_json::to_value(record(7, "WHEEL-7", "inspector", 0)).unwrap();
        assert_eq!(value["form_number"], "WHEEL-7");
        assert_eq!(value["submitted_date"], "2024-03-01");
        assert_eq!(value["status"], "saved");
        assert!(value.get("wheel_gauge").is_some());
        assert!(value.get("measurements").is_none());

        let back: WheelSpecification = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, 7);
    }

    #[test]
    fn test_newest_first_breaks_ties_by_id() {
        let mut records = vec![
            record(1, "WHEEL-1", "a", 0),
            record(2, "WHEEL-2", "a", 5),
            record(3, "WHEEL-3", "a", 5),
        ];
        records.sort_by(WheelSpecification::newest_first);
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let r = record(1, "WHEEL-1", "asha", 0);
        assert!(ListFilter::all().matches(&r));
        assert!(ListFilter::all().with_form_number("WHEEL-1").matches(&r));
        assert!(!ListFilter::all()
            .with_form_number("WHEEL-1")
            .with_submitted_by("ravi")
            .matches(&r));
        assert!(!ListFilter::all()
            .with_submitted_date(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap())
            .matches(&r));
    }

    #[test]
    fn test_display() {
        let r = record(1, "WHEEL-1", "asha", 0);
        assert_eq!(r.to_string(), "WHEEL-1 - asha on 2024-03-01");
    }
}
