//! In-memory record table shared by the store implementations
//!
//! Holds every row in insertion order plus a unique index on form number.
//! Callers serialize access; the table itself is not synchronized.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::forms::{ListFilter, NewWheelSpecification, WheelSpecification};

use super::errors::{StoreError, StoreResult};

#[derive(Debug, Default)]
pub(crate) struct RecordTable {
    rows: Vec<WheelSpecification>,
    by_form_number: HashMap<String, usize>,
    next_id: u64,
}

impl RecordTable {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    /// Build the row `new` would become, without inserting it.
    ///
    /// Fails with `DuplicateKey` if the form number is taken.
    pub(crate) fn prepare(
        &self,
        new: NewWheelSpecification,
        now: DateTime<Utc>,
    ) -> StoreResult<WheelSpecification> {
        if self.by_form_number.contains_key(&new.form_number) {
            return Err(StoreError::DuplicateKey(new.form_number));
        }
        Ok(WheelSpecification::from_new(new, self.next_id, now))
    }

    /// Insert a row. Fails with `DuplicateKey` if the form number is taken.
    pub(crate) fn insert(&mut self, record: WheelSpecification) -> StoreResult<()> {
        if self.by_form_number.contains_key(&record.form_number) {
            return Err(StoreError::DuplicateKey(record.form_number));
        }
        self.next_id = self.next_id.max(record.id + 1);
        self.by_form_number
            .insert(record.form_number.clone(), self.rows.len());
        self.rows.push(record);
        Ok(())
    }

    /// Matching rows, newest first.
    pub(crate) fn select(&self, filter: &ListFilter) -> Vec<WheelSpecification> {
        let mut matches: Vec<WheelSpecification> = match &filter.form_number {
            Some(form_number) => self
                .by_form_number
                .get(form_number)
                .map(|&idx| &self.rows[idx])
                .filter(|row| filter.matches(row))
                .into_iter()
                .cloned()
                .collect(),
            None => self
                .rows
                .iter()
                .filter(|row| filter.matches(row))
                .cloned()
                .collect(),
        };
        matches.sort_by(WheelSpecification::newest_first);
        matches
    }
}
