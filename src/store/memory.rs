//! In-memory form store, for tests and ephemeral runs

use std::sync::Mutex;

use chrono::Utc;

use crate::forms::{ListFilter, NewWheelSpecification, WheelSpecification};

use super::errors::{StoreError, StoreResult};
use super::table::RecordTable;
use super::FormStore;

/// A `FormStore` that keeps records in process memory only.
#[derive(Debug)]
pub struct InMemoryFormStore {
    table: Mutex<RecordTable>,
}

impl InMemoryFormStore {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(RecordTable::new()),
        }
    }
}

impl Default for InMemoryFormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FormStore for InMemoryFormStore {
    fn create(&self, new: NewWheelSpecification) -> StoreResult<WheelSpecification> {
        let mut table = self
            .table
            .lock()
            .map_err(|_| StoreError::unavailable("Lock poisoned"))?;
        let record = table.prepare(new, Utc::now())?;
        table.insert(record.clone())?;
        Ok(record)
    }

    fn list(&self, filter: &ListFilter) -> StoreResult<Vec<WheelSpecification>> {
        let table = self
            .table
            .lock()
            .map_err(|_| StoreError::unavailable("Lock poisoned"))?;
        Ok(table.select(filter))
    }

    fn count(&self) -> StoreResult<usize> {
        let table = self
            .table
            .lock()
            .map_err(|_| StoreError::unavailable("Lock poisoned"))?;
        Ok(table.len())
    }
}
