//! Durable form store backed by the append-only record file
//!
//! Open scans and verifies the whole file and rebuilds the table in memory.
//! Create checks the unique index, appends and fsyncs the frame, and only
//! then publishes the row, all under one lock. A failed append leaves the
//! table unchanged.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;

use crate::forms::{ListFilter, NewWheelSpecification, WheelSpecification};
use crate::storage::{RecordFrame, StorageError, StorageResult, StorageWriter};

use super::errors::{StoreError, StoreResult};
use super::table::RecordTable;
use super::FormStore;

struct FileStoreInner {
    writer: StorageWriter,
    table: RecordTable,
}

/// A `FormStore` that persists every record before acknowledging it.
pub struct FileFormStore {
    data_dir: PathBuf,
    inner: Mutex<FileStoreInner>,
}

impl FileFormStore {
    /// Opens the store under `data_dir`, verifying every stored record.
    ///
    /// Checksum failures, undecodable bodies and duplicate form numbers in
    /// the file are reported as `FORMS_DATA_CORRUPTION`.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let (writer, frames) = StorageWriter::open(data_dir)?;

        let mut table = RecordTable::new();
        for frame in frames {
            let record: WheelSpecification = serde_json::from_slice(&frame.body).map_err(|e| {
                StorageError::corruption_for_key(&frame.key, format!("Undecodable record: {}", e))
            })?;
            if record.form_number != frame.key {
                return Err(StorageError::corruption_for_key(
                    &frame.key,
                    format!("Frame key does not match record '{}'", record.form_number),
                ));
            }
            table.insert(record).map_err(|_| {
                StorageError::corruption_for_key(&frame.key, "Duplicate form number in record file")
            })?;
        }

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            inner: Mutex::new(FileStoreInner { writer, table }),
        })
    }

    /// Returns the data directory this store was opened from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl FormStore for FileFormStore {
    fn create(&self, new: NewWheelSpecification) -> StoreResult<WheelSpecification> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::unavailable("Lock poisoned"))?;

        let record = inner.table.prepare(new, Utc::now())?;
        let body = serde_json::to_vec(&record)
            .map_err(|e| StoreError::unavailable(format!("Failed to encode record: {}", e)))?;

        inner
            .writer
            .append(&RecordFrame::new(record.form_number.clone(), body))?;
        inner.table.insert(record.clone())?;
        Ok(record)
    }

    fn list(&self, filter: &ListFilter) -> StoreResult<Vec<WheelSpecification>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::unavailable("Lock poisoned"))?;
        Ok(inner.table.select(filter))
    }

    fn count(&self) -> StoreResult<usize> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::unavailable("Lock poisoned"))?;
        Ok(inner.table.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FormStatus, Measurements};
    use crate::storage::{DATA_SUBDIR, RECORD_FILE};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn new(form_number: &str) -> NewWheelSpecification {
        NewWheelSpecification {
            form_number: form_number.to_string(),
            submitted_by: "asha".to_string(),
            submitted_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: FormStatus::Saved,
            measurements: Measurements {
                wheel_gauge: "1600 (+2,-1)".to_string(),
                ..Measurements::default()
            },
        }
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let created = {
            let store = FileFormStore::open(dir.path()).unwrap();
            store.create(new("WHEEL-1")).unwrap();
            store.create(new("WHEEL-2")).unwrap()
        };

        let store = FileFormStore::open(dir.path()).unwrap();
        assert_eq!(store.count().unwrap(), 2);
        let found = store
            .list(&ListFilter::all().with_form_number("WHEEL-2"))
            .unwrap();
        assert_eq!(found, vec![created]);
    }

    #[test]
    fn test_ids_continue_after_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileFormStore::open(dir.path()).unwrap();
            store.create(new("WHEEL-1")).unwrap();
        }
        let store = FileFormStore::open(dir.path()).unwrap();
        assert_eq!(store.create(new("WHEEL-2")).unwrap().id, 2);
    }

    #[test]
    fn test_duplicate_is_not_appended() {
        let dir = TempDir::new().unwrap();
        let store = FileFormStore::open(dir.path()).unwrap();
        store.create(new("WHEEL-1")).unwrap();
        let path = dir.path().join(DATA_SUBDIR).join(RECORD_FILE);
        let size = fs::metadata(&path).unwrap().len();

        let err = store.create(new("WHEEL-1")).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(fs::metadata(&path).unwrap().len(), size);
    }

    #[test]
    fn test_duplicate_frames_in_file_fail_open() {
        let dir = TempDir::new().unwrap();
        {
            let store = FileFormStore::open(dir.path()).unwrap();
            store.create(new("WHEEL-1")).unwrap();
        }
        let path = dir.path().join(DATA_SUBDIR).join(RECORD_FILE);
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, [bytes.clone(), bytes].concat()).unwrap();

        let err = FileFormStore::open(dir.path()).err().unwrap();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("Duplicate form number"));
    }
}
