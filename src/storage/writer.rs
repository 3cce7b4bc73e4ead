//! Append-only record file writer
//!
//! Every append is followed by fsync; a write is not acknowledged until it
//! is durable. There are no in-place updates.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::reader::StorageReader;
use super::record::RecordFrame;
use super::{DATA_SUBDIR, RECORD_FILE};

/// Writer that owns the append handle of the record file.
pub struct StorageWriter {
    storage_path: PathBuf,
    file: File,
    current_offset: u64,
    /// Set when a partial frame could not be removed. No append is
    /// accepted afterwards.
    failed: Option<String>,
}

impl StorageWriter {
    /// Opens or creates `<data_dir>/data/wheel_specifications.dat`.
    ///
    /// Returns the writer together with every frame already in the file,
    /// checksum-verified, in append order.
    pub fn open(data_dir: &Path) -> StorageResult<(Self, Vec<RecordFrame>)> {
        let data_subdir = data_dir.join(DATA_SUBDIR);
        let storage_path = data_subdir.join(RECORD_FILE);

        if !data_subdir.exists() {
            fs::create_dir_all(&data_subdir).map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to create data directory: {}", data_subdir.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&storage_path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open record file: {}", storage_path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::io_error("Failed to read file metadata", e))?
            .len();

        let existing = if current_offset == 0 {
            Vec::new()
        } else {
            StorageReader::open(&storage_path)?.read_all()?
        };

        Ok((
            Self {
                storage_path,
                file,
                current_offset,
                failed: None,
            },
            existing,
        ))
    }

    /// Appends a frame and fsyncs. Returns the offset it was written at.
    ///
    /// If the write or the fsync fails, the file is truncated back to its
    /// previous length. If that truncation fails too, the writer is closed
    /// and every later append is refused.
    pub fn append(&mut self, frame: &RecordFrame) -> StorageResult<u64> {
        if let Some(reason) = &self.failed {
            return Err(StorageError::writer_closed(reason.clone()));
        }

        let bytes = frame.encode();
        let offset = self.current_offset;

        let written = self
            .file
            .write_all(&bytes)
            .map_err(|e| {
                StorageError::write_failed(
                    format!(
                        "Failed to append record {} to {}",
                        frame.key,
                        self.storage_path.display()
                    ),
                    e,
                )
            })
            .and_then(|()| {
                self.file.sync_all().map_err(|e| {
                    StorageError::write_failed(
                        format!("fsync failed after appending record: {}", frame.key),
                        e,
                    )
                })
            });

        if let Err(err) = written {
            self.discard_tail(offset, &err)?;
            return Err(err);
        }

        self.current_offset += bytes.len() as u64;
        Ok(offset)
    }

    /// Cuts the file back to `offset`, removing an unacknowledged frame.
    fn discard_tail(&mut self, offset: u64, cause: &StorageError) -> StorageResult<()> {
        let truncated = self
            .file
            .set_len(offset)
            .and_then(|()| self.file.sync_all());

        truncated.map_err(|e| {
            let reason = format!(
                "could not truncate {} to offset {} after: {}",
                self.storage_path.display(),
                offset,
                cause
            );
            self.failed = Some(reason.clone());
            StorageError::write_failed(reason, e)
        })
    }
}
