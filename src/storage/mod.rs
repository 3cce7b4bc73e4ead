//! Record storage engine
//!
//! An append-only file of keyed, checksummed frames. The file holds the
//! canonical persistent state of every submitted form.
//!
//! # Design Principles
//!
//! - Append-only (no in-place updates)
//! - CRC32 checksum on every frame, verified on every read
//! - fsync before a write is acknowledged
//! - Corruption on open is fatal; the file is never partially served

mod checksum;
mod errors;
mod reader;
mod record;
mod writer;

pub use checksum::compute_checksum;
pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use reader::StorageReader;
pub use record::{RecordFrame, MIN_FRAME_SIZE};
pub use writer::StorageWriter;

/// Subdirectory of the data directory that holds record files
pub const DATA_SUBDIR: &str = "data";

/// Record file name for wheel specifications
pub const RECORD_FILE: &str = "wheel_specifications.dat";
