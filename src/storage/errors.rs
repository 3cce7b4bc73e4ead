//! Storage engine error types
//!
//! Error codes:
//! - FORMS_STORAGE_IO_ERROR (ERROR severity)
//! - FORMS_STORAGE_WRITE_FAILED (ERROR severity)
//! - FORMS_STORAGE_READ_FAILED (ERROR severity)
//! - FORMS_DATA_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, server continues
    Error,
    /// The record file cannot be trusted; the process must not serve it
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Disk I/O failure
    IoError,
    /// Record append or fsync failed
    WriteFailed,
    /// Record read failed
    ReadFailed,
    /// Checksum mismatch, truncated frame or undecodable body
    DataCorruption,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::IoError => "FORMS_STORAGE_IO_ERROR",
            StorageErrorCode::WriteFailed => "FORMS_STORAGE_WRITE_FAILED",
            StorageErrorCode::ReadFailed => "FORMS_STORAGE_READ_FAILED",
            StorageErrorCode::DataCorruption => "FORMS_DATA_CORRUPTION",
        }
    }

    /// Returns the severity level for this code
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::DataCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with code, message, optional context and I/O source
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StorageError {
    fn with_code(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a storage I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::with_code(StorageErrorCode::IoError, message)
        }
    }

    /// Create a write failed error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::with_code(StorageErrorCode::WriteFailed, message)
        }
    }

    /// Create a read failed error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::with_code(StorageErrorCode::ReadFailed, message)
        }
    }

    /// Create a write failed error for a writer that refuses further appends
    pub fn writer_closed(reason: impl Into<String>) -> Self {
        Self::with_code(
            StorageErrorCode::WriteFailed,
            format!("Record file writer is closed: {}", reason.into()),
        )
    }

    /// Create a data corruption error (FATAL)
    pub fn data_corruption(message: impl Into<String>) -> Self {
        Self::with_code(StorageErrorCode::DataCorruption, message)
    }

    /// Create a data corruption error pinned to a byte offset
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            details: Some(format!("byte_offset: {}", offset)),
            ..Self::data_corruption(reason)
        }
    }

    /// Create a data corruption error pinned to a record key
    pub fn corruption_for_key(key: &str, reason: impl Into<String>) -> Self {
        Self {
            details: Some(format!("key: {}", key)),
            ..Self::data_corruption(reason)
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns whether the record file must not be served
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
