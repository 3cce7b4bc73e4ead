//! # Form Store
//!
//! The persistence and query interface for wheel specifications.
//!
//! A store is injected into the HTTP layer as `Arc<dyn FormStore>`. The
//! unique constraint on form number is enforced inside `create`, atomically
//! with the insert, so concurrent submissions of the same form number
//! yield exactly one success.

mod errors;
mod file;
mod memory;
mod table;

pub use errors::{StoreError, StoreResult};
pub use file::FileFormStore;
pub use memory::InMemoryFormStore;

use crate::forms::{ListFilter, NewWheelSpecification, WheelSpecification};

/// Storage interface for wheel specifications.
///
/// Implementations block (the durable store fsyncs); async callers should
/// run them on a blocking thread.
pub trait FormStore: Send + Sync {
    /// Insert a validated submission.
    ///
    /// Returns the stored row with its id and timestamps, or
    /// `DuplicateKey` if the form number already exists.
    fn create(&self, new: NewWheelSpecification) -> StoreResult<WheelSpecification>;

    /// Rows matching every set filter, newest first. Zero matches is
    /// an empty success.
    fn list(&self, filter: &ListFilter) -> StoreResult<Vec<WheelSpecification>>;

    /// Number of stored rows.
    fn count(&self) -> StoreResult<usize>;
}
