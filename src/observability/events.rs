//! Observable events for the forms service
//!
//! Every log line names exactly one of these events. Events are explicit
//! and typed so that log consumers can match on a closed set of names.

use std::fmt;

/// Observable events in the forms service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Process startup begins
    BootStart,
    /// Configuration file loaded and validated
    ConfigLoaded,
    /// Data directory initialized
    DataDirInitialized,
    /// Record store opened and verified
    StoreOpened,
    /// Record store failed verification on open (FATAL)
    StoreCorruption,
    /// HTTP listener bound, ready for requests
    Serving,

    // Requests
    /// An HTTP request finished
    RequestCompleted,

    // Form operations
    /// A submission passed validation and was persisted
    FormCreated,
    /// A submission failed validation
    FormRejected,
    /// A submission collided with an existing form number
    DuplicateFormNumber,
    /// A filtered listing was served
    FormsListed,
    /// The record store could not complete an operation
    StorageFailure,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "FORMS_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DataDirInitialized => "DATA_DIR_INITIALIZED",
            Event::StoreOpened => "STORE_OPENED",
            Event::StoreCorruption => "STORE_CORRUPTION",
            Event::Serving => "FORMS_SERVING",
            Event::RequestCompleted => "REQUEST_COMPLETE",
            Event::FormCreated => "FORM_CREATED",
            Event::FormRejected => "FORM_REJECTED",
            Event::DuplicateFormNumber => "FORM_DUPLICATE",
            Event::FormsListed => "FORMS_LISTED",
            Event::StorageFailure => "STORAGE_FAILURE",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StoreCorruption)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
