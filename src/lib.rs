//! kpa-forms - wheel specification submission service
//!
//! Validates, stores and lists wheel specification forms over a small
//! HTTP API backed by a checksummed append-only record file.

pub mod cli;
pub mod forms;
pub mod http_server;
pub mod observability;
pub mod storage;
pub mod store;
