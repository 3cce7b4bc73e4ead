//! # Forms HTTP Server Module
//!
//! Axum server exposing the wheel specification API.
//!
//! # Endpoints
//!
//! - `/health/` - Health check
//! - `/api/forms/wheel-specifications/` - Create and list wheel specifications

pub mod config;
pub mod errors;
pub mod form_routes;
pub mod health_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{build_router, HttpServer};
