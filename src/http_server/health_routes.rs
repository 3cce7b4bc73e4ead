//! Liveness endpoint

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Health check routes, with and without the trailing slash
pub fn health_routes() -> Router {
    Router::new()
        .route("/health/", get(health_handler))
        .route("/health", get(health_handler))
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok",
        message: "API is running",
    };

    (StatusCode::OK, Json(response))
}
