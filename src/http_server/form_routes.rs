//! Wheel Specification HTTP Routes
//!
//! - `POST /wheel-specifications/` - validate and store a submission
//! - `GET  /wheel-specifications/` - filtered listing, newest first

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::forms::response::{CREATED_MESSAGE, LISTED_MESSAGE};
use crate::forms::validate::{parse_form_date, MSG_BAD_DATE, SUBMITTED_DATE};
use crate::forms::{
    validate_submission, ApiResponse, ListFilter, ListItemView, SubmissionView, ValidationErrors,
};
use crate::observability::{log_event_at, log_event_with_fields, Event, Severity};
use crate::store::{FormStore, StoreError, StoreResult};

use super::errors::{ApiError, ApiResult};

// ==================
// Shared State
// ==================

/// State shared across form handlers
pub struct FormsState {
    pub store: Arc<dyn FormStore>,
}

impl FormsState {
    pub fn new(store: Arc<dyn FormStore>) -> Self {
        Self { store }
    }

    /// Run a blocking store call off the async executor.
    async fn with_store<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn FormStore) -> StoreResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| StoreError::unavailable(format!("Store task failed: {}", e)))?
    }
}

// ==================
// Request Types
// ==================

/// Query string of the listing endpoint. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub form_number: Option<String>,
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub submitted_date: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ListQuery {
    pub fn into_filter(self) -> Result<ListFilter, ValidationErrors> {
        let mut filter = ListFilter::all();
        if let Some(form_number) = non_empty(self.form_number) {
            filter = filter.with_form_number(form_number);
        }
        if let Some(submitted_by) = non_empty(self.submitted_by) {
            filter = filter.with_submitted_by(submitted_by);
        }
        if let Some(raw) = non_empty(self.submitted_date) {
            let date = parse_form_date(&raw)
                .ok_or_else(|| ValidationErrors::single(SUBMITTED_DATE, MSG_BAD_DATE))?;
            filter = filter.with_submitted_date(date);
        }
        Ok(filter)
    }
}

// ==================
// Routes
// ==================

/// Create wheel specification routes
pub fn form_routes(state: Arc<FormsState>) -> Router {
    Router::new()
        .route(
            "/wheel-specifications/",
            get(list_wheel_specifications_handler).post(create_wheel_specification_handler),
        )
        .route(
            "/wheel-specifications",
            get(list_wheel_specifications_handler).post(create_wheel_specification_handler),
        )
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn create_wheel_specification_handler(
    State(state): State<Arc<FormsState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SubmissionView>>)> {
    let Json(payload) = payload?;

    let new = validate_submission(&payload).map_err(|errors| {
        let fields = errors.fields().collect::<Vec<_>>().join(",");
        log_event_at(Severity::Warn, Event::FormRejected, &[("fields", fields.as_str())]);
        ApiError::Validation(errors)
    })?;

    let form_number = new.form_number.clone();
    let record = state
        .with_store(move |store| store.create(new))
        .await
        .map_err(|err| {
            match &err {
                StoreError::DuplicateKey(_) => log_event_at(
                    Severity::Warn,
                    Event::DuplicateFormNumber,
                    &[("form_number", form_number.as_str())],
                ),
                StoreError::StorageUnavailable(message) => log_event_at(
                    Severity::Error,
                    Event::StorageFailure,
                    &[("form_number", form_number.as_str()), ("reason", message.as_str())],
                ),
            }
            ApiError::from(err)
        })?;

    let id = record.id.to_string();
    log_event_with_fields(
        Event::FormCreated,
        &[("form_number", record.form_number.as_str()), ("id", id.as_str())],
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(CREATED_MESSAGE, SubmissionView::from(&record))),
    ))
}

async fn list_wheel_specifications_handler(
    State(state): State<Arc<FormsState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Vec<ListItemView>>>> {
    let Query(query) = query?;
    let filter = query.into_filter().map_err(ApiError::Validation)?;

    let records = state
        .with_store(move |store| store.list(&filter))
        .await
        .map_err(|err| {
            if let StoreError::StorageUnavailable(message) = &err {
                log_event_at(
                    Severity::Error,
                    Event::StorageFailure,
                    &[("reason", message.as_str())],
                );
            }
            ApiError::from(err)
        })?;

    let count = records.len().to_string();
    log_event_with_fields(Event::FormsListed, &[("count", count.as_str())]);

    let items = records.iter().map(ListItemView::from).collect();
    Ok(Json(ApiResponse::ok(LISTED_MESSAGE, items)))
}
