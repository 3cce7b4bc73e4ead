//! Forms API Scenario Tests
//!
//! Drives the full router in-process:
//! - submission success and echo shape
//! - field-scoped validation failures
//! - duplicate form numbers
//! - filtered, newest-first listings
//! - health check and malformed requests
//! - storage failures

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use kpa_forms::http_server::{build_router, HttpServerConfig};
use kpa_forms::forms::{ListFilter, NewWheelSpecification, WheelSpecification};
use kpa_forms::store::{FileFormStore, FormStore, InMemoryFormStore, StoreError, StoreResult};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const COLLECTION: &str = "/api/forms/wheel-specifications/";

// =============================================================================
// Test Utilities
// =============================================================================

fn app_with(store: Arc<dyn FormStore>) -> Router {
    build_router(&HttpServerConfig::default(), store)
}

fn app() -> Router {
    app_with(Arc::new(InMemoryFormStore::new()))
}

/// A store whose backing file is gone.
struct UnavailableStore;

const UNAVAILABLE_REASON: &str = "fsync failed on /var/lib/kpa-forms/data";

impl FormStore for UnavailableStore {
    fn create(&self, _new: NewWheelSpecification) -> StoreResult<WheelSpecification> {
        Err(StoreError::unavailable(UNAVAILABLE_REASON))
    }

    fn list(&self, _filter: &ListFilter) -> StoreResult<Vec<WheelSpecification>> {
        Err(StoreError::unavailable(UNAVAILABLE_REASON))
    }

    fn count(&self) -> StoreResult<usize> {
        Err(StoreError::unavailable(UNAVAILABLE_REASON))
    }
}

fn measurements() -> Value {
    json!({
        "treadDiameterNew": "915 (900-1000)",
        "lastShopIssueSize": "837 (800-900)",
        "condemningDia": "825 (800-900)",
        "wheelGauge": "1600 (+2,-1)",
        "variationSameAxle": "0.5",
        "variationSameBogie": "5",
        "variationSameCoach": "13",
        "wheelProfile": "29.4 Flange Thickness",
        "intermediateWWP": "20 TO 28",
        "bearingSeatDiameter": "130.043 TO 130.068",
        "rollerBearingOuterDia": "280 (+0.0/-0.035)",
        "rollerBearingBoreDia": "130 (+0.0/-0.025)",
        "rollerBearingWidth": "93 (+0/-0.250)",
        "axleBoxHousingBoreDia": "280 (+0.030/+0.052)",
        "wheelDiscWidth": "127 (+4/-0)"
    })
}

fn payload(form_number: &str, submitted_by: &str, submitted_date: &str) -> Value {
    json!({
        "formNumber": form_number,
        "submittedBy": submitted_by,
        "submittedDate": submitted_date,
        "fields": measurements(),
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn post_json(app: &Router, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(COLLECTION)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn form_numbers(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["formNumber"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_returns_201_with_metadata_echo() {
    let app = app();
    let (status, body) = post_json(&app, &payload("WHEEL-2024-001", "Asha", "2024-03-01")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Wheel specification submitted successfully.",
            "data": {
                "formNumber": "WHEEL-2024-001",
                "submittedBy": "Asha",
                "submittedDate": "2024-03-01",
                "status": "saved"
            }
        })
    );
}

#[tokio::test]
async fn test_create_without_trailing_slash() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/forms/wheel-specifications")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload("WHEEL-9", "Asha", "2024-03-01").to_string()))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_duplicate_form_number_rejected() {
    let app = app();
    let first = payload("WHEEL-001", "Asha", "2024-03-01");
    assert_eq!(post_json(&app, &first).await.0, StatusCode::CREATED);

    let (status, body) = post_json(&app, &payload("WHEEL-001", "Ravi", "2024-03-02")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"formNumber": ["wheel specification with this form number already exists."]})
    );

    let (_, listed) = get(&app, COLLECTION).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["submittedBy"], "Asha");
}

#[tokio::test]
async fn test_bad_prefix_rejected() {
    let app = app();
    let (status, body) = post_json(&app, &payload("FORM-001", "Asha", "2024-03-01")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"formNumber": ["Form number must start with 'WHEEL-'"]}));
}

#[tokio::test]
async fn test_all_field_errors_reported_together() {
    let app = app();
    let mut fields = measurements();
    fields.as_object_mut().unwrap().remove("wheelGauge");
    fields["variationSameAxle"] = json!("x".repeat(21));
    let body = json!({
        "formNumber": "",
        "submittedDate": "01-03-2024",
        "fields": fields,
    });

    let (status, errors) = post_json(&app, &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors["formNumber"], json!(["This field may not be blank."]));
    assert_eq!(errors["submittedBy"], json!(["This field is required."]));
    assert_eq!(
        errors["submittedDate"],
        json!(["Date has wrong format. Use one of these formats instead: YYYY-MM-DD."])
    );
    assert_eq!(errors["fields"]["wheelGauge"], json!(["This field is required."]));
    assert_eq!(
        errors["fields"]["variationSameAxle"],
        json!(["Ensure this field has no more than 20 characters."])
    );

    let (_, listed) = get(&app, COLLECTION).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_object_body_rejected() {
    let app = app();
    let (status, body) = post_json(&app, &json!(["WHEEL-1"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"non_field_errors": ["Invalid data. Expected a dictionary, but got list."]})
    );
}

#[tokio::test]
async fn test_malformed_json_is_detail_error() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri(COLLECTION)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"formNumber\": "))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("JSON parse error - "));
}

#[tokio::test]
async fn test_missing_content_type_is_unsupported() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri(COLLECTION)
        .body(Body::from(payload("WHEEL-1", "Asha", "2024-03-01").to_string()))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["detail"].is_string());
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_list_filters_and_summarizes() {
    let app = app();
    post_json(&app, &payload("WHEEL-001", "Asha", "2024-03-01")).await;
    post_json(&app, &payload("WHEEL-002", "Ravi", "2024-03-01")).await;
    post_json(&app, &payload("WHEEL-003", "Asha", "2024-03-02")).await;

    let (status, body) = get(
        &app,
        "/api/forms/wheel-specifications/?submittedBy=Asha&submittedDate=2024-03-01",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Filtered wheel specification forms fetched successfully."
    );
    assert_eq!(
        body["data"],
        json!([{
            "formNumber": "WHEEL-001",
            "submittedBy": "Asha",
            "submittedDate": "2024-03-01",
            "wheelFields": {
                "condemningDia": "825 (800-900)",
                "lastShopIssueSize": "837 (800-900)",
                "treadDiameterNew": "915 (900-1000)",
                "wheelGauge": "1600 (+2,-1)"
            },
            "status": "saved"
        }])
    );
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = app();
    for n in ["WHEEL-A", "WHEEL-B", "WHEEL-C"] {
        post_json(&app, &payload(n, "Asha", "2024-03-01")).await;
    }

    let (_, body) = get(&app, COLLECTION).await;
    assert_eq!(form_numbers(&body), vec!["WHEEL-C", "WHEEL-B", "WHEEL-A"]);
}

#[tokio::test]
async fn test_list_no_match_is_empty_success() {
    let app = app();
    post_json(&app, &payload("WHEEL-001", "Asha", "2024-03-01")).await;

    let (status, body) = get(&app, "/api/forms/wheel-specifications/?formNumber=WHEEL-404").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_list_filter_is_exact_match() {
    let app = app();
    post_json(&app, &payload("WHEEL-001", "Asha", "2024-03-01")).await;

    let (_, body) = get(&app, "/api/forms/wheel-specifications/?submittedBy=asha").await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_list_empty_filter_values_ignored() {
    let app = app();
    post_json(&app, &payload("WHEEL-001", "Asha", "2024-03-01")).await;

    let (status, body) = get(
        &app,
        "/api/forms/wheel-specifications/?formNumber=&submittedDate=",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form_numbers(&body), vec!["WHEEL-001"]);
}

#[tokio::test]
async fn test_list_bad_date_filter_rejected() {
    let app = app();
    let (status, body) = get(&app, "/api/forms/wheel-specifications/?submittedDate=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"submittedDate": ["Date has wrong format. Use one of these formats instead: YYYY-MM-DD."]})
    );
}

// =============================================================================
// Storage Failure
// =============================================================================

#[tokio::test]
async fn test_storage_failure_is_503_without_cause() {
    let app = app_with(Arc::new(UnavailableStore));
    let expected = json!({"detail": "Storage is temporarily unavailable."});

    let (status, body) = post_json(&app, &payload("WHEEL-001", "Asha", "2024-03-01")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, expected);
    assert!(!body.to_string().contains("fsync"));

    let (status, body) = get(&app, "/api/forms/wheel-specifications/?formNumber=WHEEL-001").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, expected);
    assert!(!body.to_string().contains("fsync"));
}

#[tokio::test]
async fn test_invalid_submission_is_400_even_when_storage_is_down() {
    let app = app_with(Arc::new(UnavailableStore));
    let (status, body) = post_json(&app, &payload("FORM-001", "Asha", "2024-03-01")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"formNumber": ["Form number must start with 'WHEEL-'"]}));
}

// =============================================================================
// Health and Durability
// =============================================================================

#[tokio::test]
async fn test_health_with_and_without_slash() {
    let app = app();
    for uri in ["/health/", "/health"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "message": "API is running"}));
    }
}

#[tokio::test]
async fn test_submissions_survive_restart() {
    let dir = TempDir::new().unwrap();
    {
        let store = FileFormStore::open(dir.path()).unwrap();
        let app = app_with(Arc::new(store));
        let (status, _) = post_json(&app, &payload("WHEEL-001", "Asha", "2024-03-01")).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let store = FileFormStore::open(dir.path()).unwrap();
    let app = app_with(Arc::new(store));
    let (_, body) = get(&app, "/api/forms/wheel-specifications/?formNumber=WHEEL-001").await;
    assert_eq!(form_numbers(&body), vec!["WHEEL-001"]);

    let (status, _) = post_json(&app, &payload("WHEEL-001", "Ravi", "2024-03-05")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
