//! Allocation preview integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;

use keepsake_common::Config;

use crate::common::{error_code, TestApp};

const PREVIEW: &str = "/v1/allocations/preview";

#[tokio::test]
async fn test_total_is_split_over_projects() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            PREVIEW,
            Some(json!({ "projects": "1,3,5-8", "total": "20" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["projects"], json!([1, 3, 5, 6, 7, 8]));
    assert_eq!(body["projects_display"], "1,3,5-8");
    assert_eq!(body["total"], 20);
    assert_eq!(body["mode"], "total");
    assert_eq!(body["source"], "total");
    assert_eq!(body["per_project_display"], "4,4,3,3,3,3");
    assert_eq!(
        body["per_project"][0],
        json!({ "project_no": 1, "quantity": 4 })
    );
}

#[tokio::test]
async fn test_numeric_total_is_accepted() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            PREVIEW,
            Some(json!({ "projects": "1-3", "total": 10 })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preview"], "Proj. 1: 4 | Proj. 2: 3 | Proj. 3: 3");
}

#[tokio::test]
async fn test_uniform_per_project() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            PREVIEW,
            Some(json!({ "projects": "1,2,3", "per_project": "po 5" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 15);
    assert_eq!(body["mode"], "per_project_uniform");
    assert_eq!(body["per_project_display"], "po 5");
}

#[tokio::test]
async fn test_count_mismatch_is_422_with_kind() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            PREVIEW,
            Some(json!({ "projects": "1,2", "per_project": "4,4,4" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "COUNT_MISMATCH");
}

#[tokio::test]
async fn test_inconsistent_totals_quotes_both_values() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            PREVIEW,
            Some(json!({ "projects": "1,2", "total": "10", "per_project": "po 6" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "INCONSISTENT_TOTALS");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("12"));
    assert!(message.contains("10"));
}

#[tokio::test]
async fn test_malformed_range_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            PREVIEW,
            Some(json!({ "projects": "8-5", "total": "10" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "MALFORMED_RANGE");
}

#[tokio::test]
async fn test_missing_quantity_and_no_projects() {
    let app = TestApp::new();

    let (status, body) = app
        .send(Method::POST, PREVIEW, Some(json!({ "projects": "1-3" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "MISSING_QUANTITY");

    let (status, body) = app
        .send(
            Method::POST,
            PREVIEW,
            Some(json!({ "projects": "", "total": "5" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "NO_PROJECTS");
}

#[tokio::test]
async fn test_configured_limits_apply() {
    let mut config = Config::default();
    config.limits.max_projects_per_line = 3;
    let app = TestApp::with_config(config);

    let (status, body) = app
        .send(
            Method::POST,
            PREVIEW,
            Some(json!({ "projects": "1-4", "total": "8" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "TOO_MANY_PROJECTS");
}

#[tokio::test]
async fn test_zero_total_needs_opt_in() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            PREVIEW,
            Some(json!({ "projects": "1,2", "total": "0" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "MISSING_QUANTITY");

    let mut config = Config::default();
    config.limits.allow_zero_total = true;
    let app = TestApp::with_config(config);
    let (status, body) = app
        .send(
            Method::POST,
            PREVIEW,
            Some(json!({ "projects": "1,2", "total": "0" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_invalid_json_is_400() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::POST, PREVIEW, Some(json!({ "total": "5" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}
