//! HTTP-level integration tests for the promotion endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! over the in-memory store, without a TCP listener or database.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, delete, get, post_json, promotion_json, put_json, send_json};
use promotrack_core::promotion::IdentityMode;

const MARCH_START: &str = "2024-03-01T00:00:00+07:00";
const MARCH_END: &str = "2024-03-31T23:59:59+07:00";

// ---------------------------------------------------------------------------
// Business-key mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_assigned_id() {
    let app = common::build_test_app(IdentityMode::BusinessKey);
    let response = post_json(
        &app,
        "/api/v1/promotions",
        promotion_json(Some("cae8651b"), MARCH_START, MARCH_END),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["id"].is_number());
    assert_eq!(json["data"]["promotion_code"], "cae8651b");
    assert_eq!(json["data"]["name"], "Ramadhan Sale");
    assert_eq!(json["data"]["discount_type"], "percentage");
    assert_eq!(json["data"]["discount_value"], 10.5);
    assert!(json["data"]["created_at"].is_string());
}

#[tokio::test]
async fn overlapping_create_with_same_code_returns_409() {
    let app = common::build_test_app(IdentityMode::BusinessKey);

    let first = post_json(
        &app,
        "/api/v1/promotions",
        promotion_json(Some("cae8651b"), "2024-03-01T00:00:00Z", "2024-03-31T00:00:00Z"),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let overlapping = post_json(
        &app,
        "/api/v1/promotions",
        promotion_json(Some("cae8651b"), "2024-03-15T00:00:00Z", "2024-04-15T00:00:00Z"),
    )
    .await;
    assert_eq!(overlapping.status(), StatusCode::CONFLICT);
    let json = body_json(overlapping).await;
    assert_eq!(json["code"], "CONFLICT");

    let next_month = post_json(
        &app,
        "/api/v1/promotions",
        promotion_json(Some("cae8651b"), "2024-04-01T00:00:00Z", "2024-04-30T00:00:00Z"),
    )
    .await;
    assert_eq!(next_month.status(), StatusCode::CREATED);

    let list = body_json(get(&app, "/api/v1/promotions").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn list_is_sorted_by_start_date() {
    let app = common::build_test_app(IdentityMode::BusinessKey);
    for (code, start, end) in [
        ("late", "2024-06-01T00:00:00Z", "2024-06-30T00:00:00Z"),
        ("early", "2024-01-01T00:00:00Z", "2024-01-31T00:00:00Z"),
        ("mid", "2024-03-01T00:00:00Z", "2024-03-31T00:00:00Z"),
    ] {
        let response =
            post_json(&app, "/api/v1/promotions", promotion_json(Some(code), start, end)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(get(&app, "/api/v1/promotions").await).await;
    let codes: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["promotion_code"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(codes, vec!["early", "mid", "late"]);
}

#[tokio::test]
async fn get_by_code_returns_promotion() {
    let app = common::build_test_app(IdentityMode::BusinessKey);
    post_json(
        &app,
        "/api/v1/promotions",
        promotion_json(Some("cae8651b"), MARCH_START, MARCH_END),
    )
    .await;

    let response = get(&app, "/api/v1/promotions/cae8651b").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["promotion_code"], "cae8651b");
}

#[tokio::test]
async fn get_unknown_code_returns_404() {
    let app = common::build_test_app(IdentityMode::BusinessKey);
    let response = get(&app, "/api/v1/promotions/zzz000").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn update_to_same_window_returns_200() {
    let app = common::build_test_app(IdentityMode::BusinessKey);
    post_json(
        &app,
        "/api/v1/promotions",
        promotion_json(Some("cae8651b"), MARCH_START, MARCH_END),
    )
    .await;

    let mut body = promotion_json(None, MARCH_START, MARCH_END);
    body["name"] = "Ramadhan Sale (extended copy)".into();
    let response = put_json(&app, "/api/v1/promotions/cae8651b", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Ramadhan Sale (extended copy)");
    assert_eq!(json["data"]["promotion_code"], "cae8651b");
}

#[tokio::test]
async fn update_changing_code_returns_400() {
    let app = common::build_test_app(IdentityMode::BusinessKey);
    post_json(
        &app,
        "/api/v1/promotions",
        promotion_json(Some("cae8651b"), MARCH_START, MARCH_END),
    )
    .await;

    let response = put_json(
        &app,
        "/api/v1/promotions/cae8651b",
        promotion_json(Some("new-code"), MARCH_START, MARCH_END),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn update_unknown_code_returns_404() {
    let app = common::build_test_app(IdentityMode::BusinessKey);
    let response = put_json(
        &app,
        "/api/v1/promotions/zzz000",
        promotion_json(None, MARCH_START, MARCH_END),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_204_then_404() {
    let app = common::build_test_app(IdentityMode::BusinessKey);
    post_json(
        &app,
        "/api/v1/promotions",
        promotion_json(Some("cae8651b"), MARCH_START, MARCH_END),
    )
    .await;

    let response = delete(&app, "/api/v1/promotions/cae8651b").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, "/api/v1/promotions/cae8651b").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(&app, "/api/v1/promotions/cae8651b").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inverted_window_returns_400() {
    let app = common::build_test_app(IdentityMode::BusinessKey);
    let response = post_json(
        &app,
        "/api/v1/promotions",
        promotion_json(Some("cae8651b"), "2024-04-01T00:00:00Z", "2024-03-01T00:00:00Z"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_code_in_business_mode_returns_400() {
    let app = common::build_test_app(IdentityMode::BusinessKey);
    let response = post_json(
        &app,
        "/api/v1/promotions",
        promotion_json(None, MARCH_START, MARCH_END),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let app = common::build_test_app(IdentityMode::BusinessKey);
    let response = send_json(
        &app,
        Method::POST,
        "/api/v1/promotions",
        "{\"name\": ".to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn missing_required_field_returns_400() {
    let app = common::build_test_app(IdentityMode::BusinessKey);
    let response = post_json(
        &app,
        "/api/v1/promotions",
        serde_json::json!({"promotion_code": "cae8651b", "name": "No dates"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Surrogate-id mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn surrogate_mode_addresses_by_numeric_id() {
    let app = common::build_test_app(IdentityMode::SurrogateId);
    let created = body_json(
        post_json(
            &app,
            "/api/v1/promotions",
            promotion_json(None, MARCH_START, MARCH_END),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = get(&app, &format!("/api/v1/promotions/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        &app,
        &format!("/api/v1/promotions/{id}"),
        promotion_json(None, MARCH_START, MARCH_END),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete(&app, &format!("/api/v1/promotions/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn surrogate_mode_rejects_non_numeric_id() {
    let app = common::build_test_app(IdentityMode::SurrogateId);
    let response = get(&app, "/api/v1/promotions/cae8651b").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn surrogate_mode_checks_overlap_across_all_promotions() {
    let app = common::build_test_app(IdentityMode::SurrogateId);
    let first = post_json(
        &app,
        "/api/v1/promotions",
        promotion_json(Some("aaa111"), "2024-03-01T00:00:00Z", "2024-03-31T00:00:00Z"),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(
        &app,
        "/api/v1/promotions",
        promotion_json(Some("bbb222"), "2024-03-31T00:00:00Z", "2024-04-10T00:00:00Z"),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}
