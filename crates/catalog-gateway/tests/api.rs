//! End-to-end tests of the catalog API through the full router.
//!
//! Each test builds a fresh gateway over the sample catalog, so tests never
//! observe each other's mutations.

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use serde_json::{json, Value};

use catalog_gateway::{create_router, GatewayConfig, GatewayState};
use catalog_store::{seed, InMemoryStore};

const API_KEY: &str = "test-key";

fn server() -> TestServer {
    server_with(GatewayConfig::with_api_key(API_KEY))
}

fn server_with(config: GatewayConfig) -> TestServer {
    let store = InMemoryStore::with_products(seed::sample_catalog()).unwrap();
    let state = GatewayState::new(Arc::new(store), config);
    TestServer::new(create_router(state).unwrap()).unwrap()
}

fn wrong_key(request: TestRequest) -> TestRequest {
    request.add_header(
        HeaderName::from_static("x-api-key"),
        HeaderValue::from_static("TEST-KEY"),
    )
}

fn authed(request: TestRequest) -> TestRequest {
    request.add_header(
        HeaderName::from_static("x-api-key"),
        HeaderValue::from_static(API_KEY),
    )
}

fn new_product(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Adjustable LED lamp",
        "price": 39.5,
        "category": "Home",
        "inStock": true,
    })
}

fn assert_envelope(body: &Value, error_type: &str, message: &str) {
    assert_eq!(body["status"], "error");
    assert_eq!(body["errorType"], error_type);
    assert_eq!(body["message"], message);
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn missing_key_is_unauthorized() {
    let server = server();

    let response = server.get("/products").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_envelope(
        &response.json::<Value>(),
        "UnauthorizedError",
        "Invalid or missing API key",
    );
}

#[tokio::test]
async fn wrong_key_is_unauthorized() {
    let server = server();

    let response = wrong_key(server.get("/products")).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejected_create_does_not_mutate() {
    let server = server();

    let response = server.post("/products").json(&new_product("Desk Lamp")).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let stats = authed(server.get("/products/stats")).await.json::<Value>();
    assert_eq!(stats["totalProducts"], 5);
}

#[tokio::test]
async fn rejected_update_does_not_mutate() {
    let server = server();

    let missing = server.put("/products/1").json(&json!({ "price": 999 })).await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);
    let wrong = wrong_key(server.put("/products/1").json(&json!({ "name": "Renamed" }))).await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

    let product = authed(server.get("/products/1")).await.json::<Value>();
    assert_eq!(product["name"], "Wireless Mouse");
    assert_ne!(product["price"], 999.0);
}

#[tokio::test]
async fn rejected_delete_does_not_mutate() {
    let server = server();

    let missing = server.delete("/products/2").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);
    let wrong = wrong_key(server.delete("/products/2")).await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

    let response = authed(server.get("/products/2")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["name"], "Mechanical Keyboard");

    let stats = authed(server.get("/products/stats")).await.json::<Value>();
    assert_eq!(stats["totalProducts"], 5);
}

#[tokio::test]
async fn auth_runs_before_validation() {
    let server = server();

    let response = server.post("/products").json(&json!({ "name": "x" })).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Listing and search
// =============================================================================

#[tokio::test]
async fn second_page_of_two() {
    let server = server();

    let response = authed(
        server
            .get("/products")
            .add_query_param("page", 2)
            .add_query_param("limit", 2),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<Value>();
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["totalItems"], 5);
    let ids: Vec<u64> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 4]);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let server = server();

    let body = authed(server.get("/products").add_query_param("page", 9))
        .await
        .json::<Value>();
    assert_eq!(body["products"], json!([]));
    assert_eq!(body["totalItems"], 5);
}

#[tokio::test]
async fn unparseable_paging_falls_back_to_defaults() {
    let server = server();

    let body = authed(
        server
            .get("/products")
            .add_query_param("page", "abc")
            .add_query_param("limit", 0),
    )
    .await
    .json::<Value>();
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 2);
}

#[tokio::test]
async fn category_filter_applies_before_paging() {
    let server = server();

    let body = authed(server.get("/products").add_query_param("category", "KITCHEN"))
        .await
        .json::<Value>();
    assert_eq!(body["totalItems"], 2);
    assert_eq!(body["totalPages"], 1);
}

#[tokio::test]
async fn search_requires_name() {
    let server = server();

    let response = authed(server.get("/products/search")).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errorType"], "ValidationError");
}

#[tokio::test]
async fn search_without_matches_is_not_found() {
    let server = server();

    let response = authed(server.get("/products/search").add_query_param("name", "zzz")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["errorType"], "NotFoundError");
}

#[tokio::test]
async fn search_matches_case_insensitively() {
    let server = server();

    let body = authed(server.get("/products/search").add_query_param("name", "mOuSe"))
        .await
        .json::<Value>();
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "Wireless Mouse");
}

#[tokio::test]
async fn literal_routes_are_not_captured_as_ids() {
    let server = server();

    let response = authed(server.get("/products/stats")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["totalProducts"], 5);
}

// =============================================================================
// Single product operations
// =============================================================================

#[tokio::test]
async fn get_by_id() {
    let server = server();

    let response = authed(server.get("/products/2")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["name"], "Mechanical Keyboard");
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    let server = server();

    let response = authed(server.get("/products/abc")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_envelope(&response.json::<Value>(), "NotFoundError", "Product not found");
}

#[tokio::test]
async fn create_assigns_increasing_ids() {
    let server = server();

    let first = authed(server.post("/products").json(&new_product("Desk Lamp"))).await;
    assert_eq!(first.status_code(), StatusCode::CREATED);
    let second = authed(server.post("/products").json(&new_product("Floor Lamp"))).await;
    assert_eq!(second.status_code(), StatusCode::CREATED);

    let first_id = first.json::<Value>()["id"].as_u64().unwrap();
    let second_id = second.json::<Value>()["id"].as_u64().unwrap();
    assert_eq!(first_id, 6);
    assert!(second_id > first_id);
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let server = server();

    authed(server.delete("/products/5")).await;
    let created = authed(server.post("/products").json(&new_product("Desk Lamp"))).await;
    assert_eq!(created.json::<Value>()["id"], 6);
}

#[tokio::test]
async fn create_reports_first_missing_field() {
    let server = server();

    let response = authed(server.post("/products").json(&json!({
        "name": "Desk Lamp",
        "price": 10,
    })))
    .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_envelope(
        &response.json::<Value>(),
        "ValidationError",
        "Missing required field: description",
    );
}

#[tokio::test]
async fn create_rejects_wrong_types() {
    let server = server();

    let mut payload = new_product("Desk Lamp");
    payload["price"] = json!("cheap");
    let response = authed(server.post("/products").json(&payload)).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let stats = authed(server.get("/products/stats")).await.json::<Value>();
    assert_eq!(stats["totalProducts"], 5);
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let server = server();

    let response = authed(server.put("/products/1").json(&json!({ "price": 999 }))).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<Value>();
    assert_eq!(body["id"], 1);
    assert_eq!(body["price"], 999.0);
    assert_eq!(body["name"], "Wireless Mouse");
    assert_eq!(body["category"], "Electronics");
}

#[tokio::test]
async fn update_of_missing_product_is_not_found() {
    let server = server();

    let response = authed(server.put("/products/42").json(&json!({ "price": 1 }))).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let server = server();

    let deleted = authed(server.delete("/products/3")).await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    let body = deleted.json::<Value>();
    assert_eq!(body["message"], "Product deleted");
    assert_eq!(body["product"]["name"], "Espresso Machine");

    let response = authed(server.get("/products/3")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let stats = authed(server.get("/products/stats")).await.json::<Value>();
    assert_eq!(stats["totalProducts"], 4);
    assert_eq!(stats["countByCategory"]["Kitchen"], 1);
}

// =============================================================================
// Pipeline edges
// =============================================================================

#[tokio::test]
async fn unknown_route_is_not_found_envelope() {
    let server = server();

    let response = authed(server.get("/orders")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_envelope(&response.json::<Value>(), "NotFoundError", "Route not found");
}

#[tokio::test]
async fn unregistered_method_is_not_found() {
    let server = server();

    let response = authed(server.patch("/products/1")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let server = server();

    let response = authed(
        server
            .post("/products")
            .content_type("application/json")
            .bytes("{\"name\": ".into()),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_envelope(
        &response.json::<Value>(),
        "ValidationError",
        "Malformed JSON body",
    );
}

fn small_body_server() -> TestServer {
    server_with(GatewayConfig {
        max_body_bytes: 64,
        ..GatewayConfig::with_api_key(API_KEY)
    })
}

fn oversized_body() -> String {
    let payload = new_product(&"x".repeat(200)).to_string();
    assert!(payload.len() > 64);
    payload
}

#[tokio::test]
async fn declared_oversize_body_gets_envelope() {
    let server = small_body_server();
    let payload = oversized_body();
    let length = HeaderValue::from_str(&payload.len().to_string()).unwrap();

    let response = authed(
        server
            .post("/products")
            .content_type("application/json")
            .add_header(header::CONTENT_LENGTH, length)
            .bytes(payload.into()),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_envelope(
        &response.json::<Value>(),
        "PayloadTooLargeError",
        "Request body too large",
    );

    let stats = authed(server.get("/products/stats")).await.json::<Value>();
    assert_eq!(stats["totalProducts"], 5);
}

#[tokio::test]
async fn oversize_body_gets_same_envelope_without_declared_length() {
    let server = small_body_server();

    let response = authed(
        server
            .post("/products")
            .content_type("application/json")
            .bytes(oversized_body().into()),
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.json::<Value>()["errorType"], "PayloadTooLargeError");
}
