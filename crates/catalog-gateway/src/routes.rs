//! Router configuration.
//!
//! This module declares the catalog route table and wraps its dispatcher in
//! the Axum router and middleware stack.

use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use catalog_store::Store;

use crate::dispatch::{self, Dispatcher, Guard, RouteError, RouteTable};
use crate::error::panic_response;
use crate::handlers::products;
use crate::middleware::{envelope_layer_rejections, log_request};
use crate::state::GatewayState;
use crate::validation::Schema;

/// The catalog route table, one registration per method and pattern.
///
/// # Routes
///
/// All routes require the `x-api-key` header.
///
/// - `GET /products` - List products (category filter, pagination)
/// - `GET /products/search` - Search by name
/// - `GET /products/stats` - Catalog statistics
/// - `POST /products` - Create product (validated)
/// - `GET /products/{id}` - Get product
/// - `PUT /products/{id}` - Partially update product (validated)
/// - `DELETE /products/{id}` - Delete product
///
/// The literal `search` and `stats` routes are registered before
/// `/products/{id}`, which would otherwise capture them.
pub fn catalog_routes<S: Store>() -> RouteTable<S> {
    const AUTH: &[Guard] = &[Guard::ApiKey];
    const AUTH_CREATE: &[Guard] = &[Guard::ApiKey, Guard::Validate(Schema::Create)];
    const AUTH_UPDATE: &[Guard] = &[Guard::ApiKey, Guard::Validate(Schema::Update)];

    RouteTable::new()
        .route(Method::GET, "/products", AUTH, products::list_products::<S>)
        .route(Method::GET, "/products/search", AUTH, products::search_products::<S>)
        .route(Method::GET, "/products/stats", AUTH, products::product_stats::<S>)
        .route(Method::POST, "/products", AUTH_CREATE, products::create_product::<S>)
        .route(Method::GET, "/products/{id}", AUTH, products::get_product::<S>)
        .route(Method::PUT, "/products/{id}", AUTH_UPDATE, products::update_product::<S>)
        .route(Method::DELETE, "/products/{id}", AUTH, products::delete_product::<S>)
}

/// Create the gateway router with the catalog routes and middleware.
///
/// # Errors
///
/// Returns `RouteError::Duplicate` if the route table shadows a registration.
pub fn create_router<S>(state: GatewayState<S>) -> Result<Router, RouteError>
where
    S: Store + 'static,
{
    create_router_with(catalog_routes(), state)
}

/// Create a router around an arbitrary route table.
///
/// Layers are listed innermost first, so the request logger sees every
/// request before anything else runs. Body-limit and timeout rejections are
/// rewritten into the JSON error envelope, and panics anywhere below the
/// catch-panic layer become `InternalError` responses.
///
/// # Errors
///
/// Returns `RouteError::Duplicate` if `table` shadows a registration.
pub fn create_router_with<S>(table: RouteTable<S>, state: GatewayState<S>) -> Result<Router, RouteError>
where
    S: Store + 'static,
{
    table.ensure_unique()?;
    for route in table.describe() {
        tracing::debug!(route = %route, "Route registered");
    }

    // Extract config values before moving state
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    let dispatcher = Arc::new(Dispatcher::new(table, state));

    let router = Router::new()
        .fallback(dispatch::dispatch::<S>)
        // Middleware
        .layer(TimeoutLayer::new(request_timeout))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(axum::middleware::map_response(envelope_layer_rejections))
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(log_request))
        .with_state(dispatcher);

    Ok(router)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_store::InMemoryStore;

    use crate::config::GatewayConfig;

    #[test]
    fn catalog_table_has_no_duplicates() {
        let table = catalog_routes::<InMemoryStore>();
        assert!(table.ensure_unique().is_ok());
        assert_eq!(table.len(), 7);
    }

    #[test]
    fn every_catalog_route_requires_api_key() {
        let table = catalog_routes::<InMemoryStore>();
        for route in table.describe() {
            assert!(route.contains("api-key"), "unprotected route: {route}");
        }
    }

    #[test]
    fn literal_routes_precede_id_route() {
        let table = catalog_routes::<InMemoryStore>();
        let (search, _) = table.resolve(&Method::GET, "/products/search").unwrap();
        assert_eq!(search.pattern().as_str(), "/products/search");
        let (stats, _) = table.resolve(&Method::GET, "/products/stats").unwrap();
        assert_eq!(stats.pattern().as_str(), "/products/stats");
    }

    #[test]
    fn mutating_routes_validate_after_auth() {
        let table = catalog_routes::<InMemoryStore>();
        let (create, _) = table.resolve(&Method::POST, "/products").unwrap();
        assert_eq!(
            create.guards(),
            &[Guard::ApiKey, Guard::Validate(Schema::Create)]
        );
        let (update, _) = table.resolve(&Method::PUT, "/products/1").unwrap();
        assert_eq!(
            update.guards(),
            &[Guard::ApiKey, Guard::Validate(Schema::Update)]
        );
    }

    #[test]
    fn duplicate_table_is_rejected() {
        let table = catalog_routes::<InMemoryStore>().route(
            Method::GET,
            "/products",
            &[],
            products::list_products::<InMemoryStore>,
        );
        let state = GatewayState::new(Arc::new(InMemoryStore::new()), GatewayConfig::default());
        assert!(matches!(
            create_router_with(table, state),
            Err(RouteError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn body_limit_rejection_is_enveloped() {
        use axum::body::Body;
        use axum::http::{header, Request, StatusCode};
        use http_body_util::BodyExt;
        use tower::ServiceExt;

        let config = GatewayConfig {
            max_body_bytes: 8,
            ..GatewayConfig::with_api_key("k")
        };
        let state = GatewayState::new(Arc::new(InMemoryStore::new()), config);
        let router = create_router(state).unwrap();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/products")
            .header("x-api-key", "k")
            .header(header::CONTENT_LENGTH, "30")
            .body(Body::from(r#"{"name":"0123456789012345678"}"#))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["errorType"], "PayloadTooLargeError");
    }

    #[test]
    fn cors_any_origin() {
        let origins = vec!["*".to_string()];
        let _layer = build_cors_layer(&origins);
    }

    #[test]
    fn cors_specific_origins() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "https://app.example.com".to_string(),
        ];
        let _layer = build_cors_layer(&origins);
    }
}
