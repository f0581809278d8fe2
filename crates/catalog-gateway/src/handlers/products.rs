//! Product catalog endpoints.
//!
//! Handlers are plain synchronous functions registered in the route table.
//! Each one reads or writes the store exactly once, so a failing request
//! leaves the catalog untouched.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use catalog_core::{CoreError, Product, ProductDraft, ProductId, ProductPatch};
use catalog_store::Store;

use crate::dispatch::RouteRequest;
use crate::error::ApiError;
use crate::query::Pagination;
use crate::state::GatewayState;

// =============================================================================
// Response Types
// =============================================================================

/// Response for a paginated product listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsResponse {
    /// Requested page.
    pub page: usize,
    /// Page size.
    pub limit: usize,
    /// Number of pages in the filtered set.
    pub total_pages: usize,
    /// Number of products in the filtered set.
    pub total_items: usize,
    /// Products on this page.
    pub products: Vec<Product>,
}

/// Response for a name search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Number of matches.
    pub count: usize,
    /// Matching products.
    pub results: Vec<Product>,
}

/// Response for a deletion.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Confirmation message.
    pub message: &'static str,
    /// The removed product.
    pub product: Product,
}

/// Aggregate catalog statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Number of products in the catalog.
    pub total_products: usize,
    /// Product count per category, keyed by stored category name.
    pub count_by_category: BTreeMap<String, usize>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List products, optionally filtered by category and paginated.
///
/// ```text
/// GET /products?category=kitchen&page=1&limit=2
///
/// Response: 200 OK
/// { "page": 1, "limit": 2, "totalPages": 1, "totalItems": 2, "products": [...] }
/// ```
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_products<S: Store>(
    state: &GatewayState<S>,
    request: &RouteRequest,
) -> Result<Response, ApiError> {
    let mut products = state.store.list()?;
    if let Some(category) = request.query_param("category") {
        products.retain(|p| p.in_category(category));
    }

    let pagination = Pagination::from_request(request);
    let total_items = products.len();

    let response = ListProductsResponse {
        page: pagination.page,
        limit: pagination.limit,
        total_pages: pagination.total_pages(total_items),
        total_items,
        products: pagination.window(&products).to_vec(),
    };

    Ok(Json(response).into_response())
}

/// Search products by a case-insensitive substring of their name.
///
/// # Errors
///
/// Returns `ApiError::Validation` if `name` is missing and
/// `ApiError::NotFound` if nothing matches.
pub fn search_products<S: Store>(
    state: &GatewayState<S>,
    request: &RouteRequest,
) -> Result<Response, ApiError> {
    let name = request
        .query_param("name")
        .ok_or_else(|| ApiError::Validation("Query parameter 'name' is required".into()))?;

    let results: Vec<Product> = state
        .store
        .list()?
        .into_iter()
        .filter(|p| p.name_contains(name))
        .collect();

    if results.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No products found matching '{name}'"
        )));
    }

    Ok(Json(SearchResponse {
        count: results.len(),
        results,
    })
    .into_response())
}

/// Get a single product by ID.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the id is malformed or unknown.
pub fn get_product<S: Store>(
    state: &GatewayState<S>,
    request: &RouteRequest,
) -> Result<Response, ApiError> {
    let id = product_id(request)?;
    let product = state
        .store
        .find_by_id(id)?
        .ok_or(CoreError::ProductNotFound(id))?;

    Ok(Json(product).into_response())
}

/// Create a product from a validated payload.
///
/// Any `id` in the payload is ignored; the store assigns the next one.
///
/// # Errors
///
/// Returns an error if the payload does not deserialize or the store fails.
pub fn create_product<S: Store>(
    state: &GatewayState<S>,
    request: &RouteRequest,
) -> Result<Response, ApiError> {
    let draft: ProductDraft = request.json()?;
    let product = state.store.insert(draft)?;

    tracing::info!(product_id = %product.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)).into_response())
}

/// Apply a partial update to a product.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the id is malformed or unknown.
pub fn update_product<S: Store>(
    state: &GatewayState<S>,
    request: &RouteRequest,
) -> Result<Response, ApiError> {
    let id = product_id(request)?;
    let patch: ProductPatch = request.json()?;
    if patch.is_empty() {
        tracing::debug!(product_id = %id, "Update carries no changes");
    }

    let product = state
        .store
        .update(id, patch)?
        .ok_or(CoreError::ProductNotFound(id))?;

    tracing::info!(product_id = %id, "Product updated");

    Ok(Json(product).into_response())
}

/// Delete a product, returning the removed record.
///
/// # Errors
///
/// Returns `ApiError::NotFound` if the id is malformed or unknown.
pub fn delete_product<S: Store>(
    state: &GatewayState<S>,
    request: &RouteRequest,
) -> Result<Response, ApiError> {
    let id = product_id(request)?;
    let product = state
        .store
        .delete(id)?
        .ok_or(CoreError::ProductNotFound(id))?;

    tracing::info!(product_id = %id, "Product deleted");

    Ok(Json(DeleteResponse {
        message: "Product deleted",
        product,
    })
    .into_response())
}

/// Catalog-wide statistics, ignoring any filters.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn product_stats<S: Store>(
    state: &GatewayState<S>,
    _request: &RouteRequest,
) -> Result<Response, ApiError> {
    let products = state.store.list()?;

    let mut count_by_category = BTreeMap::new();
    for product in &products {
        *count_by_category.entry(product.category.clone()).or_insert(0) += 1;
    }

    Ok(Json(StatsResponse {
        total_products: products.len(),
        count_by_category,
    })
    .into_response())
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse the `{id}` path parameter.
fn product_id(request: &RouteRequest) -> Result<ProductId, ApiError> {
    let raw = request
        .params
        .get("id")
        .ok_or_else(|| ApiError::Internal(format!("route {} has no id parameter", request.path)))?;
    Ok(raw.parse::<ProductId>().map_err(CoreError::from)?)
}
