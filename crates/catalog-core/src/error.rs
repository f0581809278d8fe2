//! Common error types for the catalog.
//!
//! This module provides shared error types that are used across multiple crates.

use crate::ids::ProductId;
use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors that can occur throughout the catalog.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A product with the specified ID was not found.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// An invalid identifier was provided.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] crate::ids::IdError),
}
