//! Storage layer for the product catalog.
//!
//! The [`Store`] trait is the contract the gateway depends on. [`InMemoryStore`]
//! is the only implementation: a lock-guarded vector of products that assigns
//! identifiers itself, so id allocation and insertion happen in one critical
//! section.
//!
//! # Example
//!
//! ```
//! use catalog_store::{seed, InMemoryStore, Store};
//!
//! let store = InMemoryStore::with_products(seed::sample_catalog()).unwrap();
//! assert_eq!(store.list().unwrap().len(), 5);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod memory;
pub mod seed;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;

use catalog_core::{Product, ProductDraft, ProductId, ProductPatch};

/// The storage trait defining all catalog operations.
///
/// Every method is synchronous and completes without yielding, which makes each
/// call atomic with respect to other requests.
pub trait Store: Send + Sync {
    /// List every product in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn list(&self) -> Result<Vec<Product>>;

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>>;

    /// Allocate the next identifier and store a new product.
    ///
    /// The assigned id is strictly greater than any id the store has ever
    /// handed out; ids of deleted products are not reused.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::IdSpaceExhausted` if no further id can be allocated.
    fn insert(&self, draft: ProductDraft) -> Result<Product>;

    /// Apply a partial update, returning the updated record.
    ///
    /// Returns `Ok(None)` if no product has the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>>;

    /// Remove a product, returning the removed record.
    ///
    /// Returns `Ok(None)` if no product has the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn delete(&self, id: ProductId) -> Result<Option<Product>>;
}
