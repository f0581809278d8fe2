//! In-memory storage implementation.
//!
//! This module provides the `InMemoryStore` implementation of the `Store` trait.

use catalog_core::{Product, ProductDraft, ProductId, ProductPatch};
use parking_lot::RwLock;

use crate::error::{Result, StoreError};
use crate::Store;

/// Lock-guarded catalog state.
#[derive(Debug)]
struct Catalog {
    products: Vec<Product>,
    /// High-water mark for id allocation. `None` once the id space is used up.
    next_id: Option<ProductId>,
}

/// Vector-backed storage implementation.
///
/// Owned by the process (or by a single test) rather than living in a global.
#[derive(Debug)]
pub struct InMemoryStore {
    catalog: RwLock<Catalog>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: RwLock::new(Catalog {
                products: Vec::new(),
                next_id: Some(ProductId::FIRST),
            }),
        }
    }

    /// Create a store pre-populated with `drafts`, assigning ids in order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::IdSpaceExhausted` if the drafts cannot all be given ids.
    pub fn with_products(drafts: impl IntoIterator<Item = ProductDraft>) -> Result<Self> {
        let store = Self::new();
        for draft in drafts {
            store.insert(draft)?;
        }
        Ok(store)
    }

    /// Number of products currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.catalog.read().products.len()
    }

    /// Whether the store holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalog.read().products.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for InMemoryStore {
    fn list(&self) -> Result<Vec<Product>> {
        Ok(self.catalog.read().products.clone())
    }

    fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        let catalog = self.catalog.read();
        Ok(catalog.products.iter().find(|p| p.id == id).cloned())
    }

    fn insert(&self, draft: ProductDraft) -> Result<Product> {
        let mut catalog = self.catalog.write();
        let id = catalog.next_id.ok_or(StoreError::IdSpaceExhausted)?;
        catalog.next_id = id.successor();

        let product = Product::from_draft(id, draft);
        catalog.products.push(product.clone());
        tracing::debug!(product_id = %id, "Product inserted");

        Ok(product)
    }

    fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>> {
        let mut catalog = self.catalog.write();
        let Some(product) = catalog.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        patch.apply(product);
        Ok(Some(product.clone()))
    }

    fn delete(&self, id: ProductId) -> Result<Option<Product>> {
        let mut catalog = self.catalog.write();
        let Some(index) = catalog.products.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        let removed = catalog.products.remove(index);
        tracing::debug!(product_id = %id, "Product removed");
        Ok(Some(removed))
    }
}
