//! Product records and the payloads that create and modify them.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// A product stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier, immutable after creation.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Category label. Stored casing is preserved; comparisons ignore case.
    pub category: String,
    /// Whether the product is currently available.
    pub in_stock: bool,
}

impl Product {
    /// Build a product from a validated draft and a freshly allocated id.
    #[must_use]
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            category: draft.category,
            in_stock: draft.in_stock,
        }
    }

    /// Case-insensitive exact match on the category.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    /// Case-insensitive substring match on the name.
    #[must_use]
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// The full set of fields needed to create a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Category label.
    pub category: String,
    /// Availability flag.
    pub in_stock: bool,
}

/// A partial update. `None` fields keep their current value.
///
/// A JSON `null` deserializes to `None`, so explicit nulls are ignored as well.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New unit price.
    #[serde(default)]
    pub price: Option<f64>,
    /// New category label.
    #[serde(default)]
    pub category: Option<String>,
    /// New availability flag.
    #[serde(default)]
    pub in_stock: Option<bool>,
}

impl ProductPatch {
    /// Overlay the supplied fields onto `product`. The id is never touched.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }
    }

    /// Whether the patch carries no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.in_stock.is_none()
    }
}
