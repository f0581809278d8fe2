//! Core types for the product catalog service.
//!
//! This crate provides the foundational types shared by the store and the gateway:
//!
//! - **Identifiers**: [`ProductId`], a strictly-parsed positive integer
//! - **Records**: [`Product`] plus the [`ProductDraft`] and [`ProductPatch`]
//!   payloads used to create and update it
//! - **Error types**: [`CoreError`] and [`IdError`]
//!
//! # Example
//!
//! ```
//! use catalog_core::{Product, ProductDraft, ProductId, ProductPatch};
//!
//! let draft = ProductDraft {
//!     name: "Desk Lamp".into(),
//!     description: "Adjustable LED lamp".into(),
//!     price: 39.5,
//!     category: "Home".into(),
//!     in_stock: true,
//! };
//! let mut product = Product::from_draft(ProductId::new(7).unwrap(), draft);
//!
//! ProductPatch { price: Some(29.0), ..ProductPatch::default() }.apply(&mut product);
//! assert_eq!(product.price, 29.0);
//! assert!(product.in_category("HOME"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod product;

pub use error::{CoreError, Result};
pub use ids::{IdError, ProductId};
pub use product::{Product, ProductDraft, ProductPatch};
