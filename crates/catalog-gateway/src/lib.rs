//! HTTP gateway for the product catalog.
//!
//! This crate provides the public REST API over the in-memory catalog. It
//! handles:
//!
//! - Ordered, first-match-wins route dispatch
//! - Shared-secret authentication via the `x-api-key` header
//! - Product payload validation
//! - Translation of every failure into a single JSON error envelope
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Clients                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  request logger ─▶ trace ─▶ catch-panic ─▶ cors ─▶ limits    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Dispatcher                           │
//! │  ┌──────────┐  ┌──────────────┐  ┌────────┐  ┌──────────┐   │
//! │  │  Body    │─▶│ Route table  │─▶│ Guards │─▶│ Handler  │   │
//! │  │  parser  │  │ (in order)   │  │        │  │          │   │
//! │  └──────────┘  └──────────────┘  └────────┘  └──────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                       ┌──────────────┐
//!                       │ Catalog store│
//!                       └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use catalog_gateway::{create_router, GatewayConfig, GatewayState};
//! use catalog_store::InMemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStore::new());
//! let state = GatewayState::new(store, GatewayConfig::with_api_key("s3cret"));
//!
//! let app = create_router(state)?;
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod routes;
pub mod state;
pub mod validation;

pub use config::{ConfigError, GatewayConfig};
pub use dispatch::{Dispatcher, Guard, RouteError, RouteRequest, RouteTable};
pub use error::ApiError;
pub use routes::{catalog_routes, create_router, create_router_with};
pub use state::GatewayState;
