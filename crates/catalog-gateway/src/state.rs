//! Gateway application state.
//!
//! This module defines the shared state that is available to all request handlers.

use std::sync::Arc;

use catalog_store::Store;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
///
/// The store is constructed by the caller and injected here, so every test can
/// run against a fresh catalog.
pub struct GatewayState<S> {
    /// The product catalog.
    pub store: Arc<S>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<S> GatewayState<S>
where
    S: Store,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(store: Arc<S>, config: GatewayConfig) -> Self {
        Self { store, config }
    }
}

impl<S> Clone for GatewayState<S>
where
    S: Store,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}
