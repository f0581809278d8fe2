//! HTTP request handlers.
//!
//! This module contains all the endpoint handlers for the catalog API.

pub mod products;
