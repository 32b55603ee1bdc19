//! HTTP API layer for storefront-rs.
//!
//! This crate provides the REST API for the review surface:
//!
//! - **Endpoints**: review submission, listing, and deletion
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: request authentication, shared state

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
