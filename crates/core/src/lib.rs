//! Core business logic for storefront-rs.

pub mod services;

pub use services::*;
