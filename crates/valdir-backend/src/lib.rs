//! Client for the managed backend that owns products and admin users.

pub mod client;
pub mod error;

pub use client::BackendClient;
pub use error::BackendError;
