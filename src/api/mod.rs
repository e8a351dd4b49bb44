//! Client for the external archive REST API.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
