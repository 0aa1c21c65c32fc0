//! Networking modules for the JSON REST boundary.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth_api` and `news_api` define the service traits plus their `gloo-net`
//! implementations, `types` holds the shared wire schema, and `error` is the
//! single place transport failures are classified.

pub mod auth_api;
pub mod error;
#[cfg(feature = "hydrate")]
mod http;
pub mod news_api;
pub mod types;

#[cfg(not(feature = "hydrate"))]
pub(crate) fn offline_error() -> error::ApiError {
    error::ApiError::Network("not available outside the browser".to_owned())
}
