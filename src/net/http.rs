//! Shared `gloo-net` plumbing for the service implementations.
//!
//! Centralizes bearer-header attachment and the global 401 policy so each
//! endpoint wrapper stays a thin request/response translation.

use gloo_net::http::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::net::error::ApiError;
use crate::storage::SessionStore;

/// Attach `Authorization: Bearer <token>` when the store holds a token.
pub(crate) fn with_bearer<S: SessionStore>(builder: RequestBuilder, store: &S) -> RequestBuilder {
    match store.load_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
        None => builder,
    }
}

/// Classify a non-OK response.
///
/// Applies the global authentication policy: a 401 clears the persisted
/// session before the error surfaces, so every caller sees a consistent
/// logged-out state. The login endpoint bypasses this path.
///
/// Only storage is cleared here; the in-memory `AuthSession` still reports
/// logged-in until the shell routes the surfaced error to
/// `AuthSession::handle_api_error`, which restores memory/storage agreement.
pub(crate) async fn error_from_response<S: SessionStore>(resp: Response, store: &S) -> ApiError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let err = ApiError::from_status(status, &body);
    if err == ApiError::Unauthorized {
        log::warn!("request rejected with 401; clearing persisted session");
        store.clear_session();
    }
    err
}

/// Deserialize a successful response body.
pub(crate) async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) fn network_error(e: gloo_net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}
