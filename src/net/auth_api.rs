//! Authentication service: login, register, and profile endpoints.
//!
//! DESIGN
//! ======
//! `AuthApi` is the seam between session logic and the HTTP transport; the
//! state container is written against the trait so tests can substitute a
//! fake backend. `HttpAuthApi` is the browser implementation over
//! `gloo-net`, gated behind `hydrate` like the rest of the wasm stack.

#[cfg(test)]
#[path = "auth_api_test.rs"]
mod auth_api_test;

use crate::config::ClientConfig;
use crate::net::error::ApiError;
use crate::net::types::{Account, Credentials, Registration, TokenResponse};
use crate::storage::SessionStore;

#[cfg(feature = "hydrate")]
use crate::net::http;

/// Auth endpoints of the backend.
///
/// Futures here are not `Send`; the client is single-threaded and suspends
/// only at network boundaries.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    /// Exchange credentials for a bearer token via `POST /auth/token`.
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError>;

    /// Create an account via `POST /auth/register`.
    async fn register(&self, registration: &Registration) -> Result<Account, ApiError>;

    /// Fetch the authenticated account via `GET /auth/profile`.
    async fn profile(&self) -> Result<Account, ApiError>;
}

/// `gloo-net` implementation of [`AuthApi`].
///
/// Holds a storage handle so every request can attach the current bearer
/// token, the way the original client's request interceptor read the token
/// from `localStorage` on each call.
#[derive(Clone, Debug)]
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
pub struct HttpAuthApi<S> {
    config: ClientConfig,
    store: S,
}

impl<S> HttpAuthApi<S> {
    pub fn new(config: ClientConfig, store: S) -> Self {
        Self { config, store }
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn login_endpoint(base: &str) -> String {
    format!("{base}/auth/token")
}

#[cfg(any(test, feature = "hydrate"))]
fn register_endpoint(base: &str) -> String {
    format!("{base}/auth/register")
}

#[cfg(any(test, feature = "hydrate"))]
fn profile_endpoint(base: &str) -> String {
    format!("{base}/auth/profile")
}

/// Encode credentials as the token endpoint's form body.
///
/// The token endpoint speaks OAuth2 password-grant form encoding only: the
/// body must be `application/x-www-form-urlencoded` with the email in the
/// `username` field. A JSON body is rejected before credential verification.
#[cfg(any(test, feature = "hydrate"))]
fn login_form_body(credentials: &Credentials) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("username", &credentials.email)
        .append_pair("password", &credentials.password)
        .finish()
}

/// Map a login failure to a credential rejection.
///
/// A 401 from the token endpoint means the credentials were refused, not
/// that an established session expired, so it must not trigger the global
/// session-clearing policy.
#[cfg(any(test, feature = "hydrate"))]
fn login_rejection(status: u16, body: &str) -> ApiError {
    match ApiError::from_status(status, body) {
        ApiError::Unauthorized => ApiError::Rejected {
            status,
            message: crate::net::error::error_detail(body)
                .unwrap_or_else(|| "invalid email or password".to_owned()),
        },
        other => other,
    }
}

impl<S: SessionStore> AuthApi for HttpAuthApi<S> {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&login_endpoint(&self.config.api_base_url))
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(login_form_body(credentials))
                .map_err(http::network_error)?
                .send()
                .await
                .map_err(http::network_error)?;
            if !resp.ok() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                return Err(login_rejection(status, &body));
            }
            http::parse_json(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = credentials;
            Err(crate::net::offline_error())
        }
    }

    async fn register(&self, registration: &Registration) -> Result<Account, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let builder =
                gloo_net::http::Request::post(&register_endpoint(&self.config.api_base_url));
            let resp = http::with_bearer(builder, &self.store)
                .json(registration)
                .map_err(http::network_error)?
                .send()
                .await
                .map_err(http::network_error)?;
            if !resp.ok() {
                return Err(http::error_from_response(resp, &self.store).await);
            }
            http::parse_json(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = registration;
            Err(crate::net::offline_error())
        }
    }

    async fn profile(&self) -> Result<Account, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let builder =
                gloo_net::http::Request::get(&profile_endpoint(&self.config.api_base_url));
            let resp = http::with_bearer(builder, &self.store)
                .send()
                .await
                .map_err(http::network_error)?;
            if !resp.ok() {
                return Err(http::error_from_response(resp, &self.store).await);
            }
            http::parse_json(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(crate::net::offline_error())
        }
    }
}
