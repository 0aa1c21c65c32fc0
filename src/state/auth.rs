//! Authenticated-session state: token, user record, and lifecycle.
//!
//! DESIGN
//! ======
//! The session owns its `AuthApi` and `SessionStore` collaborators and is
//! held by the application shell as an explicit context object rather than
//! an ambient singleton. Interior mutability keeps operations on `&self`;
//! borrows are taken and released around network awaits, never across them,
//! so a `logout` racing a `check_auth_status` resolves last-writer-wins
//! without ever leaving token and user inconsistent.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::RefCell;

use crate::net::auth_api::AuthApi;
use crate::net::error::ApiError;
use crate::net::types::{Credentials, Registration, UserInfo};
use crate::storage::SessionStore;

/// What `register` does after the account is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegisterPolicy {
    /// Chain into `login` with the registration credentials (the default,
    /// matching the production flow).
    #[default]
    AutoLogin,
    /// Leave the session untouched; the caller directs the user to log in.
    RecordOnly,
}

/// Outcome of a successful registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Account created and a session established.
    LoggedIn,
    /// Account created, but the chained login failed; the registration
    /// itself still counts as a success.
    ManualLoginRequired,
    /// Account created under [`RegisterPolicy::RecordOnly`]; session untouched.
    Registered,
}

/// Plain session data: the cached credential and identity.
///
/// Invariant: logged-in status is exactly `token.is_some()`, and `user` is
/// present whenever `token` is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionData {
    pub token: Option<String>,
    pub user: Option<UserInfo>,
}

/// The authentication session held by the application shell.
pub struct AuthSession<A, S> {
    api: A,
    store: S,
    policy: RegisterPolicy,
    inner: RefCell<SessionData>,
}

impl<A: AuthApi, S: SessionStore> AuthSession<A, S> {
    /// Create a session, restoring any persisted state.
    ///
    /// A half-persisted state (one key present without the other) restores
    /// as logged out and the storage is repaired to match.
    pub fn new(api: A, store: S) -> Self {
        let restored = match (store.load_token(), store.load_user()) {
            (Some(token), Some(user)) => SessionData {
                token: Some(token),
                user: Some(user),
            },
            (None, None) => SessionData::default(),
            _ => {
                log::warn!("half-persisted session found; clearing");
                store.clear_session();
                SessionData::default()
            }
        };
        Self {
            api,
            store,
            policy: RegisterPolicy::default(),
            inner: RefCell::new(restored),
        }
    }

    /// Override the registration policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RegisterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Snapshot of the current session data.
    pub fn data(&self) -> SessionData {
        self.inner.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.borrow().token.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.borrow().token.clone()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.inner.borrow().user.clone()
    }

    /// Exchange credentials for a session.
    ///
    /// On success the token and a user record derived from the credentials
    /// are stored in memory and persisted in one paired write. On failure
    /// the session is unchanged and the error's display form is the
    /// user-facing message.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let token = match self.api.login(credentials).await {
            Ok(token) => token.access_token,
            Err(e) => {
                log::warn!("login failed: {e}");
                return Err(e);
            }
        };
        // The token endpoint returns no identity, so derive the record from
        // the credentials; `check_auth_status` refreshes it from the profile.
        let user = UserInfo {
            username: email_local_part(&credentials.email),
            email: credentials.email.clone(),
        };
        self.store.save_session(&token, &user);
        let mut inner = self.inner.borrow_mut();
        inner.token = Some(token);
        inner.user = Some(user);
        log::info!("logged in as {}", credentials.email);
        Ok(())
    }

    /// Create an account, then apply the configured [`RegisterPolicy`].
    pub async fn register(&self, registration: &Registration) -> Result<RegisterOutcome, ApiError> {
        let account = self.api.register(registration).await?;
        match self.policy {
            RegisterPolicy::RecordOnly => {
                log::info!("registered account {}", account.username);
                Ok(RegisterOutcome::Registered)
            }
            RegisterPolicy::AutoLogin => {
                let credentials = Credentials {
                    email: registration.email.clone(),
                    password: registration.password.clone(),
                };
                match self.login(&credentials).await {
                    Ok(()) => Ok(RegisterOutcome::LoggedIn),
                    Err(e) => {
                        log::warn!("registered, but auto-login failed: {e}");
                        Ok(RegisterOutcome::ManualLoginRequired)
                    }
                }
            }
        }
    }

    /// Clear the session in memory and in durable storage. No network call.
    /// Idempotent.
    pub fn logout(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.token = None;
            inner.user = None;
        }
        self.store.clear_session();
    }

    /// Validate the cached token against the profile endpoint.
    ///
    /// Without a token this answers `false` immediately, with no network
    /// call. A valid token refreshes the cached user info; any failure
    /// (rejection or transport) clears the whole session.
    pub async fn check_auth_status(&self) -> bool {
        if self.token().is_none() {
            return false;
        }
        match self.api.profile().await {
            Ok(account) => {
                let mut inner = self.inner.borrow_mut();
                // A logout that landed while the request was in flight wins;
                // do not resurrect the cleared session.
                let Some(token) = inner.token.clone() else {
                    return false;
                };
                let user = UserInfo::from(account);
                self.store.save_session(&token, &user);
                inner.user = Some(user);
                true
            }
            Err(e) => {
                log::warn!("auth status check failed: {e}");
                self.logout();
                false
            }
        }
    }

    /// Central hook for the global authentication policy: an
    /// [`ApiError::Unauthorized`] from any call clears the session.
    pub fn handle_api_error(&self, error: &ApiError) {
        if *error == ApiError::Unauthorized {
            log::warn!("authentication rejected; clearing session");
            self.logout();
        }
    }
}

/// Derive a display username from an email's local part.
fn email_local_part(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_owned()
}
