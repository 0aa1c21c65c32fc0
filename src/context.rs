//! Application-shell wiring for the client core.
//!
//! SYSTEM CONTEXT
//! ==============
//! The shell owns one `ClientContext` and threads it to views instead of
//! relying on ambient global singletons; each contained state object has a
//! single writer.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use crate::config::ClientConfig;
use crate::guard::{AdminExitFlag, RouteDecision, decide};
use crate::net::auth_api::{AuthApi, HttpAuthApi};
use crate::net::news_api::{HttpNewsApi, NewsApi};
use crate::state::auth::AuthSession;
use crate::state::news::NewsCatalog;
use crate::storage::{SessionStore, WebStorage};

/// Everything the application shell owns: config, session, catalog, and the
/// one-shot admin-exit flag consulted by the route guard.
pub struct ClientContext<A, N, S> {
    pub config: ClientConfig,
    pub session: AuthSession<A, S>,
    pub catalog: NewsCatalog<N>,
    pub admin_exit: AdminExitFlag,
}

impl<A: AuthApi, N: NewsApi, S: SessionStore + Clone> ClientContext<A, N, S> {
    /// Wire a context from explicit collaborators.
    pub fn new(config: ClientConfig, auth_api: A, news_api: N, store: S) -> Self {
        let page_size = config.page_size;
        Self {
            config,
            session: AuthSession::new(auth_api, store),
            catalog: NewsCatalog::new(news_api, page_size),
            admin_exit: AdminExitFlag::default(),
        }
    }

    /// Evaluate the route guard against current in-memory session state.
    /// Synchronous; no network call.
    pub fn guard_navigation(&self, requires_auth: bool) -> RouteDecision {
        decide(requires_auth, self.session.is_logged_in(), &self.admin_exit)
    }
}

/// The browser wiring: `gloo-net` services over `localStorage` persistence.
pub type BrowserContext = ClientContext<HttpAuthApi<WebStorage>, HttpNewsApi<WebStorage>, WebStorage>;

impl BrowserContext {
    /// Bootstrap the browser client, restoring any persisted session.
    pub fn bootstrap(config: ClientConfig) -> Self {
        let store = WebStorage;
        let auth_api = HttpAuthApi::new(config.clone(), store);
        let news_api = HttpNewsApi::new(config.clone(), store);
        Self::new(config, auth_api, news_api, store)
    }
}
