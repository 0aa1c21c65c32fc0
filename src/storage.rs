//! Durable key-value persistence for the authenticated session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session mirrors two values into client storage: the raw bearer token
//! under `token` and the JSON-serialized user record under `user`. Writes
//! and removals are always paired so a reader between operations never
//! observes a half-logged-in state.
//!
//! The token is stored as a bare string in readable client storage; it is a
//! capability credential with no confidentiality guarantee.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::net::types::UserInfo;

/// Storage key for the raw bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key for the serialized user record.
pub const USER_KEY: &str = "user";

/// Paired persistence for the session's token and user record.
pub trait SessionStore {
    /// Read the persisted token, if any.
    fn load_token(&self) -> Option<String>;

    /// Read and deserialize the persisted user record, if any.
    fn load_user(&self) -> Option<UserInfo>;

    /// Persist token and user together.
    fn save_session(&self, token: &str, user: &UserInfo);

    /// Remove token and user together. Idempotent.
    fn clear_session(&self);
}

/// Browser `localStorage` backend.
///
/// Reads and writes are real only under the `hydrate` feature; elsewhere the
/// store is inert, mirroring how server-side builds stub browser I/O.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebStorage;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl SessionStore for WebStorage {
    fn load_token(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.get_item(TOKEN_KEY).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn load_user(&self) -> Option<UserInfo> {
        #[cfg(feature = "hydrate")]
        {
            let raw = local_storage()?.get_item(USER_KEY).ok().flatten()?;
            serde_json::from_str(&raw).ok()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn save_session(&self, token: &str, user: &UserInfo) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = local_storage() else {
                return;
            };
            let Ok(raw) = serde_json::to_string(user) else {
                return;
            };
            let _ = storage.set_item(TOKEN_KEY, token);
            let _ = storage.set_item(USER_KEY, &raw);
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (token, user);
        }
    }

    fn clear_session(&self) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = local_storage() else {
                return;
            };
            let _ = storage.remove_item(TOKEN_KEY);
            let _ = storage.remove_item(USER_KEY);
        }
    }
}

/// In-memory session store for native hosts and tests.
///
/// Clones share the same underlying cell, so a service holding one handle
/// and a session holding another observe the same persisted state.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryCell>>,
}

#[derive(Debug, Default)]
struct MemoryCell {
    token: Option<String>,
    user: Option<UserInfo>,
}

impl SessionStore for MemoryStore {
    fn load_token(&self) -> Option<String> {
        self.inner.borrow().token.clone()
    }

    fn load_user(&self) -> Option<UserInfo> {
        self.inner.borrow().user.clone()
    }

    fn save_session(&self, token: &str, user: &UserInfo) {
        let mut cell = self.inner.borrow_mut();
        cell.token = Some(token.to_owned());
        cell.user = Some(user.clone());
    }

    fn clear_session(&self) {
        let mut cell = self.inner.borrow_mut();
        cell.token = None;
        cell.user = None;
    }
}
