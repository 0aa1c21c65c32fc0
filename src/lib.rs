//! # newsdesk-client
//!
//! Framework-independent core of a browser client for a news publishing
//! site: a public, paginated and searchable news feed plus an admin surface
//! (login/register, create/edit/delete articles) gated by bearer-token
//! authentication.
//!
//! This crate contains the HTTP service wrappers, the session and catalog
//! state containers, the navigation-guard decision function, and durable
//! session persistence. Rendering, routing, and build tooling live in the
//! host application. Real browser I/O is gated behind the `hydrate`
//! feature; default builds compile the same logic against inert stubs so
//! the whole crate tests natively.

pub mod config;
pub mod context;
pub mod guard;
pub mod net;
pub mod state;
pub mod storage;

/// Install the browser logging backend and panic hook.
///
/// No-op outside `hydrate` builds; native hosts install their own logger.
pub fn init_logging() {
    #[cfg(feature = "hydrate")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Debug);
    }
}
