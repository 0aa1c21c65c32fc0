//! Client-side state containers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` owns the authenticated session and its persistence; `news` owns
//! the paginated catalog cache. Both are explicit context objects owned by
//! the application shell, with a single writer per instance.

pub mod auth;
pub mod news;
