//! Client configuration: API base URL and paging defaults.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend location is a deploy-time concern, so it resolves from the
//! build environment with a development fallback. Everything downstream
//! receives a `ClientConfig` instead of reading the environment itself.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Development fallback when `NEWS_API_BASE_URL` is not set at build time.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8001/api/v1";

/// Default page size for news-list requests.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Immutable client configuration shared by services and state containers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the JSON REST API, without a trailing slash.
    pub api_base_url: String,
    /// Items requested per news-list page.
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_base_url(option_env!("NEWS_API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL))
    }
}

impl ClientConfig {
    /// Build a config for an explicit base URL, normalizing trailing slashes.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            api_base_url: base_url.trim_end_matches('/').to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the news-list page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}
