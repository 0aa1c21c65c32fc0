//! News-catalog state: the paginated, search-filtered article cache.
//!
//! DESIGN
//! ======
//! The catalog owns its `NewsApi` and mirrors the server's list view:
//! page 1 replaces the cache, later pages append. One boolean guard per
//! instance prevents duplicate in-flight page loads, and every fetch is
//! tagged with a generation so a response that arrives after a newer fetch
//! superseded it is discarded instead of clobbering fresher state.

#[cfg(test)]
#[path = "news_test.rs"]
mod news_test;

use std::cell::{Cell, RefCell};

use crate::net::error::ApiError;
use crate::net::news_api::NewsApi;
use crate::net::types::{NewsDraft, NewsItem, NewsPatch};

/// Plain catalog data, cloneable for rendering snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogData {
    /// Cached articles in server order; append-only across pages.
    pub items: Vec<NewsItem>,
    /// Page of the most recent successful fetch.
    pub current_page: u32,
    /// Total matching articles reported by the server.
    pub total: u64,
    /// True while a fetch is in flight.
    pub is_loading: bool,
    /// After any successful fetch: exactly `items.len() < total`.
    pub has_more: bool,
    /// Most recently attempted search filter, if any; recorded even when
    /// the fetch that carried it failed.
    pub query: Option<String>,
    /// Message of the most recent failed fetch, cleared on success.
    pub error: Option<String>,
}

impl Default for CatalogData {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total: 0,
            is_loading: false,
            // Optimistic until the first fetch reports a total.
            has_more: true,
            query: None,
            error: None,
        }
    }
}

/// The news catalog held by the application shell.
pub struct NewsCatalog<N> {
    api: N,
    page_size: u32,
    generation: Cell<u64>,
    inner: RefCell<CatalogData>,
}

impl<N: NewsApi> NewsCatalog<N> {
    pub fn new(api: N, page_size: u32) -> Self {
        Self {
            api,
            page_size,
            generation: Cell::new(0),
            inner: RefCell::new(CatalogData::default()),
        }
    }

    /// Snapshot of the current catalog data.
    pub fn state(&self) -> CatalogData {
        self.inner.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.borrow().is_loading
    }

    pub fn has_more(&self) -> bool {
        self.inner.borrow().has_more
    }

    /// Fetch one page of the list.
    ///
    /// Page 1 replaces the cache; later pages append. The loading flag is
    /// cleared on every exit path owned by this call; a superseded call
    /// leaves the flag to its successor.
    pub async fn fetch_news(
        &self,
        page: u32,
        limit: u32,
        query: Option<&str>,
    ) -> Result<(), ApiError> {
        let issue = self.generation.get().wrapping_add(1);
        self.generation.set(issue);
        self.inner.borrow_mut().is_loading = true;

        let result = self.api.list(page, limit, query).await;

        if self.generation.get() != issue {
            // A newer fetch superseded this one while it was in flight; its
            // result owns the state now.
            log::debug!("discarding stale news response for page {page}");
            return Ok(());
        }
        let mut state = self.inner.borrow_mut();
        state.is_loading = false;
        // Recorded on both arms: after a failed search, a retry or load-more
        // continues the attempted filter, not the one it replaced.
        state.query = query.filter(|q| !q.is_empty()).map(str::to_owned);
        match result {
            Ok(fetched) => {
                if page == 1 {
                    state.items = fetched.items;
                } else {
                    state.items.extend(fetched.items);
                }
                state.current_page = page;
                state.total = fetched.total;
                state.has_more = (state.items.len() as u64) < state.total;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("news fetch failed: {e}");
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch the next page with the active query.
    ///
    /// Strict no-op, with no network call, while a fetch is in flight or
    /// when the cache already holds everything the server reported.
    pub async fn load_more_news(&self) -> Result<(), ApiError> {
        let (next_page, query) = {
            let state = self.inner.borrow();
            if !state.has_more || state.is_loading {
                return Ok(());
            }
            (state.current_page + 1, state.query.clone())
        };
        self.fetch_news(next_page, self.page_size, query.as_deref()).await
    }

    /// Start a new search from page 1. An empty query clears the filter.
    pub async fn search_news(&self, query: &str) -> Result<(), ApiError> {
        self.fetch_news(1, self.page_size, Some(query)).await
    }

    /// Create an article; on success it is prepended to the cache.
    pub async fn create_news(&self, draft: &NewsDraft) -> Result<NewsItem, ApiError> {
        let created = self.api.create(draft).await?;
        let mut state = self.inner.borrow_mut();
        state.items.insert(0, created.clone());
        state.total += 1;
        state.has_more = (state.items.len() as u64) < state.total;
        Ok(created)
    }

    /// Update an article; on success the cached copy is replaced in place.
    ///
    /// An id absent from the cache leaves `items` untouched even though the
    /// server-side update succeeded; callers refresh via `fetch_news` when
    /// they need the authoritative view.
    pub async fn update_news(&self, id: i64, patch: &NewsPatch) -> Result<NewsItem, ApiError> {
        let updated = self.api.update(id, patch).await?;
        let mut state = self.inner.borrow_mut();
        if let Some(slot) = state.items.iter_mut().find(|item| item.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Delete an article; on success it is removed from the cache.
    pub async fn delete_news(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(id).await?;
        let mut state = self.inner.borrow_mut();
        state.items.retain(|item| item.id != id);
        state.total = state.total.saturating_sub(1);
        state.has_more = (state.items.len() as u64) < state.total;
        Ok(())
    }

    /// Fetch a single article without touching catalog state.
    ///
    /// Deliberately asymmetric with the other operations: failures propagate
    /// to the caller for page-level handling (a missing article surfaces as
    /// [`ApiError::NotFound`]) instead of being absorbed here.
    pub async fn get_news_by_id(&self, id: i64) -> Result<NewsItem, ApiError> {
        self.api.get(id).await
    }
}
