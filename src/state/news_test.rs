use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::executor::block_on;

use super::*;
use crate::net::types::NewsPage;

// =============================================================
// Fixtures
// =============================================================

fn item(id: i64) -> NewsItem {
    NewsItem {
        id,
        title: format!("headline {id}"),
        description: format!("story {id}"),
        image_url: None,
        author: Some("alice".to_owned()),
        created_at: "2025-01-01T00:00:00Z".to_owned(),
        updated_at: None,
        category: None,
    }
}

/// Deterministic page fixture over `total` articles. A search query shifts
/// ids by 1000 so filtered results are distinguishable from the open feed.
fn page_fixture(total: u64, page: u32, limit: u32, query: Option<&str>) -> NewsPage {
    let offset = if query.is_some() { 1000 } else { 0 };
    let start = u64::from(page - 1) * u64::from(limit);
    let count = u64::from(limit).min(total.saturating_sub(start));
    let items = (0..count).map(|i| item(offset + (start + i + 1) as i64)).collect();
    NewsPage {
        items,
        total,
        page,
        limit,
        total_pages: total.div_ceil(u64::from(limit)) as u32,
    }
}

/// Future that returns `Pending` once before completing, forcing an await
/// point so two catalog operations can interleave under a local executor.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

struct FakeNewsApi {
    total: u64,
    list_calls: Cell<u32>,
    list_error: RefCell<Option<ApiError>>,
    /// Pages whose list response yields once before resolving.
    slow_pages: RefCell<Vec<u32>>,
    update_result: RefCell<Option<NewsItem>>,
}

impl FakeNewsApi {
    fn with_total(total: u64) -> Rc<Self> {
        Rc::new(Self {
            total,
            list_calls: Cell::new(0),
            list_error: RefCell::new(None),
            slow_pages: RefCell::new(Vec::new()),
            update_result: RefCell::new(None),
        })
    }
}

impl NewsApi for Rc<FakeNewsApi> {
    async fn list(&self, page: u32, limit: u32, query: Option<&str>) -> Result<NewsPage, ApiError> {
        self.list_calls.set(self.list_calls.get() + 1);
        if self.slow_pages.borrow().contains(&page) {
            YieldOnce(false).await;
        }
        if let Some(error) = self.list_error.borrow().clone() {
            return Err(error);
        }
        Ok(page_fixture(self.total, page, limit, query))
    }

    async fn get(&self, id: i64) -> Result<NewsItem, ApiError> {
        if id as u64 <= self.total { Ok(item(id)) } else { Err(ApiError::NotFound) }
    }

    async fn create(&self, draft: &NewsDraft) -> Result<NewsItem, ApiError> {
        let mut created = item(900);
        created.title = draft.title.clone();
        created.description = draft.description.clone();
        Ok(created)
    }

    async fn update(&self, id: i64, patch: &NewsPatch) -> Result<NewsItem, ApiError> {
        if let Some(forced) = self.update_result.borrow().clone() {
            return Ok(forced);
        }
        let mut updated = item(id);
        if let Some(title) = &patch.title {
            updated.title = title.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, _id: i64) -> Result<(), ApiError> {
        Ok(())
    }

    async fn upload_image(
        &self,
        file_name: &str,
        _mime_type: &str,
        _bytes: &[u8],
    ) -> Result<crate::net::types::UploadedImage, ApiError> {
        Ok(crate::net::types::UploadedImage {
            url: format!("/uploads/{file_name}"),
        })
    }
}

fn catalog(api: &Rc<FakeNewsApi>) -> NewsCatalog<Rc<FakeNewsApi>> {
    NewsCatalog::new(Rc::clone(api), 12)
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn catalog_starts_empty_and_optimistic() {
    let state = catalog(&FakeNewsApi::with_total(0)).state();
    assert!(state.items.is_empty());
    assert_eq!(state.current_page, 1);
    assert_eq!(state.total, 0);
    assert!(!state.is_loading);
    assert!(state.has_more);
    assert!(state.query.is_none());
    assert!(state.error.is_none());
}

// =============================================================
// Pagination walk: 50 articles, pages of 12
// =============================================================

#[test]
fn pagination_walk_over_fifty_articles() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);

    block_on(catalog.fetch_news(1, 12, None)).unwrap();
    let state = catalog.state();
    assert_eq!(state.items.len(), 12);
    assert_eq!(state.total, 50);
    assert!(state.has_more);

    for _ in 0..3 {
        block_on(catalog.load_more_news()).unwrap();
    }
    let state = catalog.state();
    assert_eq!(state.items.len(), 48);
    assert_eq!(state.current_page, 4);
    assert!(state.has_more);

    block_on(catalog.load_more_news()).unwrap();
    let state = catalog.state();
    assert_eq!(state.items.len(), 50);
    assert!(!state.has_more);

    // Exhausted: a further call is a strict no-op with no network call.
    let calls = api.list_calls.get();
    block_on(catalog.load_more_news()).unwrap();
    assert_eq!(api.list_calls.get(), calls);
    assert_eq!(catalog.state().items.len(), 50);
}

#[test]
fn items_are_appended_in_server_order_without_duplicates() {
    let api = FakeNewsApi::with_total(30);
    let catalog = catalog(&api);
    block_on(catalog.fetch_news(1, 12, None)).unwrap();
    block_on(catalog.load_more_news()).unwrap();

    let ids: Vec<i64> = catalog.state().items.iter().map(|i| i.id).collect();
    let expected: Vec<i64> = (1..=24).collect();
    assert_eq!(ids, expected);
}

#[test]
fn has_more_matches_invariant_after_every_fetch() {
    let api = FakeNewsApi::with_total(10);
    let catalog = catalog(&api);
    block_on(catalog.fetch_news(1, 12, None)).unwrap();
    let state = catalog.state();
    assert_eq!(state.items.len(), 10);
    assert!(!state.has_more);

    block_on(catalog.load_more_news()).unwrap();
    assert_eq!(api.list_calls.get(), 1);
}

#[test]
fn page_one_replaces_previous_items() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    block_on(catalog.fetch_news(1, 12, None)).unwrap();
    block_on(catalog.load_more_news()).unwrap();
    assert_eq!(catalog.state().items.len(), 24);

    block_on(catalog.fetch_news(1, 12, None)).unwrap();
    let state = catalog.state();
    assert_eq!(state.items.len(), 12);
    assert_eq!(state.current_page, 1);
}

// =============================================================
// Search
// =============================================================

#[test]
fn search_resets_to_page_one_and_records_query() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    block_on(catalog.fetch_news(1, 12, None)).unwrap();
    block_on(catalog.load_more_news()).unwrap();

    block_on(catalog.search_news("climate")).unwrap();
    let state = catalog.state();
    assert_eq!(state.current_page, 1);
    assert_eq!(state.query.as_deref(), Some("climate"));
    assert_eq!(state.items.first().map(|i| i.id), Some(1001));
    assert_eq!(state.items.len(), 12);
}

#[test]
fn load_more_carries_the_active_query() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    block_on(catalog.search_news("climate")).unwrap();
    block_on(catalog.load_more_news()).unwrap();

    let state = catalog.state();
    assert_eq!(state.items.len(), 24);
    // Second page of the filtered id space, not the open feed.
    assert_eq!(state.items[12].id, 1013);
    assert_eq!(state.query.as_deref(), Some("climate"));
}

#[test]
fn empty_search_clears_the_filter() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    block_on(catalog.search_news("climate")).unwrap();
    block_on(catalog.search_news("")).unwrap();

    let state = catalog.state();
    assert!(state.query.is_none());
    assert_eq!(state.items.first().map(|i| i.id), Some(1));
}

// =============================================================
// In-flight guard and stale responses
// =============================================================

#[test]
fn load_more_is_a_no_op_while_a_fetch_is_in_flight() {
    let api = FakeNewsApi::with_total(50);
    api.slow_pages.borrow_mut().push(1);
    let catalog = catalog(&api);

    block_on(async {
        futures::join!(catalog.fetch_news(1, 12, None), catalog.load_more_news())
    })
    .0
    .unwrap();

    // Only the original fetch reached the network.
    assert_eq!(api.list_calls.get(), 1);
    let state = catalog.state();
    assert_eq!(state.items.len(), 12);
    assert!(!state.is_loading);
}

#[test]
fn superseded_fetch_result_is_discarded() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    block_on(catalog.fetch_news(1, 12, None)).unwrap();

    // The load-more response arrives after a new search has landed; its
    // page-2 items must not be appended to the filtered list.
    api.slow_pages.borrow_mut().push(2);
    block_on(async {
        let (stale, fresh) =
            futures::join!(catalog.load_more_news(), catalog.search_news("climate"));
        stale.unwrap();
        fresh.unwrap();
    });

    let state = catalog.state();
    assert_eq!(state.items.len(), 12);
    assert_eq!(state.items.first().map(|i| i.id), Some(1001));
    assert_eq!(state.current_page, 1);
    assert_eq!(state.query.as_deref(), Some("climate"));
    assert!(!state.is_loading);
}

// =============================================================
// Failures
// =============================================================

#[test]
fn fetch_failure_clears_loading_and_records_error() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    block_on(catalog.fetch_news(1, 12, None)).unwrap();

    *api.list_error.borrow_mut() = Some(ApiError::Network("connection refused".to_owned()));
    let err = block_on(catalog.load_more_news()).unwrap_err();

    assert_eq!(err, ApiError::Network("connection refused".to_owned()));
    let state = catalog.state();
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some("network error: connection refused"));
    // Cached items survive the failed page load.
    assert_eq!(state.items.len(), 12);
}

#[test]
fn failed_search_records_the_attempted_query() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    block_on(catalog.search_news("politics")).unwrap();

    *api.list_error.borrow_mut() = Some(ApiError::Network("offline".to_owned()));
    assert!(block_on(catalog.search_news("climate")).is_err());

    let state = catalog.state();
    assert_eq!(state.query.as_deref(), Some("climate"));
    assert!(state.error.is_some());

    // Recovery pages the new filter, not the one the failed search replaced.
    *api.list_error.borrow_mut() = None;
    block_on(catalog.load_more_news()).unwrap();
    let state = catalog.state();
    assert_eq!(state.query.as_deref(), Some("climate"));
    assert_eq!(state.items[12].id, 1013);
}

#[test]
fn fetch_success_clears_a_previous_error() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    *api.list_error.borrow_mut() = Some(ApiError::Network("offline".to_owned()));
    assert!(block_on(catalog.fetch_news(1, 12, None)).is_err());

    *api.list_error.borrow_mut() = None;
    block_on(catalog.fetch_news(1, 12, None)).unwrap();
    assert!(catalog.state().error.is_none());
}

// =============================================================
// Create / update / delete
// =============================================================

fn draft() -> NewsDraft {
    NewsDraft {
        title: "fresh headline".to_owned(),
        description: "fresh story".to_owned(),
        image_url: None,
    }
}

#[test]
fn create_prepends_and_increments_total() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    block_on(catalog.fetch_news(1, 12, None)).unwrap();

    let created = block_on(catalog.create_news(&draft())).unwrap();

    let state = catalog.state();
    assert_eq!(state.items.first().map(|i| i.id), Some(created.id));
    assert_eq!(state.items.len(), 13);
    assert_eq!(state.total, 51);
}

#[test]
fn update_replaces_cached_item_in_place() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    block_on(catalog.fetch_news(1, 12, None)).unwrap();

    let patch = NewsPatch {
        title: Some("revised".to_owned()),
        ..NewsPatch::default()
    };
    block_on(catalog.update_news(5, &patch)).unwrap();

    let state = catalog.state();
    assert_eq!(state.items[4].id, 5);
    assert_eq!(state.items[4].title, "revised");
    assert_eq!(state.items.len(), 12);
}

#[test]
fn update_of_uncached_id_succeeds_but_leaves_items_unchanged() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    block_on(catalog.fetch_news(1, 12, None)).unwrap();
    let before = catalog.state().items.clone();

    // Server-side the update succeeds; id 40 is on an unfetched page.
    let updated = block_on(catalog.update_news(40, &NewsPatch::default())).unwrap();

    assert_eq!(updated.id, 40);
    assert_eq!(catalog.state().items, before);
}

#[test]
fn delete_removes_item_and_decrements_total() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    block_on(catalog.fetch_news(1, 12, None)).unwrap();

    block_on(catalog.delete_news(5)).unwrap();

    let state = catalog.state();
    assert_eq!(state.items.len(), 11);
    assert!(state.items.iter().all(|i| i.id != 5));
    assert_eq!(state.total, 49);
    assert!(state.has_more);
}

// =============================================================
// get_news_by_id pass-through
// =============================================================

#[test]
fn get_news_by_id_returns_item_without_touching_state() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);
    block_on(catalog.fetch_news(1, 12, None)).unwrap();
    let before = catalog.state();

    let fetched = block_on(catalog.get_news_by_id(33)).unwrap();

    assert_eq!(fetched.id, 33);
    assert_eq!(catalog.state(), before);
}

#[test]
fn get_news_by_id_propagates_not_found() {
    let api = FakeNewsApi::with_total(50);
    let catalog = catalog(&api);

    let err = block_on(catalog.get_news_by_id(999)).unwrap_err();
    assert_eq!(err, ApiError::NotFound);
}
