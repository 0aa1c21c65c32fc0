//! News service: list, item CRUD, and image upload endpoints.
//!
//! DESIGN
//! ======
//! Same shape as `auth_api`: a trait seam the catalog is written against,
//! plus the `gloo-net` browser implementation. The list endpoint is public
//! but still carries the bearer header when a token is cached, matching the
//! original client's blanket request interceptor.

#[cfg(test)]
#[path = "news_api_test.rs"]
mod news_api_test;

use crate::config::ClientConfig;
use crate::net::error::ApiError;
use crate::net::types::{NewsDraft, NewsItem, NewsPage, NewsPatch, UploadedImage};
use crate::storage::SessionStore;

#[cfg(feature = "hydrate")]
use crate::net::http;

/// News endpoints of the backend.
#[allow(async_fn_in_trait)]
pub trait NewsApi {
    /// Fetch one page via `GET /news?page&limit&q`.
    async fn list(&self, page: u32, limit: u32, query: Option<&str>) -> Result<NewsPage, ApiError>;

    /// Fetch a single article via `GET /news/{id}`.
    async fn get(&self, id: i64) -> Result<NewsItem, ApiError>;

    /// Create an article via `POST /news`.
    async fn create(&self, draft: &NewsDraft) -> Result<NewsItem, ApiError>;

    /// Update an article via `PUT /news/{id}`.
    async fn update(&self, id: i64, patch: &NewsPatch) -> Result<NewsItem, ApiError>;

    /// Delete an article via `DELETE /news/{id}`.
    async fn delete(&self, id: i64) -> Result<(), ApiError>;

    /// Upload a cover image via multipart `POST /news/upload`.
    async fn upload_image(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<UploadedImage, ApiError>;
}

/// `gloo-net` implementation of [`NewsApi`].
#[derive(Clone, Debug)]
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
pub struct HttpNewsApi<S> {
    config: ClientConfig,
    store: S,
}

impl<S> HttpNewsApi<S> {
    pub fn new(config: ClientConfig, store: S) -> Self {
        Self { config, store }
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn news_collection_endpoint(base: &str) -> String {
    format!("{base}/news")
}

#[cfg(any(test, feature = "hydrate"))]
fn news_item_endpoint(base: &str, id: i64) -> String {
    format!("{base}/news/{id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn news_upload_endpoint(base: &str) -> String {
    format!("{base}/news/upload")
}

/// Build the list URL, percent-encoding the optional search term.
#[cfg(any(test, feature = "hydrate"))]
fn news_list_endpoint(base: &str, page: u32, limit: u32, query: Option<&str>) -> String {
    let mut endpoint = format!("{base}/news?page={page}&limit={limit}");
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        endpoint.push_str("&q=");
        for piece in url::form_urlencoded::byte_serialize(q.as_bytes()) {
            endpoint.push_str(piece);
        }
    }
    endpoint
}

#[cfg(feature = "hydrate")]
impl<S: SessionStore> HttpNewsApi<S> {
    async fn send_authorized(
        &self,
        builder: gloo_net::http::RequestBuilder,
    ) -> Result<gloo_net::http::Response, ApiError> {
        let resp = http::with_bearer(builder, &self.store)
            .send()
            .await
            .map_err(http::network_error)?;
        if resp.ok() {
            Ok(resp)
        } else {
            Err(http::error_from_response(resp, &self.store).await)
        }
    }
}

impl<S: SessionStore> NewsApi for HttpNewsApi<S> {
    async fn list(&self, page: u32, limit: u32, query: Option<&str>) -> Result<NewsPage, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = news_list_endpoint(&self.config.api_base_url, page, limit, query);
            let resp = self.send_authorized(gloo_net::http::Request::get(&url)).await?;
            http::parse_json(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (page, limit, query);
            Err(crate::net::offline_error())
        }
    }

    async fn get(&self, id: i64) -> Result<NewsItem, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = news_item_endpoint(&self.config.api_base_url, id);
            let resp = self.send_authorized(gloo_net::http::Request::get(&url)).await?;
            http::parse_json(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = id;
            Err(crate::net::offline_error())
        }
    }

    async fn create(&self, draft: &NewsDraft) -> Result<NewsItem, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = news_collection_endpoint(&self.config.api_base_url);
            let builder = http::with_bearer(gloo_net::http::Request::post(&url), &self.store);
            let resp = builder
                .json(draft)
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
            let _ = draft;
            Err(crate::net::offline_error())
        }
    }

    async fn update(&self, id: i64, patch: &NewsPatch) -> Result<NewsItem, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = news_item_endpoint(&self.config.api_base_url, id);
            let builder = http::with_bearer(gloo_net::http::Request::put(&url), &self.store);
            let resp = builder
                .json(patch)
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
            let _ = (id, patch);
            Err(crate::net::offline_error())
        }
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = news_item_endpoint(&self.config.api_base_url, id);
            // 204 on success; no body to parse.
            self.send_authorized(gloo_net::http::Request::delete(&url)).await?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = id;
            Err(crate::net::offline_error())
        }
    }

    async fn upload_image(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<UploadedImage, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let form = multipart_image(file_name, mime_type, bytes)?;
            let url = news_upload_endpoint(&self.config.api_base_url);
            let builder = http::with_bearer(gloo_net::http::Request::post(&url), &self.store);
            let resp = builder
                .body(form)
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
            let _ = (file_name, mime_type, bytes);
            Err(crate::net::offline_error())
        }
    }
}

/// Build a `FormData` with the image bytes under the `image` field.
#[cfg(feature = "hydrate")]
fn multipart_image(
    file_name: &str,
    mime_type: &str,
    bytes: &[u8],
) -> Result<web_sys::FormData, ApiError> {
    let js_error = |e: wasm_bindgen::JsValue| ApiError::Network(format!("{e:?}"));

    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob =
        web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;
    let form = web_sys::FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename("image", &blob, file_name)
        .map_err(js_error)?;
    Ok(form)
}
