//! Wire DTOs for the client/server JSON boundary.
//!
//! DESIGN
//! ======
//! These types mirror the backend's response schemas so serde round-trips
//! stay lossless. Field names follow this crate's vocabulary; where the
//! server uses a different name (`creator_username`), a serde alias accepts
//! the server spelling.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Login credentials submitted to the token endpoint.
///
/// The backend accepts a username or an email in the identifier slot; this
/// client always submits the email.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Payload for account creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Bearer token issued by `POST /auth/token`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque bearer credential for subsequent authorized requests.
    pub access_token: String,
    /// Token scheme, `"bearer"` in practice.
    pub token_type: String,
}

/// Full account record returned by register and profile endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// The slice of account identity the session keeps and persists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    pub email: String,
}

impl From<Account> for UserInfo {
    fn from(account: Account) -> Self {
        Self {
            username: account.username,
            email: account.email,
        }
    }
}

/// A published news article.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Unique article identifier; identity for cache lookups.
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Cover image URL, if one was uploaded.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Author display name; the server sends this as `creator_username`.
    #[serde(default, alias = "creator_username")]
    pub author: Option<String>,
    /// ISO 8601 creation timestamp, server-assigned.
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// One page of the news list as returned by `GET /news`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPage {
    pub items: Vec<NewsItem>,
    /// Total matching articles across all pages.
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// Payload for creating an article.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsDraft {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial update for an existing article; unset fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Result of a multipart image upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    /// Public URL of the stored image.
    pub url: String,
}
