//! API error taxonomy shared by services and state containers.
//!
//! ERROR HANDLING
//! ==============
//! Transport rejections are classified once, here, so state containers can
//! react to categories (401 clears the session, 404 propagates to the page)
//! instead of re-parsing status codes at every call site. The `Display`
//! output of every variant is suitable for direct display to the user.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failure of a service call, classified for caller policy.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Request reached the server and was rejected; `message` comes from the
    /// response body when the body carried one.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// Authentication rejected on an authorized call. The global policy
    /// clears the session when this surfaces.
    #[error("authentication required")]
    Unauthorized,
    /// The requested resource does not exist.
    #[error("not found")]
    NotFound,
    /// The request never produced a server response.
    #[error("network error: {0}")]
    Network(String),
    /// The server responded but the body did not match the expected schema.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify an HTTP error status plus the raw response body.
    ///
    /// The backend reports failures as `{"detail": "..."}`; when that shape
    /// is present its message is surfaced, otherwise a generic one is built
    /// from the status code.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            _ => Self::Rejected {
                status,
                message: error_detail(body)
                    .unwrap_or_else(|| format!("request failed with status {status}")),
            },
        }
    }
}

/// Extract the `detail` message from an error body, if present and textual.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(str::to_owned)
}
