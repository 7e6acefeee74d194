//! Bloom REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`
//! - The server is the source of truth for the catalog, cart sync, wishlist
//!   and orders; nothing is cached here
//! - The bearer token is read from the [`SessionStore`](crate::SessionStore)
//!   on each request, so logging in or out takes effect immediately
//! - Failed requests are reported, never retried
//!
//! # Example
//!
//! ```rust,ignore
//! use bloom_client::{ApiClient, ProductQuery};
//!
//! let api = ApiClient::new(&config, session.clone())?;
//! let page = api.products(&ProductQuery::default().search("rose")).await?;
//! for product in page.data {
//!     println!("{} {}", product.name, product.discounted_price());
//! }
//! ```

mod client;
mod query;

pub use client::ApiClient;
pub use query::ProductQuery;

use thiserror::Error;

/// Errors that can occur when calling the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Server answered with a non-success status code.
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Server answered 2xx but flagged the request as unsuccessful.
    #[error("Request failed: {0}")]
    Unsuccessful(String),

    /// A successful envelope carried no data.
    #[error("Response contained no data")]
    MissingData,
}

impl ApiError {
    /// Whether the server rejected the request for lack of valid credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}
