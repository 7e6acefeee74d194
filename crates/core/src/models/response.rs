//! Response envelopes used by the REST API.

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::product::Product;

/// Generic `{ success, data, message }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload of a successful envelope.
    ///
    /// Returns `Err` with the server's message (or `None` when it sent none)
    /// if `success` is false. A successful envelope without data yields
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the server-provided message when `success` is false.
    pub fn into_result(self) -> Result<Option<T>, Option<String>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.message)
        }
    }
}

/// Body of `GET categories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub success: bool,
    #[serde(default)]
    pub count: u32,
    pub data: Vec<Category>,
}

/// One page of `GET products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub success: bool,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
    pub data: Vec<Product>,
}

impl ProductResponse {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Body of `GET products/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleProductResponse {
    pub success: bool,
    pub data: Product,
}
