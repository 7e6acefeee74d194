use std::sync::Arc;

use bloom_core::models::{
    ApiResponse, AuthResponse, Category, CategoryResponse, LoginRequest, OrderRequest, Product,
    ProductResponse, RegisterRequest, SingleProductResponse, User,
};
use bloom_core::{CategoryId, OrderId, ProductId};
use reqwest::{Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};
use url::Url;

use super::{ApiError, ProductQuery};
use crate::config::ClientConfig;
use crate::session::SessionStore;

/// Client for the Bloom REST API.
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.http_timeout)
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                session,
            }),
        })
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the server rejects it.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let auth: AuthResponse = self.send_json(Method::POST, "auth/register", request).await?;
        ensure_success(auth.success, "Registration failed")?;
        Ok(auth)
    }

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the credentials are rejected.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let auth: AuthResponse = self.send_json(Method::POST, "auth/login", request).await?;
        ensure_success(auth.success, "Login failed")?;
        Ok(auth)
    }

    /// Profile of the user the stored token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the token is not accepted.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let envelope: ApiResponse<User> = self.get("auth/me").await?;
        require_data(envelope)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let response: CategoryResponse = self.get("categories").await?;
        ensure_success(response.success, "Could not load categories")?;
        Ok(response.data)
    }

    /// A single category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the category does not exist.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn category(&self, id: &CategoryId) -> Result<Category, ApiError> {
        let envelope: ApiResponse<Category> =
            self.get(&format!("categories/{}", segment(id.as_str()))).await?;
        require_data(envelope)
    }

    /// One page of products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self), fields(page = query.page, limit = query.limit))]
    pub async fn products(&self, query: &ProductQuery) -> Result<ProductResponse, ApiError> {
        let mut url = self.url("products")?;
        query.apply(&mut url);
        let response: ProductResponse = self.send(self.inner.client.get(url)).await?;
        ensure_success(response.success, "Could not load products")?;
        debug!(count = response.count, total = response.total, "Products loaded");
        Ok(response)
    }

    /// Featured products for the home screen.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<Product>, ApiError> {
        let response: ProductResponse = self.get("products/featured").await?;
        ensure_success(response.success, "Could not load featured products")?;
        Ok(response.data)
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let response: SingleProductResponse =
            self.get(&format!("products/{}", segment(id.as_str()))).await?;
        ensure_success(response.success, "Could not load product")?;
        Ok(response.data)
    }

    // =========================================================================
    // Server-side cart and wishlist
    // =========================================================================

    /// Add a product to the user's server-side cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or is rejected.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        let body = json!({ "productId": product_id, "quantity": quantity });
        let envelope: ApiResponse<Value> = self.send_json(Method::POST, "users/cart", &body).await?;
        require_success(envelope)
    }

    /// Change the quantity of a product in the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or is rejected.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let path = format!("users/cart/{}", segment(product_id.as_str()));
        let envelope: ApiResponse<Value> = self
            .send_json(Method::PUT, &path, &json!({ "quantity": quantity }))
            .await?;
        require_success(envelope)
    }

    /// Remove a product from the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or is rejected.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_cart(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let path = format!("users/cart/{}", segment(product_id.as_str()));
        let envelope: ApiResponse<Value> = self.delete(&path).await?;
        require_success(envelope)
    }

    /// Add a product to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or is rejected.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let path = format!("users/wishlist/{}", segment(product_id.as_str()));
        let request = self.inner.client.post(self.url(&path)?);
        let envelope: ApiResponse<Value> = self.send(request).await?;
        require_success(envelope)
    }

    /// Remove a product from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or is rejected.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_wishlist(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let path = format!("users/wishlist/{}", segment(product_id.as_str()));
        let envelope: ApiResponse<Value> = self.delete(&path).await?;
        require_success(envelope)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order. Returns the order document the server created.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the order is rejected.
    #[instrument(skip(self, order), fields(items = order.items.len(), total = %order.total))]
    pub async fn create_order(&self, order: &OrderRequest) -> Result<Value, ApiError> {
        let envelope: ApiResponse<Value> = self.send_json(Method::POST, "orders", order).await?;
        require_data(envelope)
    }

    /// The signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Value>, ApiError> {
        let envelope: ApiResponse<Vec<Value>> = self.get("orders").await?;
        require_data(envelope)
    }

    /// A single order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order(&self, id: &OrderId) -> Result<Value, ApiError> {
        let envelope: ApiResponse<Value> =
            self.get(&format!("orders/{}", segment(id.as_str()))).await?;
        require_data(envelope)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.inner.client.get(self.url(path)?);
        self.send(request).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.inner.client.delete(self.url(path)?);
        self.send(request).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.inner.client.request(method, self.url(path)?).json(body);
        self.send(request).await
    }

    /// Attach the bearer token, send, and decode the JSON body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let request = match self.inner.session.token().await {
            Some(token) if !token.expose_secret().is_empty() => {
                request.bearer_auth(token.expose_secret())
            }
            _ => request,
        };

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiResponse<Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            warn!(status = status.as_u16(), %message, "API request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

// =============================================================================
// Envelope helpers
// =============================================================================

/// Percent-encode an id for use as a single path segment.
fn segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn ensure_success(success: bool, fallback: &str) -> Result<(), ApiError> {
    if success {
        Ok(())
    } else {
        Err(ApiError::Unsuccessful(fallback.to_string()))
    }
}

fn require_success<T>(envelope: ApiResponse<T>) -> Result<(), ApiError> {
    envelope
        .into_result()
        .map(drop)
        .map_err(|message| ApiError::Unsuccessful(message.unwrap_or_else(|| "Request failed".to_string())))
}

fn require_data<T>(envelope: ApiResponse<T>) -> Result<T, ApiError> {
    envelope
        .into_result()
        .map_err(|message| ApiError::Unsuccessful(message.unwrap_or_else(|| "Request failed".to_string())))?
        .ok_or(ApiError::MissingData)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_escapes_reserved_characters() {
        assert_eq!(segment("65a1b2"), "65a1b2");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_require_data_reports_server_message() {
        let envelope = ApiResponse::<Value> {
            success: false,
            data: None,
            message: Some("Out of stock".to_string()),
        };
        let err = require_data(envelope).unwrap_err();
        assert_eq!(err.to_string(), "Request failed: Out of stock");
    }

    #[test]
    fn test_require_data_missing_payload() {
        let envelope = ApiResponse::<Value> {
            success: true,
            data: None,
            message: None,
        };
        assert!(matches!(require_data(envelope), Err(ApiError::MissingData)));
    }

    #[test]
    fn test_require_success_ignores_payload() {
        let envelope = ApiResponse::<Value> {
            success: true,
            data: None,
            message: None,
        };
        assert!(require_success(envelope).is_ok());
    }
}
