//! Integration tests for Bloom.
//!
//! Every test runs the real client against a `wiremock` server standing in
//! for the REST API, with the session file kept in a temporary directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bloom-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Cart pricing through the shared, thread-safe ledger
//! - `api_client` - Request shape, auth header and error mapping
//! - `context` - Login, logout, landing and checkout workflows

#![cfg_attr(not(test), forbid(unsafe_code))]

use bloom_client::{AppContext, ClientConfig, SessionStore};
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;
use wiremock::MockServer;

/// A mock API server plus a scratch directory for the session file.
pub struct TestBackend {
    pub server: MockServer,
    dir: TempDir,
}

impl TestBackend {
    /// Start a fresh mock server.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Client configuration pointing at `{server}/api/`.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a valid URL.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        let base = Url::parse(&format!("{}/api", self.server.uri())).expect("Invalid mock URI");
        let mut config = ClientConfig::new(base);
        config.session_path = self.dir.path().join("session.json");
        config
    }

    /// A context with no stored session.
    ///
    /// # Panics
    ///
    /// Panics if the context cannot be initialized.
    pub async fn context(&self) -> AppContext {
        AppContext::init(self.config())
            .await
            .expect("Failed to init context")
    }

    /// A context whose session already holds `token`.
    ///
    /// # Panics
    ///
    /// Panics if the session cannot be written or the context cannot be
    /// initialized.
    pub async fn logged_in_context(&self, token: &str) -> AppContext {
        let session = SessionStore::load(self.config().session_path)
            .await
            .expect("Failed to load session");
        session.save_token(token).await.expect("Failed to save token");
        self.context().await
    }
}

/// Product JSON in the shape the API returns.
#[must_use]
pub fn product_json(id: &str, name: &str, price: u32, discount: u8) -> Value {
    json!({
        "_id": id,
        "name": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "price": price,
        "discount": discount,
        "images": [{"url": format!("https://cdn.bloom.in/{id}.jpg"), "isPrimary": true}],
        "inStock": true,
        "stock": 25,
    })
}

/// User JSON in the shape the API returns.
#[must_use]
pub fn user_json(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "name": "Asha Rao",
        "email": email,
        "role": "user",
    })
}

/// Body of a successful `auth/login` or `auth/register` response.
#[must_use]
pub fn auth_json(token: &str, user: Value) -> Value {
    json!({
        "success": true,
        "token": token,
        "user": user,
    })
}
