//! Application context shared by every front end.
//!
//! One [`AppContext`] is built at startup from a [`ClientConfig`] and passed
//! by reference to whatever needs the session, the API client or the cart.

use bloom_core::models::{LoginRequest, OrderRequest, RegisterRequest, User};
use bloom_core::{CartError, Email, SharedCartLedger};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument};

use crate::api::{ApiClient, ApiError};
use crate::config::ClientConfig;
use crate::session::{SessionError, SessionStore};

/// Errors surfaced by context-level workflows.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The workflow needs a signed-in user.
    #[error("Not logged in")]
    NotLoggedIn,
}

/// Where a front end should start the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// A session exists; go to the home/catalog view.
    Home,
    /// No session; go to login/registration.
    Auth,
}

/// Session, API client and cart for one running client.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: ClientConfig,
    session: SessionStore,
    api: ApiClient,
    cart: SharedCartLedger,
}

impl AppContext {
    /// Load the session and build the API client.
    ///
    /// # Errors
    ///
    /// Returns `ContextError` if the session file is unreadable or the HTTP
    /// client cannot be built.
    pub async fn init(config: ClientConfig) -> Result<Self, ContextError> {
        let session = SessionStore::load(config.session_path.clone()).await?;
        let api = ApiClient::new(&config, session.clone())?;
        Ok(Self {
            config,
            session,
            api,
            cart: SharedCartLedger::new(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn cart(&self) -> &SharedCartLedger {
        &self.cart
    }

    /// Startup routing: home when a session exists, auth otherwise.
    pub async fn landing(&self) -> Landing {
        if self.session.is_logged_in().await {
            Landing::Home
        } else {
            Landing::Auth
        }
    }

    /// Log in and persist the resulting session.
    ///
    /// # Errors
    ///
    /// Returns `ContextError` if the login is rejected or the session cannot
    /// be saved.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: Email, password: String) -> Result<User, ContextError> {
        let auth = self.api.login(&LoginRequest { email, password }).await?;
        self.session.save_auth(&auth).await?;
        info!(user_id = %auth.user.id, "Logged in");
        Ok(auth.user)
    }

    /// Register and persist the resulting session.
    ///
    /// # Errors
    ///
    /// Returns `ContextError` if registration is rejected or the session
    /// cannot be saved.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<User, ContextError> {
        let auth = self.api.register(&request).await?;
        self.session.save_auth(&auth).await?;
        info!(user_id = %auth.user.id, "Registered");
        Ok(auth.user)
    }

    /// Forget the session and empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `ContextError` if the session file cannot be written.
    pub async fn logout(&self) -> Result<(), ContextError> {
        self.session.clear().await?;
        self.cart.clear();
        info!("Logged out");
        Ok(())
    }

    /// Place an order for the current cart.
    ///
    /// Once the server accepts the order, the ordered lines are taken out of
    /// the cart. Anything added while the request was in flight stays. On any
    /// failure the cart is left as it was.
    ///
    /// # Errors
    ///
    /// - `ContextError::NotLoggedIn` without a session.
    /// - `ContextError::EmptyCart` if there is nothing to order.
    /// - `ContextError::Api` if the server rejects the order.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<Value, ContextError> {
        if !self.session.is_logged_in().await {
            return Err(ContextError::NotLoggedIn);
        }
        let snapshot = self.cart.snapshot();
        if snapshot.is_empty() {
            return Err(ContextError::EmptyCart);
        }

        let order = OrderRequest::from(&snapshot);
        let created = self.api.create_order(&order).await?;
        self.cart.remove_ordered(&snapshot);
        info!(items = order.items.len(), total = %order.total, "Order placed");
        Ok(created)
    }
}
