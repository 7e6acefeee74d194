//! Command implementations.
//!
//! Commands that talk to the server share one [`AppContext`] built from the
//! environment by [`context`].

pub mod account;
pub mod cart;
pub mod catalog;
mod output;

use bloom_client::{AppContext, ClientConfig};

/// Build the application context from environment configuration.
///
/// # Errors
///
/// Returns an error if configuration is missing or the session file is
/// unreadable.
pub async fn context() -> Result<AppContext, Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(api = %config.api_base_url, "Configuration loaded");
    Ok(AppContext::init(config).await?)
}
