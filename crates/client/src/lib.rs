//! Bloom Client - Remote API access and session handling.
//!
//! # Architecture
//!
//! - [`config`] - Configuration loaded from environment variables
//! - [`api`] - Typed client for the Bloom REST API (`reqwest`)
//! - [`session`] - Auth token and user profile persisted as JSON, served
//!   from an in-memory copy
//! - [`context`] - [`AppContext`], built once at startup and passed to
//!   whatever needs the session, the API or the cart
//!
//! Nothing in this crate is a process-wide global. Construct an
//! [`AppContext`] and hand it down explicitly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod context;
pub mod session;

pub use api::{ApiClient, ApiError, ProductQuery};
pub use config::{ClientConfig, ConfigError};
pub use context::{AppContext, ContextError, Landing};
pub use session::{SessionError, SessionStore};
