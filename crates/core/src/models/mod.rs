//! Payloads exchanged with the Bloom REST API.
//!
//! Field names follow the API's JSON (camelCase, `_id` for document ids).
//! Optional catalog fields default when the API omits them.

pub mod category;
pub mod order;
pub mod product;
pub mod response;
pub mod user;

pub use category::{Category, CategoryRef};
pub use order::{OrderItem, OrderRequest};
pub use product::{Product, ProductImage, Rating};
pub use response::{ApiResponse, CategoryResponse, ProductResponse, SingleProductResponse};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User};
