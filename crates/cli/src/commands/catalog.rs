//! Catalog listing commands.
//!
//! # Usage
//!
//! ```bash
//! bloom products --category 64f0c2 --min-price 200 --max-price 1500
//! bloom products --search "red roses" --page 2 --limit 24
//! bloom featured
//! bloom categories
//! ```
//!
//! # Environment Variables
//!
//! - `BLOOM_API_BASE_URL` - Base URL of the Bloom API

use bloom_client::ProductQuery;
use tracing::info;

use super::output;

/// Print one page of products matching `query`.
///
/// # Errors
///
/// Returns an error if configuration is missing or the request fails.
pub async fn products(query: &ProductQuery) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = super::context().await?;
    let page = ctx.api().products(query).await?;
    let currency = ctx.config().currency;

    info!(
        count = page.count,
        total = page.total,
        page = page.current_page,
        "Fetched products"
    );
    for product in &page.data {
        output::print(&output::render_product(product, currency));
    }
    if page.has_next_page() {
        output::print(&format!(
            "-- page {} of {} (use --page {} for more)",
            page.current_page,
            page.total_pages,
            page.current_page + 1
        ));
    }
    Ok(())
}

/// Print the featured products.
///
/// # Errors
///
/// Returns an error if configuration is missing or the request fails.
pub async fn featured() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = super::context().await?;
    let products = ctx.api().featured_products().await?;
    let currency = ctx.config().currency;

    info!(count = products.len(), "Fetched featured products");
    for product in &products {
        output::print(&output::render_product(product, currency));
    }
    Ok(())
}

/// Print the category tree.
///
/// # Errors
///
/// Returns an error if configuration is missing or the request fails.
pub async fn categories() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = super::context().await?;
    let categories = ctx.api().categories().await?;

    info!(count = categories.len(), "Fetched categories");
    for category in categories.iter().filter(|c| c.is_active) {
        output::print(&output::render_category(category));
    }
    Ok(())
}
