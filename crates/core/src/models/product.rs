//! Catalog products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::CategoryRef;
use crate::types::{Discount, ProductId};

/// A product as returned by the catalog endpoints.
///
/// Only `id`, `price` and `discount` take part in cart pricing. The remaining
/// fields are carried for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: Option<String>,
    /// Base unit price before discount.
    pub price: Decimal,
    /// "Was" price shown struck through, if any.
    #[serde(default)]
    pub compare_price: Option<Decimal>,
    #[serde(default)]
    pub discount: Discount,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub subcategory: Option<CategoryRef>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub sales: u64,
}

impl Product {
    /// Create a product with only the fields that affect pricing set.
    ///
    /// Display fields take their API defaults.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, price: Decimal, discount: Discount) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            short_description: None,
            price,
            compare_price: None,
            discount,
            images: Vec::new(),
            category: None,
            subcategory: None,
            brand: None,
            sku: None,
            stock: 0,
            in_stock: true,
            tags: Vec::new(),
            rating: Rating::default(),
            is_featured: false,
            is_active: true,
            views: 0,
            sales: 0,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Unit price after the percentage discount is applied.
    #[must_use]
    pub fn discounted_price(&self) -> Decimal {
        self.discount.apply(self.price)
    }

    /// URL of the primary image, falling back to the first image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.first())
            .map(|img| img.url.as_str())
    }

    /// Name for display, falling back to the id for unnamed products.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

/// Product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Aggregate review rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rating {
    /// Average stars (e.g., 4.5).
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub count: u32,
}

const fn default_true() -> bool {
    true
}
