use bloom_core::CategoryId;
use rust_decimal::Decimal;
use url::Url;

/// Filters and paging for `GET products`.
///
/// Unset filters are left out of the query string. Paging defaults to the
/// first page of 12.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<CategoryId>,
    pub subcategory: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            subcategory: None,
            min_price: None,
            max_price: None,
            search: None,
            sort: None,
            page: 1,
            limit: 12,
        }
    }
}

impl ProductQuery {
    #[must_use]
    pub fn category(mut self, category: impl Into<CategoryId>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub const fn price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    #[must_use]
    pub const fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    /// Append the query parameters to `url`.
    pub(crate) fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        if let Some(category) = &self.category {
            pairs.append_pair("category", category.as_str());
        }
        if let Some(subcategory) = &self.subcategory {
            pairs.append_pair("subcategory", subcategory.as_str());
        }
        if let Some(min) = self.min_price {
            pairs.append_pair("minPrice", &min.to_string());
        }
        if let Some(max) = self.max_price {
            pairs.append_pair("maxPrice", &max.to_string());
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.append_pair("search", search);
        }
        if let Some(sort) = &self.sort {
            pairs.append_pair("sort", sort);
        }
        pairs.append_pair("page", &self.page.to_string());
        pairs.append_pair("limit", &self.limit.to_string());
    }
}
