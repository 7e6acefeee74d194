//! Catalog categories.

use serde::{Deserialize, Serialize};

use crate::types::CategoryId;

/// A catalog category, possibly with nested subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub parent_category: Option<CategoryId>,
    #[serde(default)]
    pub subcategories: Vec<Category>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i32,
}

/// A category reference on a product.
///
/// Product listings return the category either as a bare id or, when the
/// server populates the relation, as the full category document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(CategoryId),
    Populated(Box<Category>),
}

impl CategoryRef {
    /// The referenced category id, whichever shape the server sent.
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        match self {
            Self::Id(id) => id,
            Self::Populated(category) => &category.id,
        }
    }

    /// The category name, if the relation was populated.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Populated(category) => Some(&category.name),
        }
    }
}

const fn default_true() -> bool {
    true
}
