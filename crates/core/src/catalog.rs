//! Catalog search and category filtering.
//!
//! Filtering never reorders: results keep the order of the product
//! collection, which is the order of the last upload.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{ItemCode, Product};

/// Category filter value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Catalog listing parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive substring matched against item code or description.
    #[serde(default, rename = "q")]
    pub search: Option<String>,
    /// Exact category, or `"All"`.
    #[serde(default)]
    pub category: Option<String>,
}

impl CatalogQuery {
    /// Build a query from optional search text and category.
    #[must_use]
    pub fn new(search: Option<&str>, category: Option<&str>) -> Self {
        Self {
            search: search.map(str::to_string),
            category: category.map(str::to_string),
        }
    }

    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }
}

/// Products matching `query`, in collection order.
#[must_use]
pub fn list<'a>(products: &'a [Product], query: &CatalogQuery) -> Vec<&'a Product> {
    let needle = query.needle();
    let category = query.category_filter();

    products
        .iter()
        .filter(|p| {
            needle.as_deref().is_none_or(|n| {
                p.item_code.as_str().to_lowercase().contains(n)
                    || p.description.to_lowercase().contains(n)
            })
        })
        .filter(|p| category.is_none_or(|c| p.category == c))
        .collect()
}

/// Distinct categories present in the collection, sorted.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Look up a product by item code.
#[must_use]
pub fn find<'a>(products: &'a [Product], item_code: &ItemCode) -> Option<&'a Product> {
    products.iter().find(|p| &p.item_code == item_code)
}
