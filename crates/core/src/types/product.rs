//! Catalog products and the raw rows they are imported from.

use serde::{Deserialize, Serialize};

use super::id::ItemCode;
use super::unit::UnitOfMeasure;

/// Category assigned to products that do not name one.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

const fn default_true() -> bool {
    true
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// A product in the catalog.
///
/// Older product documents stored the image under `image_url` and/or
/// `image_path`; both are accepted when reading, `image_url` winning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProductDocument")]
pub struct Product {
    /// Unique product code.
    pub item_code: ItemCode,
    /// Free-text description shown in the catalog.
    #[serde(default)]
    pub description: String,
    /// Category used by the catalog filter.
    #[serde(default = "default_category")]
    pub category: String,
    /// Brand name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Whether the product can be ordered by the case.
    #[serde(default = "default_true")]
    pub allow_case: bool,
    /// Whether the product can be ordered by the unit.
    #[serde(default = "default_true")]
    pub allow_each: bool,
    /// Image URL or local path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Stored shape of a [`Product`], including the legacy image keys.
#[derive(Deserialize)]
struct ProductDocument {
    item_code: ItemCode,
    #[serde(default)]
    description: String,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default = "default_true")]
    allow_case: bool,
    #[serde(default = "default_true")]
    allow_each: bool,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image_path: Option<String>,
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        let image = [doc.image, doc.image_url, doc.image_path]
            .into_iter()
            .flatten()
            .find(|src| !src.trim().is_empty());
        Self {
            item_code: doc.item_code,
            description: doc.description,
            category: doc.category,
            brand: doc.brand,
            allow_case: doc.allow_case,
            allow_each: doc.allow_each,
            image,
        }
    }
}

impl Product {
    /// Create a product with default category and both units allowed.
    #[must_use]
    pub fn new(item_code: ItemCode, description: impl Into<String>) -> Self {
        Self {
            item_code,
            description: description.into(),
            category: default_category(),
            brand: None,
            allow_case: true,
            allow_each: true,
            image: None,
        }
    }

    /// Whether this product can be bought in `unit`.
    #[must_use]
    pub const fn allows(&self, unit: UnitOfMeasure) -> bool {
        match unit {
            UnitOfMeasure::Case => self.allow_case,
            UnitOfMeasure::Each => self.allow_each,
        }
    }

    /// Units this product can be bought in, Case first.
    #[must_use]
    pub fn units(&self) -> Vec<UnitOfMeasure> {
        UnitOfMeasure::ALL
            .into_iter()
            .filter(|unit| self.allows(*unit))
            .collect()
    }

    /// A product exposing neither unit cannot be added to a cart.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        self.allow_case || self.allow_each
    }

    /// Brand with blank values treated as absent.
    #[must_use]
    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }

    /// Image reference with blank values treated as absent.
    #[must_use]
    pub fn image_src(&self) -> Option<&str> {
        self.image.as_deref().map(str::trim).filter(|i| !i.is_empty())
    }
}

/// Errors raised while turning an imported row into a [`Product`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductRowError {
    /// The row has no item code.
    #[error("item_code is empty")]
    MissingItemCode,
    /// A yes/no column holds something that is not a boolean.
    #[error("{column} must be true or false (got {value:?})")]
    InvalidFlag {
        /// Column name.
        column: &'static str,
        /// Offending cell value.
        value: String,
    },
}

/// One row of an uploaded product sheet, before defaults are applied.
///
/// `None` means the column is absent from the sheet or the cell is blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductRow {
    pub item_code: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub allow_case: Option<String>,
    pub allow_each: Option<String>,
    pub image: Option<String>,
}

impl ProductRow {
    /// Whether every cell of the row is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        [
            &self.item_code,
            &self.description,
            &self.brand,
            &self.category,
            &self.allow_case,
            &self.allow_each,
            &self.image,
        ]
        .iter()
        .all(|cell| non_blank(cell.as_deref()).is_none())
    }

    /// Apply the documented defaults and validate the row.
    ///
    /// # Errors
    ///
    /// Returns [`ProductRowError`] if the item code is blank or a yes/no cell
    /// cannot be read as a boolean.
    pub fn into_product(self) -> Result<Product, ProductRowError> {
        let item_code = non_blank(self.item_code.as_deref())
            .and_then(|code| ItemCode::parse(code).ok())
            .ok_or(ProductRowError::MissingItemCode)?;

        Ok(Product {
            item_code,
            description: non_blank(self.description.as_deref())
                .unwrap_or_default()
                .to_string(),
            category: non_blank(self.category.as_deref())
                .map_or_else(default_category, str::to_string),
            brand: non_blank(self.brand.as_deref()).map(str::to_string),
            allow_case: flag("allow_case", self.allow_case.as_deref())?,
            allow_each: flag("allow_each", self.allow_each.as_deref())?,
            image: non_blank(self.image.as_deref()).map(str::to_string),
        })
    }
}

fn non_blank(cell: Option<&str>) -> Option<&str> {
    cell.map(str::trim).filter(|c| !c.is_empty())
}

fn flag(column: &'static str, cell: Option<&str>) -> Result<bool, ProductRowError> {
    match non_blank(cell) {
        None => Ok(true),
        Some(value) => parse_flag(value).ok_or_else(|| ProductRowError::InvalidFlag {
            column,
            value: value.to_string(),
        }),
    }
}

/// Read a spreadsheet-style yes/no cell.
///
/// Accepts `true/false`, `yes/no`, `y/n`, `t/f` and `1/0` in any case, plus
/// `1.0/0.0` as produced by spreadsheet number cells.
#[must_use]
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "t" | "1" | "1.0" => Some(true),
        "false" | "no" | "n" | "f" | "0" | "0.0" => Some(false),
        _ => None,
    }
}
