//! Catalog model
//!
//! A catalog is an ordered list of categories, each holding an ordered list of items.
//! It is immutable once loaded: [`Catalog::from_json_str`] and [`Catalog::new`] validate
//! the structure up front so nothing downstream has to cope with half-formed data.

pub mod classified;
pub mod normalize;

use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::error::CatalogError;

pub use classified::{CatalogEntry, ClassifiedCatalog};
pub use normalize::NormalizeStats;

/// Placeholder price used for budget arithmetic when an item has no (or a zero) price
pub const MARKET_PRICE: f64 = 350.0;

/// A single menu item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub name: String,
    /// `None` or `Some(0.0)` means market price
    pub price: Option<f64>,
    pub tags: Vec<String>,
}

impl Item {
    pub fn new(name: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            name: name.into(),
            price,
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// True when the item has no usable listed price
    pub fn is_market_price(&self) -> bool {
        !matches!(self.price, Some(p) if p > 0.0)
    }

    /// Listed price, or `market_price` for unpriced items
    pub fn effective_price(&self, market_price: f64) -> f64 {
        match self.price {
            Some(p) if p > 0.0 => p,
            _ => market_price,
        }
    }

    /// Case-insensitive tag lookup
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// A named group of items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub items: Vec<Item>,
}

impl Category {
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// Validated menu catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog from already-typed categories, enforcing the item rules
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        for category in &categories {
            for (index, item) in category.items.iter().enumerate() {
                if item.name.trim().is_empty() {
                    return Err(CatalogError::ItemName {
                        category: category.name.clone(),
                        index,
                    });
                }
                if let Some(price) = item.price {
                    check_price(price, &category.name, &item.name)?;
                }
            }
        }
        Ok(Self { categories })
    }

    /// Empty catalog
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse and validate catalog JSON
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| CatalogError::Malformed(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validate a parsed JSON document of shape
    /// `{"categories": [{"name": .., "items": [{"name": .., "price": .., "tags": [..]}]}]}`
    pub fn from_value(value: &Value) -> Result<Self, CatalogError> {
        let raw_categories = value
            .get("categories")
            .and_then(Value::as_array)
            .ok_or(CatalogError::MissingCategories)?;

        let mut categories = Vec::with_capacity(raw_categories.len());
        for (index, raw) in raw_categories.iter().enumerate() {
            let obj = raw
                .as_object()
                .ok_or(CatalogError::CategoryNotObject { index })?;
            let name = obj
                .get("name")
                .and_then(Value::as_str)
                .ok_or(CatalogError::CategoryName { index })?;
            let raw_items = obj.get("items").and_then(Value::as_array).ok_or_else(|| {
                CatalogError::CategoryItems {
                    index,
                    category: name.to_string(),
                }
            })?;

            let mut items = Vec::with_capacity(raw_items.len());
            for (item_index, raw_item) in raw_items.iter().enumerate() {
                items.push(parse_item(raw_item, name, item_index)?);
            }
            categories.push(Category::new(name, items));
        }

        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub(crate) fn categories_mut(&mut self) -> &mut [Category] {
        &mut self.categories
    }

    /// Iterate `(category name, item)` pairs in catalog order
    pub fn items(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.categories
            .iter()
            .flat_map(|c| c.items.iter().map(move |i| (c.name.as_str(), i)))
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Serialize back to the JSON shape accepted by [`Catalog::from_json_str`]
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Read and validate a catalog file
    pub fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_json_str(&content)?)
    }

    /// Write the catalog as pretty JSON
    pub fn write_to(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        std::fs::write(path.as_ref(), self.to_json_pretty()?)?;
        Ok(())
    }
}

fn parse_item(raw: &Value, category: &str, index: usize) -> Result<Item, CatalogError> {
    let obj = raw.as_object().ok_or_else(|| CatalogError::ItemNotObject {
        category: category.to_string(),
        index,
    })?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| CatalogError::ItemName {
            category: category.to_string(),
            index,
        })?;

    let price = match obj.get("price") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => {
            let price = n.as_f64().ok_or_else(|| CatalogError::ItemPrice {
                category: category.to_string(),
                item: name.to_string(),
                reason: format!("{} is not representable", n),
            })?;
            check_price(price, category, name)?;
            Some(price)
        }
        Some(other) => {
            return Err(CatalogError::ItemPrice {
                category: category.to_string(),
                item: name.to_string(),
                reason: format!("expected a number or null, got {}", other),
            })
        }
    };

    let mut tags = Vec::new();
    if let Some(raw_tags) = obj.get("tags") {
        let list = raw_tags.as_array().ok_or_else(|| CatalogError::ItemTag {
            category: category.to_string(),
            item: name.to_string(),
        })?;
        for tag in list {
            let tag = tag.as_str().ok_or_else(|| CatalogError::ItemTag {
                category: category.to_string(),
                item: name.to_string(),
            })?;
            tags.push(tag.to_string());
        }
    }

    Ok(Item {
        name: name.to_string(),
        price,
        tags,
    })
}

fn check_price(price: f64, category: &str, item: &str) -> Result<(), CatalogError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CatalogError::ItemPrice {
            category: category.to_string(),
            item: item.to_string(),
            reason: format!("{} must be a finite, non-negative number", price),
        });
    }
    Ok(())
}
