//! Catalog normalization
//!
//! Two cleanups applied to scraped catalogs before they are saved back:
//! zero-priced items get an explicit `market-price` tag, and saltiness tags
//! (`saltiness-<n>`) are stripped from beverage categories where they never apply.

use serde::Serialize;

use super::Catalog;

/// Tag added to items whose price is zero
pub const MARKET_PRICE_TAG: &str = "market-price";

const SALTINESS_PREFIX: &str = "saltiness-";

const BEVERAGE_CATEGORY_WORDS: &[&str] = &[
    "drink", "beverage", "tea", "juice", "wine", "beer", "sake", "liquor", "alcohol", "cocktail",
];

/// Counts of changes made by [`Catalog::normalize`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub market_price_tagged: usize,
    pub removed_salt_tags: usize,
}

impl NormalizeStats {
    /// True when normalization modified the catalog
    pub fn changed(&self) -> bool {
        self.market_price_tagged > 0 || self.removed_salt_tags > 0
    }
}

/// Whether a category name denotes drinks
pub fn is_beverage_category(name: &str) -> bool {
    let lower = name.to_lowercase();
    BEVERAGE_CATEGORY_WORDS.iter().any(|w| lower.contains(w))
}

fn is_saltiness_tag(tag: &str) -> bool {
    tag.strip_prefix(SALTINESS_PREFIX)
        .map(|level| !level.is_empty() && level.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

impl Catalog {
    /// Apply normalization rules in place and report what changed.
    ///
    /// Running it twice is a no-op the second time.
    pub fn normalize(&mut self) -> NormalizeStats {
        let mut stats = NormalizeStats::default();

        for category in self.categories_mut() {
            let beverage = is_beverage_category(&category.name);
            for item in &mut category.items {
                if item.price == Some(0.0) && !item.has_tag(MARKET_PRICE_TAG) {
                    item.tags.push(MARKET_PRICE_TAG.to_string());
                    stats.market_price_tagged += 1;
                }

                if beverage {
                    let before = item.tags.len();
                    item.tags.retain(|t| !is_saltiness_tag(t));
                    stats.removed_salt_tags += before - item.tags.len();
                }
            }
        }

        if stats.changed() {
            tracing::info!(
                market_price_tagged = stats.market_price_tagged,
                removed_salt_tags = stats.removed_salt_tags,
                "catalog normalized"
            );
        }
        stats
    }
}
