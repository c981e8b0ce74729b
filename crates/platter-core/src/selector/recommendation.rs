//! Recommendation value objects

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classifier::Role;
use crate::preferences::{Cuisine, PreferenceState, SpiceLevel};

/// Why an item was picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonTag {
    PrimaryMainPick,
    SidePairing,
    DrinkPairing,
    DessertPairing,
    BudgetFallback,
    ExtraFill,
}

impl ReasonTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonTag::PrimaryMainPick => "primary-main-pick",
            ReasonTag::SidePairing => "side-pairing",
            ReasonTag::DrinkPairing => "drink-pairing",
            ReasonTag::DessertPairing => "dessert-pairing",
            ReasonTag::BudgetFallback => "budget-fallback",
            ReasonTag::ExtraFill => "extra-fill",
        }
    }
}

impl fmt::Display for ReasonTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recommended item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItem {
    pub name: String,
    /// Listed price; `None` for market-price items
    pub price: Option<f64>,
    /// Price used for budget arithmetic
    pub effective_price: f64,
    pub category: String,
    pub role: Role,
    pub reason: ReasonTag,
}

impl SelectedItem {
    /// `$95`, or `market price` when the catalog lists no price
    pub fn price_label(&self) -> String {
        match self.price {
            Some(p) => format!("${:.0}", p),
            None => "market price".to_string(),
        }
    }
}

/// State echoed back with every recommendation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationMeta {
    pub budget: Option<f64>,
    pub people: Option<u32>,
    pub need_drink: Option<bool>,
    pub spice_level: Option<SpiceLevel>,
    pub cuisine: Option<Cuisine>,
}

impl From<&PreferenceState> for RecommendationMeta {
    fn from(state: &PreferenceState) -> Self {
        Self {
            budget: state.budget,
            people: state.people,
            need_drink: state.need_drink,
            spice_level: state.spice_level,
            cuisine: state.cuisine,
        }
    }
}

/// Ordered selection produced for one turn
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub items: Vec<SelectedItem>,
    /// Explanation for empty or over-budget results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub total_cost: f64,
    pub target_count: usize,
    /// Set when the only way to recommend anything was to exceed the budget
    pub over_budget: bool,
    pub meta: RecommendationMeta,
}

impl Recommendation {
    /// Empty result carrying an explanation
    pub fn empty(notes: impl Into<String>, meta: RecommendationMeta, target_count: usize) -> Self {
        Self {
            items: Vec::new(),
            notes: Some(notes.into()),
            total_cost: 0.0,
            target_count,
            over_budget: false,
            meta,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of picks with the given role
    pub fn count_role(&self, role: Role) -> usize {
        self.items.iter().filter(|i| i.role == role).count()
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.name.as_str()).collect()
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return write!(
                f,
                "No recommendation. {}",
                self.notes.as_deref().unwrap_or("Try relaxing your constraints.")
            );
        }

        writeln!(f, "Recommended for you:")?;
        for (index, item) in self.items.iter().enumerate() {
            writeln!(
                f,
                "  {}. {} ({}) - {} [{}]",
                index + 1,
                item.name,
                item.category,
                item.price_label(),
                item.reason
            )?;
        }
        write!(f, "Estimated total: ${:.0}", self.total_cost)?;
        if let Some(budget) = self.meta.budget {
            write!(f, " (budget ${:.0})", budget)?;
        }
        if let Some(notes) = &self.notes {
            write!(f, "\n{}", notes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: Option<f64>, role: Role, reason: ReasonTag) -> SelectedItem {
        SelectedItem {
            name: name.to_string(),
            price,
            effective_price: price.unwrap_or(350.0),
            category: "Menu".to_string(),
            role,
            reason,
        }
    }

    #[test]
    fn test_reason_tag_serialization() {
        let json = serde_json::to_string(&ReasonTag::PrimaryMainPick).unwrap();
        assert_eq!(json, "\"primary-main-pick\"");
        assert_eq!(ReasonTag::BudgetFallback.to_string(), "budget-fallback");
    }

    #[test]
    fn test_market_price_serializes_as_null() {
        let rec = Recommendation {
            items: vec![item("Catch of the Day", None, Role::Other, ReasonTag::ExtraFill)],
            total_cost: 350.0,
            target_count: 5,
            ..Default::default()
        };
        let value = serde_json::to_value(&rec).unwrap();
        assert!(value["items"][0]["price"].is_null());
        assert_eq!(value["items"][0]["effectivePrice"], 350.0);
        assert_eq!(value["items"][0]["reason"], "extra-fill");
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn test_display_lists_items() {
        let rec = Recommendation {
            items: vec![
                item("Veggie Wrap", Some(95.0), Role::Main, ReasonTag::PrimaryMainPick),
                item("Cola", Some(30.0), Role::Drink, ReasonTag::DrinkPairing),
            ],
            total_cost: 125.0,
            target_count: 5,
            meta: RecommendationMeta {
                budget: Some(150.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let text = rec.to_string();
        assert!(text.contains("1. Veggie Wrap (Menu) - $95 [primary-main-pick]"));
        assert!(text.contains("Estimated total: $125 (budget $150)"));
        assert_eq!(rec.count_role(Role::Drink), 1);
    }

    #[test]
    fn test_market_price_label() {
        let market = item("Catch of the Day", None, Role::Other, ReasonTag::ExtraFill);
        assert_eq!(market.price_label(), "market price");
        assert_eq!(
            item("Cola", Some(30.0), Role::Drink, ReasonTag::DrinkPairing).price_label(),
            "$30"
        );

        let rec = Recommendation {
            items: vec![market],
            total_cost: 350.0,
            target_count: 5,
            ..Default::default()
        };
        let text = rec.to_string();
        assert!(text.contains("1. Catch of the Day (Menu) - market price [extra-fill]"));
        assert!(!text.contains("- $350"));
    }

    #[test]
    fn test_display_empty() {
        let rec = Recommendation::empty("The catalog is empty.", RecommendationMeta::default(), 5);
        assert_eq!(rec.to_string(), "No recommendation. The catalog is empty.");
    }
}
