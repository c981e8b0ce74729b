//! Preference model and accumulation
//!
//! Each user turn is turned into a [`PreferenceDelta`] by an extractor. A session keeps a
//! single [`PreferenceState`] that deltas are merged into:
//!
//! - budget, spice level, cuisine, people, dish kind and drink need are *sticky*: a value
//!   stays until a later delta carries a new one,
//! - excludes only grow (set union, first-seen order, no duplicates) until [`PreferenceState::reset`],
//! - the [`WeightVector`] is recomputed after every merge and never merged itself.

pub mod extractor;
pub mod weights;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use extractor::{extract, Extractor, KeywordExtractor, LayeredExtractor};
pub use weights::WeightVector;

/// Spice tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpiceLevel {
    #[serde(rename = "none")]
    NotSpicy,
    Mild,
    Medium,
    Hot,
    VeryHot,
}

impl SpiceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpiceLevel::NotSpicy => "none",
            SpiceLevel::Mild => "mild",
            SpiceLevel::Medium => "medium",
            SpiceLevel::Hot => "hot",
            SpiceLevel::VeryHot => "very-hot",
        }
    }
}

impl fmt::Display for SpiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cuisines the extractor recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cuisine {
    Chinese,
    Japanese,
    Thai,
    American,
    Korean,
    Italian,
}

impl Cuisine {
    /// Recognition order
    pub const ALL: [Cuisine; 6] = [
        Cuisine::Chinese,
        Cuisine::Japanese,
        Cuisine::Thai,
        Cuisine::American,
        Cuisine::Korean,
        Cuisine::Italian,
    ];

    /// Lower-case name, also the catalog tag for the cuisine
    pub fn as_str(&self) -> &'static str {
        match self {
            Cuisine::Chinese => "chinese",
            Cuisine::Japanese => "japanese",
            Cuisine::Thai => "thai",
            Cuisine::American => "american",
            Cuisine::Korean => "korean",
            Cuisine::Italian => "italian",
        }
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferred kind of main dish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DishKind {
    Burger,
    Toast,
    Bagel,
    Combo,
}

impl DishKind {
    /// Recognition order
    pub const ALL: [DishKind; 4] = [DishKind::Burger, DishKind::Toast, DishKind::Bagel, DishKind::Combo];

    /// Lower-case keywords that identify this kind in user text and item names
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            DishKind::Burger => &["burger"],
            DishKind::Toast => &["toast"],
            DishKind::Bagel => &["bagel"],
            DishKind::Combo => &["combo", "set meal", "meal deal"],
        }
    }

    /// Whether an item name belongs to this kind
    pub fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.keywords().iter().any(|k| lower.contains(k))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DishKind::Burger => "burger",
            DishKind::Toast => "toast",
            DishKind::Bagel => "bagel",
            DishKind::Combo => "combo",
        }
    }
}

/// Preference changes extracted from one turn. Absent fields mean "not mentioned".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferenceDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<SpiceLevel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
    /// `Some(false)` is an explicit refusal, `None` means drinks were not mentioned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub need_drink: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<Cuisine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_dish: Option<DishKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PreferenceDelta {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fill fields this delta left unset from `other`. A dish kind in `other` wins.
    pub fn fill_from(&mut self, other: PreferenceDelta) {
        if self.budget.is_none() {
            self.budget = other.budget;
        }
        if self.spice_level.is_none() {
            self.spice_level = other.spice_level;
        }
        if self.excludes.is_empty() {
            self.excludes = other.excludes;
        }
        if self.need_drink.is_none() {
            self.need_drink = other.need_drink;
        }
        if self.people.is_none() {
            self.people = other.people;
        }
        if self.cuisine.is_none() {
            self.cuisine = other.cuisine;
        }
        if other.preferred_dish.is_some() {
            self.preferred_dish = other.preferred_dish;
        }
        if self.notes.is_none() {
            self.notes = other.notes;
        }
    }
}

/// Session-scoped accumulated preferences
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceState {
    pub budget: Option<f64>,
    pub spice_level: Option<SpiceLevel>,
    pub excludes: Vec<String>,
    pub need_drink: Option<bool>,
    pub people: Option<u32>,
    pub cuisine: Option<Cuisine>,
    pub preferred_dish: Option<DishKind>,
    /// Text of the latest turn
    pub notes: Option<String>,
    weights: WeightVector,
}

impl Default for PreferenceState {
    fn default() -> Self {
        Self {
            budget: None,
            spice_level: None,
            excludes: Vec::new(),
            need_drink: None,
            people: None,
            cuisine: None,
            preferred_dish: None,
            notes: None,
            weights: WeightVector::baseline(),
        }
    }
}

impl PreferenceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a turn's delta in place and recompute the weights.
    ///
    /// Never fails: invalid values (negative budget, zero people) are skipped.
    pub fn merge(&mut self, delta: &PreferenceDelta) {
        if let Some(budget) = delta.budget.filter(|b| b.is_finite() && *b >= 0.0) {
            self.budget = Some(budget);
        }
        if let Some(level) = delta.spice_level {
            self.spice_level = Some(level);
        }
        for token in &delta.excludes {
            let token = token.trim().to_lowercase();
            if !token.is_empty() && !self.excludes.contains(&token) {
                self.excludes.push(token);
            }
        }
        if let Some(need) = delta.need_drink {
            self.need_drink = Some(need);
        }
        if let Some(people) = delta.people.filter(|p| *p > 0) {
            self.people = Some(people);
        }
        if let Some(cuisine) = delta.cuisine {
            self.cuisine = Some(cuisine);
        }
        if let Some(kind) = delta.preferred_dish {
            self.preferred_dish = Some(kind);
        }
        if let Some(notes) = &delta.notes {
            self.notes = Some(notes.clone());
        }

        self.weights = WeightVector::derive(self);
    }

    /// Clear every field. Idempotent.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Weights derived from the current state
    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    /// True when nothing has been set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
