//! Weight Deriver
//!
//! A pure function of [`PreferenceState`]. The selector reads the weights for tie-breaking
//! only; they are never used as a dot-product score.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::{PreferenceState, SpiceLevel};
use crate::matching::phrase_regex;

lazy_static! {
    static ref CUE_MAIN: Regex = phrase_regex(&[
        "main course",
        "main dish",
        "filling",
        "hungry",
        "big portion",
        "hearty",
        "starving",
        "substantial",
    ]);
    static ref CUE_VARIETY: Regex = phrase_regex(&[
        "variety",
        "mix",
        "share",
        "sharing",
        "a bit of everything",
        "different",
        "try",
        "assorted",
    ]);
    static ref CUE_LIGHT: Regex = phrase_regex(&[
        "light",
        "healthy",
        "fresh",
        "less oil",
        "low fat",
        "not greasy",
    ]);
}

/// Named coefficients recomputed from the preference state every turn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightVector {
    pub price: f64,
    pub main: f64,
    pub variety: f64,
    pub drink: f64,
    pub spice: f64,
    pub category: f64,
    pub cuisine: f64,
}

impl WeightVector {
    /// Weights of a state with nothing set
    pub fn baseline() -> Self {
        Self {
            price: 0.3,
            main: 0.5,
            variety: 0.4,
            drink: -0.8,
            spice: 0.2,
            category: 0.5,
            cuisine: 0.0,
        }
    }

    /// Derive weights from the merged state
    pub fn derive(state: &PreferenceState) -> Self {
        let notes = state.notes.as_deref().unwrap_or("");
        let cue_main = CUE_MAIN.is_match(notes);
        let cue_variety = CUE_VARIETY.is_match(notes);
        let cue_light = CUE_LIGHT.is_match(notes);

        let has_budget = state.budget.is_some();
        let need_drink = state.need_drink == Some(true);
        let has_spice = state.spice_level.is_some();
        let has_excludes = !state.excludes.is_empty();
        let has_cuisine = state.cuisine.is_some();

        let constraint_count = [
            has_budget,
            need_drink,
            has_spice,
            has_excludes,
            has_cuisine,
            cue_main,
            cue_variety,
            cue_light,
        ]
        .iter()
        .filter(|flag| **flag)
        .count();
        let only_budget = has_budget && constraint_count == 1;

        Self {
            price: if only_budget {
                1.0
            } else if has_budget {
                0.8
            } else {
                0.3
            },
            main: if cue_main { 0.8 } else { 0.5 },
            variety: if cue_variety { 0.8 } else { 0.4 },
            drink: if need_drink { 0.6 } else { -0.8 },
            spice: if state.spice_level == Some(SpiceLevel::NotSpicy) || cue_light {
                0.7
            } else {
                0.2
            },
            category: 0.5,
            cuisine: if has_cuisine { 0.6 } else { 0.0 },
        }
    }

    /// Fixed-order view used when hashing the weights
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.price,
            self.main,
            self.variety,
            self.drink,
            self.spice,
            self.category,
            self.cuisine,
        ]
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::baseline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::{Cuisine, PreferenceDelta};

    fn state_from(delta: PreferenceDelta) -> PreferenceState {
        let mut state = PreferenceState::new();
        state.merge(&delta);
        state
    }

    #[test]
    fn test_baseline_matches_empty_state() {
        assert_eq!(WeightVector::derive(&PreferenceState::new()), WeightVector::baseline());
    }

    #[test]
    fn test_only_budget_maximises_price_weight() {
        let state = state_from(PreferenceDelta {
            budget: Some(200.0),
            ..Default::default()
        });
        assert_eq!(state.weights().price, 1.0);

        let state = state_from(PreferenceDelta {
            budget: Some(200.0),
            cuisine: Some(Cuisine::Thai),
            ..Default::default()
        });
        assert_eq!(state.weights().price, 0.8);
        assert_eq!(state.weights().cuisine, 0.6);
    }

    #[test]
    fn test_notes_cues() {
        let state = state_from(PreferenceDelta {
            notes: Some("I'm starving, want to try a bit of everything, but healthy".into()),
            ..Default::default()
        });
        let w = state.weights();
        assert_eq!(w.main, 0.8);
        assert_eq!(w.variety, 0.8);
        assert_eq!(w.spice, 0.7);
        // cue words alone do not count as a budget
        assert_eq!(w.price, 0.3);
    }

    #[test]
    fn test_drink_weight_is_asymmetric() {
        let yes = state_from(PreferenceDelta {
            need_drink: Some(true),
            ..Default::default()
        });
        let no = state_from(PreferenceDelta {
            need_drink: Some(false),
            ..Default::default()
        });
        assert_eq!(yes.weights().drink, 0.6);
        assert_eq!(no.weights().drink, -0.8);
    }

    #[test]
    fn test_not_spicy_raises_spice_weight() {
        let state = state_from(PreferenceDelta {
            spice_level: Some(SpiceLevel::NotSpicy),
            ..Default::default()
        });
        assert_eq!(state.weights().spice, 0.7);
        let state = state_from(PreferenceDelta {
            spice_level: Some(SpiceLevel::Hot),
            ..Default::default()
        });
        assert_eq!(state.weights().spice, 0.2);
    }
}
