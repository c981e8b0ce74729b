//! Property tests for the preference store and the selector

use platter_core::{
    select, target_count, Catalog, Category, ClassifiedCatalog, Item, PreferenceDelta,
    PreferenceState, ReasonTag, Role, SpiceLevel,
};
use proptest::prelude::*;

const NAME_PARTS: &[&str] = &[
    "Cheeseburger", "Veggie Wrap", "Fried Rice", "Beef Noodles", "Ham Toast", "Bagel",
    "French Fries", "Onion Rings", "Cola", "Lemon Tea", "Beer", "Latte", "Egg Tart",
    "Ice Cream", "Peanut Satay", "Soup", "Spring Roll", "Chicken Nuggets", "Set Meal",
];

const TAGS: &[&str] = &["spicy", "mala", "korean", "chinese", "vegan", "saltiness-2"];

fn arb_item() -> impl Strategy<Value = Item> {
    (
        prop::sample::select(NAME_PARTS),
        0u32..100,
        prop::option::weighted(0.9, 0u32..400),
        prop::collection::vec(prop::sample::select(TAGS), 0..3),
    )
        .prop_map(|(name, suffix, price, tags)| {
            let mut item = Item::new(format!("{} {}", name, suffix), price.map(f64::from));
            item.tags = tags.into_iter().map(str::to_string).collect();
            item
        })
}

fn arb_catalog() -> impl Strategy<Value = ClassifiedCatalog> {
    prop::collection::vec(prop::collection::vec(arb_item(), 0..12), 0..5).prop_map(|groups| {
        let categories = groups
            .into_iter()
            .enumerate()
            .map(|(i, items)| Category::new(format!("Category {}", i), items))
            .collect();
        ClassifiedCatalog::new(&Catalog::new(categories).unwrap())
    })
}

fn arb_spice() -> impl Strategy<Value = SpiceLevel> {
    prop_oneof![
        Just(SpiceLevel::NotSpicy),
        Just(SpiceLevel::Mild),
        Just(SpiceLevel::Medium),
        Just(SpiceLevel::Hot),
        Just(SpiceLevel::VeryHot),
    ]
}

fn arb_delta() -> impl Strategy<Value = PreferenceDelta> {
    (
        prop::option::of(0u32..1000),
        prop::option::of(arb_spice()),
        prop::collection::vec("[a-z]{3,8}", 0..3),
        prop::option::of(any::<bool>()),
        prop::option::of(1u32..12),
        prop::option::of("[a-z ]{0,30}"),
    )
        .prop_map(|(budget, spice_level, excludes, need_drink, people, notes)| PreferenceDelta {
            budget: budget.map(f64::from),
            spice_level,
            excludes,
            need_drink,
            people,
            notes,
            ..Default::default()
        })
}

fn arb_state() -> impl Strategy<Value = PreferenceState> {
    prop::collection::vec(arb_delta(), 1..4).prop_map(|deltas| {
        let mut state = PreferenceState::new();
        for delta in &deltas {
            state.merge(delta);
        }
        state
    })
}

fn contains_excluded(name: &str, excludes: &[String]) -> bool {
    let lower = name.to_lowercase();
    excludes.iter().any(|token| lower.contains(token.as_str()))
}

proptest! {
    #[test]
    fn reset_is_idempotent(deltas in prop::collection::vec(arb_delta(), 0..4)) {
        let mut state = PreferenceState::new();
        for delta in &deltas {
            state.merge(delta);
        }
        state.reset();
        let once = state.clone();
        state.reset();
        prop_assert_eq!(&state, &once);
        prop_assert_eq!(state, PreferenceState::new());
    }

    #[test]
    fn excludes_only_grow_and_stay_unique(deltas in prop::collection::vec(arb_delta(), 1..6)) {
        let mut state = PreferenceState::new();
        let mut previous: Vec<String> = Vec::new();
        for delta in &deltas {
            state.merge(delta);
            for token in &previous {
                prop_assert!(state.excludes.contains(token));
            }
            let mut unique = state.excludes.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), state.excludes.len());
            previous = state.excludes.clone();
        }
    }

    #[test]
    fn budget_is_sticky(x in 0u32..5000, y in 0u32..5000, other in arb_delta()) {
        let mut state = PreferenceState::new();
        state.merge(&PreferenceDelta { budget: Some(f64::from(x)), ..Default::default() });
        state.merge(&PreferenceDelta { budget: None, ..other });
        prop_assert_eq!(state.budget, Some(f64::from(x)));
        state.merge(&PreferenceDelta { budget: Some(f64::from(y)), ..Default::default() });
        prop_assert_eq!(state.budget, Some(f64::from(y)));
    }

    #[test]
    fn budget_never_exceeded_outside_fallback(catalog in arb_catalog(), state in arb_state()) {
        let rec = select(&catalog, &state, state.weights(), target_count(&state));
        if let Some(budget) = state.budget {
            let all_fallback = rec.items.iter().all(|i| i.reason == ReasonTag::BudgetFallback);
            prop_assert!(
                rec.total_cost <= budget || all_fallback,
                "total {} over budget {}", rec.total_cost, budget
            );
            prop_assert_eq!(rec.over_budget, rec.total_cost > budget);
        } else {
            prop_assert!(!rec.over_budget);
        }
        let sum: f64 = rec.items.iter().map(|i| i.effective_price).sum();
        prop_assert!((sum - rec.total_cost).abs() < 1e-6);
    }

    #[test]
    fn role_quotas_hold(catalog in arb_catalog(), state in arb_state()) {
        let rec = select(&catalog, &state, state.weights(), target_count(&state));
        prop_assert!(rec.count_role(Role::Main) <= 2);
        prop_assert!(rec.count_role(Role::Side) <= 1);
        prop_assert!(rec.count_role(Role::Dessert) <= 1);
        let max_drinks = if state.people.unwrap_or(0) >= 4 { 2 } else { 1 };
        prop_assert!(rec.count_role(Role::Drink) <= max_drinks);
        // desserts and extras only fill up to the target; mains, sides and drinks may pass it
        let core = rec.count_role(Role::Main) + rec.count_role(Role::Side) + rec.count_role(Role::Drink);
        prop_assert!(rec.items.len() <= rec.target_count.max(core));
        if rec.count_role(Role::Dessert) + rec.count_role(Role::Other) > 0 {
            prop_assert!(rec.items.len() <= rec.target_count);
        }
    }

    #[test]
    fn selection_is_deterministic(catalog in arb_catalog(), state in arb_state()) {
        let target = target_count(&state);
        let first = select(&catalog, &state, state.weights(), target);
        let second = select(&catalog, &state, state.weights(), target);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn excluded_items_never_selected(catalog in arb_catalog(), state in arb_state()) {
        let rec = select(&catalog, &state, state.weights(), target_count(&state));
        for item in &rec.items {
            prop_assert!(!contains_excluded(&item.name, &state.excludes), "{} selected", item.name);
        }
    }

    #[test]
    fn declined_drinks_never_selected(catalog in arb_catalog(), delta in arb_delta()) {
        let mut state = PreferenceState::new();
        state.merge(&delta);
        state.merge(&PreferenceDelta { need_drink: Some(false), ..Default::default() });
        let rec = select(&catalog, &state, state.weights(), target_count(&state));
        prop_assert_eq!(rec.count_role(Role::Drink), 0);
    }

    #[test]
    fn empty_results_are_explained(catalog in arb_catalog(), state in arb_state()) {
        let rec = select(&catalog, &state, state.weights(), target_count(&state));
        if rec.items.is_empty() {
            prop_assert!(rec.notes.as_deref().map_or(false, |n| !n.is_empty()));
        }
    }

    #[test]
    fn extraction_never_panics(text in ".{0,200}") {
        let delta = platter_core::extract(&text);
        if text.trim().is_empty() {
            prop_assert!(delta.is_empty());
        } else {
            prop_assert_eq!(delta.notes.as_deref(), Some(text.as_str()));
        }
    }
}
