//! Selector - role-quota greedy with budget reservation
//!
//! Items are filtered, partitioned by role and sorted by effective price. Roles are then
//! filled in a fixed order, each under its own share of the budget:
//!
//! | role    | max picks              | admission check                      |
//! |---------|------------------------|--------------------------------------|
//! | main    | 2                      | first `<= 40%`, running `<= 65%`     |
//! | side    | 1                      | running `<= 90%`                     |
//! | drink   | 1, or 2 for 4+ people  | running `<= 100%`, skipped if declined |
//! | dessert | 1                      | running `<= 100%`                    |
//! | other   | up to the target count | running `<= 100%`                    |
//!
//! Desserts and other items are only added while the selection is below the target
//! count; mains, sides and drinks are bounded by their own maximum. When nothing could be
//! picked the starvation fallback returns the cheapest options and flags the result as
//! over budget.

pub mod recommendation;
pub mod variety;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::catalog::{CatalogEntry, ClassifiedCatalog, MARKET_PRICE};
use crate::classifier::Role;
use crate::preferences::{DishKind, PreferenceState, SpiceLevel, WeightVector};

pub use recommendation::{ReasonTag, Recommendation, RecommendationMeta, SelectedItem};
pub use variety::variety_seed;

/// Tags that mark an item as spicy
pub const SPICY_TAGS: &[&str] = &["spicy", "hot", "chili", "very-hot", "mala"];

const MAX_MAINS: usize = 2;
const MAX_SIDES: usize = 1;
const MAX_DESSERTS: usize = 1;
const MAIN_SHUFFLE_MIN_LEN: usize = 5;
const SHUFFLE_MIN_LEN: usize = 3;

pub(crate) const NOTE_NO_CATALOG: &str = "The catalog has no items to recommend from.";
pub(crate) const NOTE_ALL_EXCLUDED: &str =
    "Every item was ruled out by your excluded ingredients or spice preference.";
pub(crate) const NOTE_ONLY_DECLINED_DRINKS: &str =
    "Only drinks are left after filtering, and you asked for no drinks.";

/// Tunable constants of the selection algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    /// Effective price of items without a listed price
    pub market_price: f64,
    /// Budget share the first main may cost
    pub first_main_share: f64,
    /// Budget share the running total may reach after the second main
    pub mains_share: f64,
    /// Budget share the running total may reach after the side
    pub side_share: f64,
    /// Cheapest mains reshuffled per turn
    pub main_shuffle_window: usize,
    /// Cheapest sides, drinks and desserts reshuffled per turn
    pub shuffle_window: usize,
    pub default_target: usize,
    pub min_target: usize,
    pub max_target: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            market_price: MARKET_PRICE,
            first_main_share: 0.40,
            mains_share: 0.65,
            side_share: 0.90,
            main_shuffle_window: 15,
            shuffle_window: 10,
            default_target: 5,
            min_target: 3,
            max_target: 8,
        }
    }
}

impl SelectionPolicy {
    /// Target item count: `people + 2` clamped to the policy bounds, or the default
    pub fn target_count(&self, people: Option<u32>) -> usize {
        match people {
            Some(p) if p > 0 => (p as usize + 2).clamp(self.min_target, self.max_target),
            _ => self.default_target,
        }
    }

    /// Check the shares are ordered and within `(0, 1]`
    pub fn validate(&self) -> Result<(), String> {
        let shares = [self.first_main_share, self.mains_share, self.side_share];
        if shares.iter().any(|s| !(*s > 0.0 && *s <= 1.0)) {
            return Err("budget shares must be in (0, 1]".to_string());
        }
        if self.first_main_share > self.mains_share || self.mains_share > self.side_share {
            return Err("budget shares must be non-decreasing".to_string());
        }
        if !(self.market_price.is_finite() && self.market_price > 0.0) {
            return Err("market_price must be positive".to_string());
        }
        if self.min_target == 0 || self.min_target > self.max_target {
            return Err("target bounds must satisfy 0 < min_target <= max_target".to_string());
        }
        Ok(())
    }
}

/// Target count with the default policy
pub fn target_count(state: &PreferenceState) -> usize {
    SelectionPolicy::default().target_count(state.people)
}

/// Select with the default policy
pub fn select(
    catalog: &ClassifiedCatalog,
    state: &PreferenceState,
    weights: &WeightVector,
    target_count: usize,
) -> Recommendation {
    Selector::default().select(catalog, state, weights, target_count)
}

/// Whether an item name is hit by an exclude token (case-insensitive substring).
///
/// A plural token also excludes its singular as a whole word (`peanuts` rules out
/// `Peanut Satay`, while `peas` leaves `Peanut Butter Toast` alone).
pub fn is_excluded(name: &str, excludes: &[String]) -> bool {
    let lower = name.to_lowercase();
    excludes.iter().any(|token| {
        let token = token.to_lowercase();
        if token.is_empty() {
            return false;
        }
        if lower.contains(&token) {
            return true;
        }
        match token.strip_suffix('s') {
            Some(stem) if stem.len() >= 3 => lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == stem),
            _ => false,
        }
    })
}

/// Whether an entry carries any spicy tag
pub fn is_spicy(entry: &CatalogEntry) -> bool {
    SPICY_TAGS.iter().any(|tag| entry.item.has_tag(tag))
}

/// Role-quota greedy selector
#[derive(Debug, Clone, Default)]
pub struct Selector {
    policy: SelectionPolicy,
}

/// Running pick list
#[derive(Debug)]
struct Picks {
    items: Vec<SelectedItem>,
    total: f64,
    target: usize,
}

impl Picks {
    fn full(&self) -> bool {
        self.items.len() >= self.target
    }

    fn push(&mut self, entry: &CatalogEntry, cost: f64, reason: ReasonTag) {
        tracing::debug!(item = %entry.item.name, role = %entry.role, cost, %reason, "picked");
        self.total += cost;
        self.items.push(SelectedItem {
            name: entry.item.name.clone(),
            price: entry.item.price.filter(|p| *p > 0.0),
            effective_price: cost,
            category: entry.category.clone(),
            role: entry.role,
            reason,
        });
    }
}

impl Selector {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    fn price(&self, entry: &CatalogEntry) -> f64 {
        entry.item.effective_price(self.policy.market_price)
    }

    /// Produce a recommendation for the given state.
    ///
    /// Pure: identical inputs give an identical recommendation, including order.
    pub fn select(
        &self,
        catalog: &ClassifiedCatalog,
        state: &PreferenceState,
        weights: &WeightVector,
        target_count: usize,
    ) -> Recommendation {
        let meta = RecommendationMeta::from(state);
        let target = target_count.max(1);

        if catalog.is_empty() {
            return Recommendation::empty(NOTE_NO_CATALOG, meta, target);
        }

        let no_spice = state.spice_level == Some(SpiceLevel::NotSpicy);
        let filtered: Vec<&CatalogEntry> = catalog
            .entries()
            .iter()
            .filter(|e| !is_excluded(&e.item.name, &state.excludes))
            .filter(|e| !(no_spice && is_spicy(e)))
            .collect();
        if filtered.is_empty() {
            return Recommendation::empty(NOTE_ALL_EXCLUDED, meta, target);
        }

        let lists = self.partition(&filtered, state, weights);
        let mut picks = Picks {
            items: Vec::new(),
            total: 0.0,
            target,
        };
        self.fill(&lists, state, &mut picks);

        if picks.items.is_empty() {
            return self.fallback(&filtered, state, weights, meta, target);
        }

        Recommendation {
            items: picks.items,
            notes: None,
            total_cost: picks.total,
            target_count: target,
            over_budget: false,
            meta,
        }
    }

    fn sort_by_price(&self, list: &mut [&CatalogEntry], state: &PreferenceState, weights: &WeightVector) {
        let cuisine_tag = state
            .cuisine
            .filter(|_| weights.cuisine > 0.0)
            .map(|c| c.as_str());
        let push_spicy_last = weights.spice >= 0.5;

        list.sort_by(|a, b| {
            self.price(a)
                .total_cmp(&self.price(b))
                .then_with(|| match cuisine_tag {
                    Some(tag) => b.item.has_tag(tag).cmp(&a.item.has_tag(tag)),
                    None => Ordering::Equal,
                })
                .then_with(|| {
                    if push_spicy_last {
                        is_spicy(a).cmp(&is_spicy(b))
                    } else {
                        Ordering::Equal
                    }
                })
        });
    }

    /// Role lists in selection order: main, side, drink, dessert, other
    fn partition<'a>(
        &self,
        filtered: &[&'a CatalogEntry],
        state: &PreferenceState,
        weights: &WeightVector,
    ) -> [Vec<&'a CatalogEntry>; 5] {
        let seed = variety_seed(state, weights);
        let mut lists: [Vec<&CatalogEntry>; 5] = Default::default();

        for (slot, role) in Role::ALL.iter().enumerate() {
            let mut list: Vec<&CatalogEntry> =
                filtered.iter().copied().filter(|e| e.role == *role).collect();
            self.sort_by_price(&mut list, state, weights);

            match role {
                Role::Main => list = self.order_mains(list, state.preferred_dish, seed),
                Role::Other => {}
                _ => variety::shuffle_window(
                    &mut list,
                    seed,
                    *role,
                    self.policy.shuffle_window,
                    SHUFFLE_MIN_LEN,
                ),
            }
            lists[slot] = list;
        }
        lists
    }

    /// Preferred dish kind first, each sublist shuffled on its own
    fn order_mains<'a>(
        &self,
        mains: Vec<&'a CatalogEntry>,
        preferred: Option<DishKind>,
        seed: u64,
    ) -> Vec<&'a CatalogEntry> {
        let window = self.policy.main_shuffle_window;
        match preferred {
            None => {
                let mut mains = mains;
                variety::shuffle_window(&mut mains, seed, Role::Main, window, MAIN_SHUFFLE_MIN_LEN);
                mains
            }
            Some(kind) => {
                let (mut matching, mut rest): (Vec<_>, Vec<_>) =
                    mains.into_iter().partition(|e| kind.matches(&e.item.name));
                variety::shuffle_window(&mut matching, seed, Role::Main, window, MAIN_SHUFFLE_MIN_LEN);
                variety::shuffle_window(&mut rest, !seed, Role::Main, window, MAIN_SHUFFLE_MIN_LEN);
                matching.extend(rest);
                matching
            }
        }
    }

    fn fill(&self, lists: &[Vec<&CatalogEntry>; 5], state: &PreferenceState, picks: &mut Picks) {
        let cap = |share: f64| state.budget.map_or(f64::INFINITY, |b| b * share);
        let first_main_cap = cap(self.policy.first_main_share);
        let mains_cap = cap(self.policy.mains_share);
        let side_cap = cap(self.policy.side_share);
        let full_cap = cap(1.0);

        let [mains, sides, drinks, desserts, others] = lists;

        let mut taken = 0;
        for entry in mains {
            if taken == MAX_MAINS {
                break;
            }
            let cost = self.price(entry);
            let limit = if taken == 0 { first_main_cap } else { mains_cap };
            if picks.total + cost <= limit {
                picks.push(entry, cost, ReasonTag::PrimaryMainPick);
                taken += 1;
            } else {
                tracing::debug!(item = %entry.item.name, cost, limit, "main skipped for budget cap");
            }
        }

        self.fill_role(sides, MAX_SIDES, side_cap, ReasonTag::SidePairing, false, picks);

        if state.need_drink != Some(false) {
            let max_drinks = if state.people.unwrap_or(0) >= 4 { 2 } else { 1 };
            self.fill_role(drinks, max_drinks, full_cap, ReasonTag::DrinkPairing, false, picks);
        }

        self.fill_role(desserts, MAX_DESSERTS, full_cap, ReasonTag::DessertPairing, true, picks);
        self.fill_role(others, usize::MAX, full_cap, ReasonTag::ExtraFill, true, picks);
    }

    fn fill_role(
        &self,
        list: &[&CatalogEntry],
        max: usize,
        limit: f64,
        reason: ReasonTag,
        bounded_by_target: bool,
        picks: &mut Picks,
    ) {
        let mut taken = 0;
        for entry in list {
            if taken == max || (bounded_by_target && picks.full()) {
                break;
            }
            let cost = self.price(entry);
            if picks.total + cost <= limit {
                picks.push(entry, cost, reason);
                taken += 1;
            }
        }
    }

    /// Cheapest mains ignoring the main caps, else the cheapest items of any role
    fn fallback(
        &self,
        filtered: &[&CatalogEntry],
        state: &PreferenceState,
        weights: &WeightVector,
        meta: RecommendationMeta,
        target: usize,
    ) -> Recommendation {
        let mut pool: Vec<&CatalogEntry> = filtered
            .iter()
            .copied()
            .filter(|e| !(state.need_drink == Some(false) && e.role == Role::Drink))
            .collect();
        if pool.is_empty() {
            return Recommendation::empty(NOTE_ONLY_DECLINED_DRINKS, meta, target);
        }
        self.sort_by_price(&mut pool, state, weights);

        let mut picks = Picks {
            items: Vec::new(),
            total: 0.0,
            target,
        };
        let budget = state.budget.unwrap_or(f64::INFINITY);

        let mains: Vec<&CatalogEntry> = pool.iter().copied().filter(|e| e.role == Role::Main).collect();
        if let Some(first) = mains.first() {
            picks.push(first, self.price(first), ReasonTag::BudgetFallback);
            if let Some(second) = mains.get(1) {
                let cost = self.price(second);
                if !picks.full() && picks.total + cost <= budget {
                    picks.push(second, cost, ReasonTag::BudgetFallback);
                }
            }
        } else {
            let max_drinks = if state.people.unwrap_or(0) >= 4 { 2 } else { 1 };
            let mut counts = [0usize; 5];
            for entry in &pool {
                if picks.full() {
                    break;
                }
                let slot = Role::ALL.iter().position(|r| *r == entry.role).unwrap_or(4);
                let max = match entry.role {
                    Role::Main => MAX_MAINS,
                    Role::Side => MAX_SIDES,
                    Role::Drink => max_drinks,
                    Role::Dessert => MAX_DESSERTS,
                    Role::Other => usize::MAX,
                };
                if counts[slot] < max {
                    counts[slot] += 1;
                    picks.push(entry, self.price(entry), ReasonTag::BudgetFallback);
                }
            }
        }

        let over_budget = picks.total > budget;
        let notes = if over_budget {
            tracing::debug!(total = picks.total, budget, "fallback exceeds budget");
            Some(format!(
                "Nothing fits a budget of {:.0}; showing the cheapest options instead.",
                budget
            ))
        } else {
            Some("No balanced set could be built; showing the cheapest options instead.".to_string())
        };

        Recommendation {
            items: picks.items,
            notes,
            total_cost: picks.total,
            target_count: target,
            over_budget,
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category, Item};
    use crate::preferences::{Cuisine, PreferenceDelta};

    fn classified(categories: Vec<Category>) -> ClassifiedCatalog {
        ClassifiedCatalog::new(&Catalog::new(categories).unwrap())
    }

    fn burger_shop() -> ClassifiedCatalog {
        classified(vec![
            Category::new(
                "Mains",
                vec![
                    Item::new("Cheeseburger", Some(120.0)),
                    Item::new("Veggie Wrap", Some(95.0)),
                    Item::new("Beef Noodle Soup", Some(140.0)),
                ],
            ),
            Category::new(
                "Sides",
                vec![Item::new("French Fries", Some(45.0)), Item::new("Onion Rings", Some(55.0))],
            ),
            Category::new(
                "Drinks",
                vec![Item::new("Cola", Some(30.0)), Item::new("Beer", Some(60.0))],
            ),
            Category::new("Desserts", vec![Item::new("Egg Tart", Some(35.0))]),
            Category::new(
                "Snacks",
                vec![Item::new("Peanut Satay", Some(80.0)).with_tag("spicy")],
            ),
        ])
    }

    fn state(delta: PreferenceDelta) -> PreferenceState {
        let mut state = PreferenceState::new();
        state.merge(&delta);
        state
    }

    fn run(catalog: &ClassifiedCatalog, state: &PreferenceState) -> Recommendation {
        select(catalog, state, state.weights(), target_count(state))
    }

    #[test]
    fn test_target_count_from_people() {
        let policy = SelectionPolicy::default();
        assert_eq!(policy.target_count(None), 5);
        assert_eq!(policy.target_count(Some(1)), 3);
        assert_eq!(policy.target_count(Some(4)), 6);
        assert_eq!(policy.target_count(Some(20)), 8);
    }

    #[test]
    fn test_unbounded_budget_fills_roles_in_order() {
        let catalog = burger_shop();
        let rec = run(&catalog, &PreferenceState::new());

        let roles: Vec<Role> = rec.items.iter().map(|i| i.role).collect();
        assert_eq!(
            roles,
            vec![Role::Main, Role::Main, Role::Side, Role::Drink, Role::Dessert]
        );
        assert_eq!(rec.target_count, 5);
        assert!(rec.notes.is_none());
        assert!(!rec.over_budget);
    }

    #[test]
    fn test_first_main_cap() {
        let catalog = burger_shop();
        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                budget: Some(300.0),
                ..Default::default()
            }),
        );
        // 40% of 300 is 120: the noodle soup can never be the first main
        assert!(rec.items[0].effective_price <= 120.0);
        assert!(rec.total_cost <= 300.0);
    }

    #[test]
    fn test_small_budget_example() {
        let catalog = classified(vec![
            Category::new(
                "Mains",
                vec![Item::new("Cheeseburger", Some(120.0)), Item::new("Veggie Wrap", Some(95.0))],
            ),
            Category::new(
                "Drinks",
                vec![Item::new("Cola", Some(30.0)), Item::new("Beer", Some(60.0))],
            ),
        ]);
        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                budget: Some(150.0),
                need_drink: Some(true),
                ..Default::default()
            }),
        );
        assert!(rec.total_cost <= 150.0);
        assert_eq!(rec.count_role(Role::Drink), 1);
        assert!(rec.count_role(Role::Main) <= 2);
        assert_eq!(rec.names(), vec!["Cola"]);
    }

    #[test]
    fn test_declined_drinks_never_selected() {
        let catalog = burger_shop();
        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                need_drink: Some(false),
                ..Default::default()
            }),
        );
        assert_eq!(rec.count_role(Role::Drink), 0);
    }

    #[test]
    fn test_two_drinks_for_four_people() {
        let catalog = burger_shop();
        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                people: Some(4),
                ..Default::default()
            }),
        );
        assert_eq!(rec.count_role(Role::Drink), 2);
        assert_eq!(rec.target_count, 6);
    }

    #[test]
    fn test_requested_drink_survives_a_full_target() {
        let catalog = burger_shop();
        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                people: Some(1),
                need_drink: Some(true),
                ..Default::default()
            }),
        );
        // two mains and a side already reach the target of 3
        assert_eq!(rec.target_count, 3);
        assert_eq!(rec.count_role(Role::Main), 2);
        assert_eq!(rec.count_role(Role::Side), 1);
        assert_eq!(rec.count_role(Role::Drink), 1);
        assert_eq!(rec.count_role(Role::Dessert), 0);
        assert_eq!(rec.count_role(Role::Other), 0);
    }

    #[test]
    fn test_plural_stem_only_matches_whole_words() {
        let peas = vec!["peas".to_string()];
        assert!(!is_excluded("Peanut Butter Toast", &peas));
        assert!(is_excluded("Mushy Pea Soup", &peas));
        assert!(is_excluded("Green Peas", &peas));

        let peanuts = vec!["peanuts".to_string()];
        assert!(is_excluded("Peanut Satay", &peanuts));
        assert!(is_excluded("Peanut-Butter Toast", &peanuts));
    }

    #[test]
    fn test_excludes_and_no_spice_filter() {
        let catalog = burger_shop();
        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                excludes: vec!["peanuts".into(), "cheese".into()],
                ..Default::default()
            }),
        );
        assert!(!rec.names().contains(&"Peanut Satay"));
        assert!(!rec.names().contains(&"Cheeseburger"));

        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                spice_level: Some(SpiceLevel::NotSpicy),
                ..Default::default()
            }),
        );
        assert!(rec.items.iter().all(|i| i.name != "Peanut Satay"));
    }

    #[test]
    fn test_preferred_dish_tried_first() {
        let catalog = burger_shop();
        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                preferred_dish: Some(DishKind::Burger),
                ..Default::default()
            }),
        );
        assert_eq!(rec.items[0].name, "Cheeseburger");
    }

    #[test]
    fn test_cuisine_tag_breaks_price_ties() {
        let catalog = classified(vec![Category::new(
            "Mains",
            vec![
                Item::new("Beef Rice", Some(100.0)),
                Item::new("Bibimbap Rice", Some(100.0)).with_tag("korean"),
            ],
        )]);
        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                cuisine: Some(Cuisine::Korean),
                ..Default::default()
            }),
        );
        assert_eq!(rec.items[0].name, "Bibimbap Rice");
    }

    #[test]
    fn test_empty_catalog_has_notes() {
        let rec = run(&ClassifiedCatalog::default(), &PreferenceState::new());
        assert!(rec.is_empty());
        assert_eq!(rec.notes.as_deref(), Some(NOTE_NO_CATALOG));
    }

    #[test]
    fn test_everything_excluded_has_notes() {
        let catalog = classified(vec![Category::new(
            "Snacks",
            vec![Item::new("Peanut Satay", Some(80.0))],
        )]);
        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                excludes: vec!["peanut".into()],
                ..Default::default()
            }),
        );
        assert!(rec.is_empty());
        assert_eq!(rec.notes.as_deref(), Some(NOTE_ALL_EXCLUDED));
    }

    #[test]
    fn test_only_declined_drinks_has_notes() {
        let catalog = classified(vec![Category::new("Drinks", vec![Item::new("Cola", Some(30.0))])]);
        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                need_drink: Some(false),
                ..Default::default()
            }),
        );
        assert!(rec.is_empty());
        assert_eq!(rec.notes.as_deref(), Some(NOTE_ONLY_DECLINED_DRINKS));
    }

    #[test]
    fn test_starvation_fallback_picks_cheapest_main() {
        let catalog = burger_shop();
        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                budget: Some(10.0),
                ..Default::default()
            }),
        );
        assert_eq!(rec.names(), vec!["Veggie Wrap"]);
        assert!(rec.items.iter().all(|i| i.reason == ReasonTag::BudgetFallback));
        assert!(rec.over_budget);
        assert!(rec.notes.is_some());
    }

    #[test]
    fn test_fallback_without_mains_respects_quotas() {
        let catalog = classified(vec![
            Category::new(
                "Drinks",
                vec![
                    Item::new("Cola", Some(30.0)),
                    Item::new("Lemon Tea", Some(35.0)),
                    Item::new("Espresso", Some(40.0)),
                ],
            ),
            Category::new("Desserts", vec![Item::new("Egg Tart", Some(35.0))]),
        ]);
        let rec = run(
            &catalog,
            &state(PreferenceDelta {
                budget: Some(5.0),
                ..Default::default()
            }),
        );
        assert_eq!(rec.count_role(Role::Drink), 1);
        assert_eq!(rec.count_role(Role::Dessert), 1);
        assert!(rec.over_budget);
    }

    #[test]
    fn test_market_price_items_use_placeholder() {
        let catalog = classified(vec![Category::new(
            "Specials",
            vec![Item::new("Catch of the Day", None), Item::new("Lobster Platter", Some(0.0))],
        )]);
        let rec = run(&catalog, &PreferenceState::new());
        assert!(rec.items.iter().all(|i| i.price.is_none()));
        assert!(rec.items.iter().all(|i| i.effective_price == MARKET_PRICE));
    }

    #[test]
    fn test_exclude_matching() {
        let excludes = vec!["peanuts".to_string()];
        assert!(is_excluded("Peanut Satay", &excludes));
        assert!(!is_excluded("Pea Soup", &excludes));
        assert!(is_excluded("Shrimp Fried Rice", &["SHRIMP".to_string()]));
    }

    #[test]
    fn test_policy_validation() {
        assert!(SelectionPolicy::default().validate().is_ok());
        let bad = SelectionPolicy {
            first_main_share: 0.9,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
