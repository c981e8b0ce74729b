//! Item Classifier - assigns every catalog item a functional role
//!
//! The keyword classifier is a fixed table lookup against the item name, checked in
//! priority order: drink, side, dessert, main, anything else is `other`. Alcoholic items
//! are always drinks.
//!
//! An external classifier (for instance a language model) can be plugged in through the
//! [`Classifier`] trait. Whenever it errors, [`classify_or_fallback`] answers with the
//! keyword table instead, so classification always yields exactly one role per item.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::Item;
use crate::error::CollaboratorError;
use crate::matching::keyword_regex;

/// Functional role of a menu item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Main,
    Side,
    Drink,
    Dessert,
    Other,
}

impl Role {
    /// Every role, in selection order
    pub const ALL: [Role; 5] = [Role::Main, Role::Side, Role::Drink, Role::Dessert, Role::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Main => "main",
            Role::Side => "side",
            Role::Drink => "drink",
            Role::Dessert => "dessert",
            Role::Other => "other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CollaboratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" => Ok(Role::Main),
            "side" => Ok(Role::Side),
            "drink" => Ok(Role::Drink),
            "dessert" => Ok(Role::Dessert),
            "other" => Ok(Role::Other),
            other => Err(CollaboratorError::failed(
                "role-parser",
                format!("unknown role `{}`", other),
            )),
        }
    }
}

lazy_static! {
    static ref DRINK: Regex = keyword_regex(
        &[
            "coffee", "latte", "mocha", "espresso", "cappuccino", "americano", "soda", "juice",
            "lemonade", "smoothie", "milkshake", "beer", "wine", "whisk", "vodka", "tequila",
            "champagne", "cocktail", "liquor", "alcohol", "kombucha", "frappe",
        ],
        &[
            "tea", "cola", "coke", "sprite", "fanta", "ale", "lager", "stout", "gin", "rum",
            "sake", "soju", "cider", "water", "drink", "beverage", "boba",
        ],
    );
    static ref SIDE: Regex = keyword_regex(
        &[
            "fries", "nugget", "onion ring", "hash brown", "coleslaw", "mozzarella stick",
            "tater tot", "popcorn chicken", "chicken wing", "edamame",
        ],
        &["salad", "chip", "wing", "ring", "side"],
    );
    static ref DESSERT: Regex = keyword_regex(
        &[
            "ice cream", "sundae", "cake", "pastry", "brownie", "cookie", "pudding",
            "croissant", "donut", "doughnut", "muffin", "macaron", "mochi", "churro",
            "parfait", "gelato", "tiramisu", "waffle", "scone", "biscuit", "dessert",
        ],
        &["tart", "pie", "flan", "crepe"],
    );
    static ref MAIN: Regex = keyword_regex(
        &[
            "burger", "sandwich", "toast", "bagel", "noodle", "ramen", "udon", "pasta",
            "spaghetti", "risotto", "burrito", "pizza", "steak", "curry", "lasagna",
            "dumpling", "set meal", "combo", "platter", "panini",
        ],
        &["rice", "wrap", "taco", "bowl", "meal", "hot dog", "sub", "pho"],
    );
}

/// Deterministic keyword classification of an item name
pub fn classify(item: &Item) -> Role {
    classify_name(&item.name)
}

/// Keyword classification on a bare name
pub fn classify_name(name: &str) -> Role {
    if DRINK.is_match(name) {
        Role::Drink
    } else if SIDE.is_match(name) {
        Role::Side
    } else if DESSERT.is_match(name) {
        Role::Dessert
    } else if MAIN.is_match(name) {
        Role::Main
    } else {
        Role::Other
    }
}

/// Pluggable classification strategy
pub trait Classifier: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Assign a role, or report why the item could not be classified
    fn classify(&self, item: &Item) -> Result<Role, CollaboratorError>;
}

/// Keyword-table classifier. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl Classifier for KeywordClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    fn classify(&self, item: &Item) -> Result<Role, CollaboratorError> {
        Ok(classify(item))
    }
}

/// Run `classifier`, answering with the keyword table if it fails
pub fn classify_or_fallback(classifier: &dyn Classifier, item: &Item) -> Role {
    match classifier.classify(item) {
        Ok(role) => role,
        Err(err) => {
            tracing::warn!(
                classifier = classifier.name(),
                item = %item.name,
                error = %err,
                "classifier override failed, using keyword table"
            );
            classify(item)
        }
    }
}

/// An override classifier backed by the keyword table.
///
/// Every item the override cannot classify gets its keyword role instead.
pub struct FallbackClassifier<C> {
    inner: C,
}

impl<C: Classifier> FallbackClassifier<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Classifier> fmt::Debug for FallbackClassifier<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackClassifier")
            .field("inner", &self.inner.name())
            .finish()
    }
}

impl<C: Classifier> Classifier for FallbackClassifier<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn classify(&self, item: &Item) -> Result<Role, CollaboratorError> {
        Ok(classify_or_fallback(&self.inner, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str) -> Role {
        classify(&Item::new(name, Some(10.0)))
    }

    #[test]
    fn test_drinks_including_alcohol() {
        assert_eq!(role("Cola"), Role::Drink);
        assert_eq!(role("Iced Lemon Tea"), Role::Drink);
        assert_eq!(role("Draft Beer"), Role::Drink);
        assert_eq!(role("House Red Wine"), Role::Drink);
        assert_eq!(role("Single Malt Whisky"), Role::Drink);
        assert_eq!(role("Gin & Tonic"), Role::Drink);
    }

    #[test]
    fn test_word_keywords_do_not_match_inside_words() {
        assert_eq!(role("Ribeye Steak"), Role::Main);
        assert_eq!(role("Chocolate Lava Cake"), Role::Dessert);
        assert_eq!(role("Ginger Chicken Rice"), Role::Main);
        assert_eq!(role("Kale Caesar Salad"), Role::Side);
    }

    #[test]
    fn test_priority_order() {
        // drink beats main
        assert_eq!(role("Burger and Beer Combo"), Role::Drink);
        // side beats main
        assert_eq!(role("Burger Fries"), Role::Side);
        // dessert beats main
        assert_eq!(role("Rice Pudding"), Role::Dessert);
    }

    #[test]
    fn test_mains_and_other() {
        assert_eq!(role("Cheeseburger"), Role::Main);
        assert_eq!(role("Veggie Wrap"), Role::Main);
        assert_eq!(role("Beef Noodle Soup"), Role::Main);
        assert_eq!(role("Everything Bagel"), Role::Main);
        assert_eq!(role("Peanut Satay"), Role::Other);
        assert_eq!(role("Soup of the Day"), Role::Other);
    }

    #[test]
    fn test_sides_and_desserts() {
        assert_eq!(role("Chicken Nuggets (6 pcs)"), Role::Side);
        assert_eq!(role("Onion Rings"), Role::Side);
        assert_eq!(role("Egg Tart"), Role::Dessert);
        assert_eq!(role("Vanilla Ice Cream"), Role::Dessert);
    }

    struct Failing;

    impl Classifier for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn classify(&self, _item: &Item) -> Result<Role, CollaboratorError> {
            Err(CollaboratorError::failed("failing", "offline"))
        }
    }

    #[test]
    fn test_fallback_on_override_failure() {
        let item = Item::new("Cola", Some(30.0));
        assert_eq!(classify_or_fallback(&Failing, &item), Role::Drink);
        assert_eq!(classify_or_fallback(&KeywordClassifier, &item), Role::Drink);
    }

    #[test]
    fn test_fallback_classifier_never_fails() {
        let wrapped = FallbackClassifier::new(Failing);
        let item = Item::new("Vanilla Ice Cream", Some(40.0));
        assert_eq!(wrapped.classify(&item).unwrap(), Role::Dessert);
        assert_eq!(wrapped.name(), "failing");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(" Dessert ".parse::<Role>().unwrap(), Role::Dessert);
        assert!("snack".parse::<Role>().is_err());
    }
}
