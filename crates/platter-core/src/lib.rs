//! Platter Core - preference accumulation and constrained menu recommendation
//!
//! Platter Core turns a multi-turn conversation into a bounded, role-balanced selection
//! of menu items that respects a running budget.
//!
//! # Architecture
//!
//! 1. **Catalog** (`catalog`): validated, immutable menu data with roles attached
//! 2. **Preferences** (`preferences`): keyword extraction, sticky merge, weight derivation
//! 3. **Classifier** (`classifier`): keyword role table with pluggable overrides
//! 4. **Selector** (`selector`): role-quota greedy with budget reservation
//! 5. **Engine** (`engine`): one conversational turn, end to end
//!
//! # Quick Start
//!
//! ```
//! use platter_core::{Catalog, ClassifiedCatalog, Engine, PreferenceState, Role};
//!
//! let catalog = Catalog::from_json_str(r#"{
//!     "categories": [
//!         {"name": "Mains", "items": [
//!             {"name": "Cheeseburger", "price": 120, "tags": []},
//!             {"name": "Veggie Wrap", "price": 95, "tags": []}
//!         ]},
//!         {"name": "Drinks", "items": [
//!             {"name": "Cola", "price": 30, "tags": []}
//!         ]}
//!     ]
//! }"#).unwrap();
//! let classified = ClassifiedCatalog::new(&catalog);
//!
//! let engine = Engine::new();
//! let mut state = PreferenceState::new();
//! let rec = engine.turn(&mut state, "budget 300, no drinks", &classified);
//!
//! assert!(rec.total_cost <= 300.0);
//! assert_eq!(rec.count_role(Role::Drink), 0);
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations, clippy::all)]

pub mod catalog;
pub mod classifier;
pub mod engine;
pub mod error;
mod matching;
pub mod preferences;
pub mod selector;

// Re-export commonly used types for convenience
pub use catalog::{Catalog, CatalogEntry, Category, ClassifiedCatalog, Item, NormalizeStats, MARKET_PRICE};
pub use classifier::{Classifier, FallbackClassifier, KeywordClassifier, Role};
pub use engine::Engine;
pub use error::{CatalogError, CollaboratorError, PlatterError, Result};
pub use preferences::{
    extract, Cuisine, DishKind, Extractor, KeywordExtractor, LayeredExtractor, PreferenceDelta,
    PreferenceState, SpiceLevel, WeightVector,
};
pub use selector::{
    select, target_count, ReasonTag, Recommendation, RecommendationMeta, SelectedItem,
    SelectionPolicy, Selector,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
