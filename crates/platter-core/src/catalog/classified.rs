//! Catalog with roles attached
//!
//! Classification runs once per catalog load. The result is read-only and meant to be
//! shared behind an `Arc` by every session; a reload builds a fresh value.

use serde::Serialize;
use std::collections::BTreeMap;

use super::{Catalog, Item};
use crate::classifier::{self, Classifier, Role};

/// One item together with its category and role
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub item: Item,
    pub category: String,
    pub role: Role,
}

/// Immutable classified snapshot of a [`Catalog`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifiedCatalog {
    entries: Vec<CatalogEntry>,
}

impl ClassifiedCatalog {
    /// Classify with the keyword table
    pub fn new(catalog: &Catalog) -> Self {
        Self::from_roles(catalog, &[])
    }

    /// Classify with a pluggable classifier, falling back per item on failure
    pub fn with_classifier(catalog: &Catalog, classifier: &dyn Classifier) -> Self {
        let entries = catalog
            .items()
            .map(|(category, item)| CatalogEntry {
                item: item.clone(),
                category: category.to_string(),
                role: classifier::classify_or_fallback(classifier, item),
            })
            .collect();
        Self { entries }
    }

    /// Attach roles produced elsewhere (e.g. a batch override), in catalog order.
    ///
    /// Missing or `None` positions are filled from the keyword table.
    pub fn from_roles(catalog: &Catalog, roles: &[Option<Role>]) -> Self {
        let entries = catalog
            .items()
            .enumerate()
            .map(|(index, (category, item))| CatalogEntry {
                item: item.clone(),
                category: category.to_string(),
                role: roles
                    .get(index)
                    .copied()
                    .flatten()
                    .unwrap_or_else(|| classifier::classify(item)),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of items per role
    pub fn role_counts(&self) -> BTreeMap<Role, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.role).or_insert(0) += 1;
        }
        counts
    }
}

impl From<&Catalog> for ClassifiedCatalog {
    fn from(catalog: &Catalog) -> Self {
        Self::new(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::error::CollaboratorError;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Category::new(
                "Mains",
                vec![Item::new("Cheeseburger", Some(120.0)), Item::new("Veggie Wrap", Some(95.0))],
            ),
            Category::new("Drinks", vec![Item::new("Cola", Some(30.0))]),
        ])
        .unwrap()
    }

    #[test]
    fn test_keyword_classification_keeps_order_and_category() {
        let classified = ClassifiedCatalog::new(&catalog());
        let names: Vec<_> = classified.entries().iter().map(|e| e.item.name.as_str()).collect();
        assert_eq!(names, vec!["Cheeseburger", "Veggie Wrap", "Cola"]);
        assert_eq!(classified.entries()[2].category, "Drinks");
        assert_eq!(classified.role_counts()[&Role::Main], 2);
        assert_eq!(classified.role_counts()[&Role::Drink], 1);
    }

    #[test]
    fn test_from_roles_fills_gaps_from_keywords() {
        let classified = ClassifiedCatalog::from_roles(&catalog(), &[Some(Role::Other), None]);
        let roles: Vec<_> = classified.entries().iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::Other, Role::Main, Role::Drink]);
    }

    struct EverythingIsDessert;

    impl Classifier for EverythingIsDessert {
        fn name(&self) -> &str {
            "dessert-only"
        }

        fn classify(&self, item: &Item) -> Result<Role, CollaboratorError> {
            if item.name == "Cola" {
                Err(CollaboratorError::failed("dessert-only", "refused"))
            } else {
                Ok(Role::Dessert)
            }
        }
    }

    #[test]
    fn test_with_classifier_falls_back_per_item() {
        let classified = ClassifiedCatalog::with_classifier(&catalog(), &EverythingIsDessert);
        let roles: Vec<_> = classified.entries().iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::Dessert, Role::Dessert, Role::Drink]);
    }
}
