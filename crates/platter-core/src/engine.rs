//! Turn engine - extract, merge, select
//!
//! Composes the pieces for one conversational turn. The engine itself holds no session
//! state; the caller owns the [`PreferenceState`] and serialises turns per session.

use std::fmt;

use crate::catalog::ClassifiedCatalog;
use crate::preferences::{self, Extractor, KeywordExtractor, PreferenceState};
use crate::selector::{Recommendation, SelectionPolicy, Selector};

/// Stateless turn processor
pub struct Engine {
    extractor: Box<dyn Extractor>,
    selector: Selector,
}

impl Engine {
    /// Keyword extraction with the default selection policy
    pub fn new() -> Self {
        Self {
            extractor: Box::new(KeywordExtractor),
            selector: Selector::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selector = Selector::new(policy);
        self
    }

    pub fn policy(&self) -> &SelectionPolicy {
        self.selector.policy()
    }

    /// Run one turn: merge what the text says into `state`, then select.
    pub fn turn(
        &self,
        state: &mut PreferenceState,
        text: &str,
        catalog: &ClassifiedCatalog,
    ) -> Recommendation {
        let delta = match self.extractor.extract(text) {
            Ok(delta) => delta,
            Err(err) => {
                tracing::warn!(
                    extractor = self.extractor.name(),
                    error = %err,
                    "extractor failed, using keyword extraction"
                );
                preferences::extract(text)
            }
        };
        state.merge(&delta);

        let target = self.policy().target_count(state.people);
        self.selector.select(catalog, state, state.weights(), target)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("extractor", &self.extractor.name())
            .field("selector", &self.selector)
            .finish()
    }
}
