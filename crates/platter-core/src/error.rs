//! Error types for Platter Core
//!
//! Only catalog loading can fail in a way the caller sees. Extraction and selection are
//! total: an unrecognised cue leaves a field unset and an empty selection is a valid
//! [`Recommendation`](crate::selector::Recommendation).

use thiserror::Error;

/// Result type alias for Platter operations
pub type Result<T> = std::result::Result<T, PlatterError>;

/// Main error type for Platter operations
#[derive(Error, Debug)]
pub enum PlatterError {
    /// Catalog failed structural validation
    #[error("Catalog validation failed: {0}")]
    Catalog(#[from] CatalogError),

    /// An external classifier or extractor override failed
    #[error("Collaborator failure: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural problems found while loading a catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Malformed(String),

    #[error("catalog root must be an object with a `categories` array")]
    MissingCategories,

    #[error("category #{index} is not an object")]
    CategoryNotObject { index: usize },

    #[error("category #{index} has a missing or null name")]
    CategoryName { index: usize },

    #[error("category `{category}` (#{index}) must carry an `items` array")]
    CategoryItems { index: usize, category: String },

    #[error("item #{index} in category `{category}` is not an object")]
    ItemNotObject { category: String, index: usize },

    #[error("item #{index} in category `{category}` has an empty name")]
    ItemName { category: String, index: usize },

    #[error("item `{item}` in category `{category}` has an invalid price: {reason}")]
    ItemPrice {
        category: String,
        item: String,
        reason: String,
    },

    #[error("item `{item}` in category `{category}` has a non-string tag")]
    ItemTag { category: String, item: String },
}

/// Failures of optional external collaborators (LLM classifier, NLU extractor).
///
/// These never reach the selector; fallback wrappers log them and use the keyword path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    #[error("{collaborator} failed: {reason}")]
    Failed {
        collaborator: String,
        reason: String,
    },

    #[error("{collaborator} timed out after {millis} ms")]
    Timeout { collaborator: String, millis: u64 },

    #[error("{collaborator} answered {got} of {expected} items")]
    Incomplete {
        collaborator: String,
        expected: usize,
        got: usize,
    },
}

impl CollaboratorError {
    /// Shorthand for a generic failure
    pub fn failed(collaborator: impl Into<String>, reason: impl Into<String>) -> Self {
        CollaboratorError::Failed {
            collaborator: collaborator.into(),
            reason: reason.into(),
        }
    }
}
