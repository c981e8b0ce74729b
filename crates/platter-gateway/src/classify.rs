//! Batch classifier override
//!
//! An external classifier (typically a language model behind an HTTP call) may label the
//! whole catalog in one request. It runs under a timeout; whatever it fails to answer is
//! labelled by the keyword table, so a catalog always comes out fully classified.

use async_trait::async_trait;
use platter_core::{Catalog, ClassifiedCatalog, CollaboratorError, Role};
use std::time::Duration;

/// Asynchronous whole-catalog classifier
#[async_trait]
pub trait ClassifierOverride: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Roles for `names`, in the same order
    async fn classify_batch(&self, names: &[String]) -> Result<Vec<Role>, CollaboratorError>;
}

/// Classify `catalog` with `classifier`, bounded by `timeout`.
///
/// Never fails: errors, timeouts and short answers fall back to keyword roles.
pub async fn classify_with_override(
    catalog: &Catalog,
    classifier: &dyn ClassifierOverride,
    timeout: Duration,
) -> ClassifiedCatalog {
    let names: Vec<String> = catalog.items().map(|(_, item)| item.name.clone()).collect();
    if names.is_empty() {
        return ClassifiedCatalog::new(catalog);
    }

    let outcome = match tokio::time::timeout(timeout, classifier.classify_batch(&names)).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout {
            collaborator: classifier.name().to_string(),
            millis: timeout.as_millis() as u64,
        }),
    };

    match outcome {
        Ok(roles) => {
            if roles.len() < names.len() {
                let err = CollaboratorError::Incomplete {
                    collaborator: classifier.name().to_string(),
                    expected: names.len(),
                    got: roles.len(),
                };
                tracing::warn!(error = %err, "filling missing roles from keyword table");
            }
            let roles: Vec<Option<Role>> = roles.into_iter().take(names.len()).map(Some).collect();
            tracing::info!(
                classifier = classifier.name(),
                items = names.len(),
                "catalog classified by override"
            );
            ClassifiedCatalog::from_roles(catalog, &roles)
        }
        Err(err) => {
            tracing::warn!(
                classifier = classifier.name(),
                error = %err,
                "classifier override failed, using keyword table"
            );
            ClassifiedCatalog::new(catalog)
        }
    }
}
