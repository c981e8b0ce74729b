//! Main Gateway implementation
//!
//! Hosts the engine for many concurrent conversations: a session-keyed preference store,
//! an atomically swapped catalog snapshot and an optional turn log.

use chrono::Utc;
use parking_lot::RwLock;
use platter_core::{
    Catalog, ClassifiedCatalog, Engine, Extractor, Recommendation, RecommendationMeta,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::classify::{classify_with_override, ClassifierOverride};
use crate::config::GatewayConfig;
use crate::session::{SessionId, SessionStore};
use crate::turn_log::{TurnLog, TurnRecord};
use crate::Result;

/// Notes returned when a turn resets the session
pub const RESET_NOTE: &str = "Preferences cleared. Tell me what you'd like.";

/// Main Gateway
#[derive(Debug)]
pub struct Gateway {
    config: GatewayConfig,
    engine: Engine,
    sessions: SessionStore,
    catalog: RwLock<Arc<ClassifiedCatalog>>,
    turn_log: Option<TurnLog>,
}

impl Gateway {
    /// Create a new gateway with configuration and an empty catalog
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        let turn_log = config.turn_log_path.clone().map(TurnLog::new);
        Ok(Self {
            engine: Engine::new().with_policy(config.policy.clone()),
            sessions: SessionStore::new(&config.session),
            catalog: RwLock::new(Arc::new(ClassifiedCatalog::default())),
            turn_log,
            config,
        })
    }

    /// Create a gateway with default configuration
    pub fn default_config() -> Self {
        Self {
            engine: Engine::new(),
            sessions: SessionStore::new(&Default::default()),
            catalog: RwLock::new(Arc::new(ClassifiedCatalog::default())),
            turn_log: None,
            config: GatewayConfig::default(),
        }
    }

    /// Use a different preference extractor (e.g. a layered one with an NLU overlay)
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.engine = self.engine.with_extractor(extractor);
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Current catalog snapshot
    pub fn catalog(&self) -> Arc<ClassifiedCatalog> {
        self.catalog.read().clone()
    }

    /// Swap in an already classified snapshot. In-flight turns keep the old one.
    pub fn install(&self, classified: ClassifiedCatalog) -> usize {
        let items = classified.len();
        *self.catalog.write() = Arc::new(classified);
        tracing::info!(items, "catalog snapshot installed");
        items
    }

    /// Classify with the keyword table and swap the snapshot
    pub fn reload(&self, catalog: &Catalog) -> usize {
        self.install(ClassifiedCatalog::new(catalog))
    }

    /// Validate a catalog file, then swap it in. A bad file leaves the old snapshot.
    pub fn reload_from_path(&self, path: impl AsRef<Path>) -> Result<usize> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let catalog = Catalog::from_json_str(&content)?;
        Ok(self.reload(&catalog))
    }

    /// Classify through an external override under the configured timeout, then swap
    pub async fn reload_with_override(
        &self,
        catalog: &Catalog,
        classifier: &dyn ClassifierOverride,
    ) -> usize {
        let timeout = Duration::from_millis(self.config.override_timeout_ms);
        let classified = classify_with_override(catalog, classifier, timeout).await;
        self.install(classified)
    }

    /// Whether the whole turn is a reset command
    pub fn is_reset(&self, text: &str) -> bool {
        let normalized = text
            .trim()
            .trim_end_matches(|c: char| c.is_ascii_punctuation())
            .to_lowercase();
        !normalized.is_empty()
            && self
                .config
                .reset_keywords
                .iter()
                .any(|k| k.trim().to_lowercase() == normalized)
    }

    /// Handle one turn against the current catalog snapshot
    pub fn handle_turn(&self, session: &SessionId, text: &str) -> Result<Recommendation> {
        let catalog = self.catalog();
        self.handle_turn_with(session, text, &catalog)
    }

    /// Handle one turn against an explicit catalog.
    ///
    /// Turns for the same session are serialised; different sessions run in parallel.
    pub fn handle_turn_with(
        &self,
        session: &SessionId,
        text: &str,
        catalog: &ClassifiedCatalog,
    ) -> Result<Recommendation> {
        let reset = self.is_reset(text);

        self.sessions.with_session(session, |slot| {
            slot.turns += 1;
            let recommendation = if reset {
                slot.state.reset();
                tracing::info!(session = %session, "session reset by keyword");
                Recommendation::empty(
                    RESET_NOTE,
                    RecommendationMeta::default(),
                    self.engine.policy().default_target,
                )
            } else {
                self.engine.turn(&mut slot.state, text, catalog)
            };

            tracing::debug!(
                session = %session,
                turn = slot.turns,
                items = recommendation.len(),
                total = recommendation.total_cost,
                "turn handled"
            );

            if let Some(log) = &self.turn_log {
                log.append(&TurnRecord {
                    session_id: session,
                    text,
                    recommendation: &recommendation,
                    preferences: &slot.state,
                    at: Utc::now(),
                });
            }
            recommendation
        })
    }

    /// Clear a session's preferences
    pub fn reset_session(&self, session: &SessionId) -> Result<()> {
        self.sessions.reset(session)
    }

    /// End a session
    pub fn end_session(&self, session: &SessionId) -> Result<()> {
        self.sessions.end_session(session)
    }

    /// Drop idle sessions
    pub fn cleanup_expired(&self) -> usize {
        self.sessions.cleanup_expired()
    }

    /// Shutdown the gateway, dropping every session
    pub fn shutdown(&self) -> usize {
        let dropped = self.sessions.shutdown();
        tracing::info!(sessions = dropped, "gateway shutdown");
        dropped
    }
}
