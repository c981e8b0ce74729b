//! Session store - one preference state per conversation
//!
//! The store is an owned value created with the gateway and drained by
//! [`SessionStore::shutdown`]. Each session sits behind its own mutex so two turns for the
//! same session serialise, while turns for different sessions only share the read lock on
//! the map.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use platter_core::PreferenceState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::SessionSettings;
use crate::{GatewayError, Result};

/// Unique session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Fresh random identifier
    pub fn new() -> Self {
        Self(format!("session:{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live conversation
#[derive(Debug, Clone)]
pub struct SessionSlot {
    pub id: SessionId,

    /// Accumulated preferences
    pub state: PreferenceState,

    pub created_at: DateTime<Utc>,

    pub last_activity: DateTime<Utc>,

    /// Turns handled so far
    pub turns: u64,
}

impl SessionSlot {
    fn new(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            state: PreferenceState::new(),
            created_at: now,
            last_activity: now,
            turns: 0,
        }
    }

    /// Update last activity
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Idle for longer than `timeout_secs`
    pub fn is_expired(&self, timeout_secs: u64) -> bool {
        let elapsed = (Utc::now() - self.last_activity).num_seconds().max(0) as u64;
        elapsed > timeout_secs
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.clone(),
            created_at: self.created_at,
            last_activity: self.last_activity,
            turns: self.turns,
            preferences: self.state.clone(),
        }
    }
}

/// Session summary info
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub turns: u64,
    pub preferences: PreferenceState,
}

/// Session-keyed preference store
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionSlot>>>>,

    /// Maximum live sessions
    max_sessions: usize,

    /// Idle timeout
    timeout_secs: u64,
}

impl SessionStore {
    pub fn new(settings: &SessionSettings) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: settings.max_sessions,
            timeout_secs: settings.timeout_secs,
        }
    }

    /// Fetch a session, creating it on first use
    fn slot(&self, id: &SessionId) -> Result<Arc<Mutex<SessionSlot>>> {
        if let Some(slot) = self.sessions.read().get(id) {
            return Ok(slot.clone());
        }

        if self.session_count() >= self.max_sessions {
            self.cleanup_expired();
        }

        let mut sessions = self.sessions.write();
        // another turn may have created it while we waited for the write lock
        if let Some(slot) = sessions.get(id) {
            return Ok(slot.clone());
        }
        if sessions.len() >= self.max_sessions {
            return Err(GatewayError::SessionLimit(self.max_sessions));
        }

        let slot = Arc::new(Mutex::new(SessionSlot::new(id.clone())));
        sessions.insert(id.clone(), slot.clone());
        tracing::info!(session = %id, "session created");
        Ok(slot)
    }

    /// Run `f` with exclusive access to the session, creating it if needed.
    ///
    /// The per-session lock is held for the whole call.
    pub fn with_session<F, R>(&self, id: &SessionId, f: F) -> Result<R>
    where
        F: FnOnce(&mut SessionSlot) -> R,
    {
        let slot = self.slot(id)?;
        let mut guard = slot.lock();
        guard.touch();
        Ok(f(&mut *guard))
    }

    /// Snapshot of a session
    pub fn get(&self, id: &SessionId) -> Option<SessionInfo> {
        let slot = self.sessions.read().get(id).cloned()?;
        let info = slot.lock().info();
        Some(info)
    }

    /// Clear a session's preferences
    pub fn reset(&self, id: &SessionId) -> Result<()> {
        let slot = self
            .sessions
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::SessionNotFound(id.to_string()))?;
        let mut guard = slot.lock();
        guard.state.reset();
        guard.touch();
        tracing::info!(session = %id, "session reset");
        Ok(())
    }

    /// End a session
    pub fn end_session(&self, id: &SessionId) -> Result<()> {
        if self.sessions.write().remove(id).is_some() {
            tracing::info!(session = %id, "session ended");
            Ok(())
        } else {
            Err(GatewayError::SessionNotFound(id.to_string()))
        }
    }

    /// Clean up expired sessions
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        let expired: Vec<SessionId> = sessions
            .iter()
            .filter(|(_, slot)| slot.lock().is_expired(self.timeout_secs))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            sessions.remove(id);
            tracing::info!(session = %id, "session expired and removed");
        }
        expired.len()
    }

    /// Get session count
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Ids of all live sessions, sorted
    pub fn session_ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.sessions.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop every session, returning how many were live
    pub fn shutdown(&self) -> usize {
        let drained = std::mem::take(&mut *self.sessions.write());
        tracing::info!(sessions = drained.len(), "session store shut down");
        drained.len()
    }
}
