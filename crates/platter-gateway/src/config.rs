//! Gateway configuration

use platter_core::SelectionPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::GatewayError;

/// Phrases that clear a session when sent as the whole turn
pub const DEFAULT_RESET_KEYWORDS: &[&str] = &["reset", "clear", "start over", "forget it", "clear memory"];

/// Main gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Session configuration
    pub session: SessionSettings,

    /// Turn texts that reset the session state
    pub reset_keywords: Vec<String>,

    /// JSONL file receiving one record per turn
    pub turn_log_path: Option<PathBuf>,

    /// Time allowed for an external classifier override, in milliseconds
    pub override_timeout_ms: u64,

    /// Selection constants
    pub policy: SelectionPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            session: SessionSettings::default(),
            reset_keywords: DEFAULT_RESET_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            turn_log_path: None,
            override_timeout_ms: 30_000,
            policy: SelectionPolicy::default(),
        }
    }
}

impl GatewayConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session timeout
    pub fn with_session_timeout(mut self, secs: u64) -> Self {
        self.session.timeout_secs = secs;
        self
    }

    /// Set the session cap
    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.session.max_sessions = max;
        self
    }

    /// Append turn records to this file
    pub fn with_turn_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.turn_log_path = Some(path.into());
        self
    }

    /// Replace the reset keywords
    pub fn with_reset_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reset_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set the override timeout
    pub fn with_override_timeout_ms(mut self, millis: u64) -> Self {
        self.override_timeout_ms = millis;
        self
    }

    /// Set the selection policy
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reject settings the gateway cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.session.max_sessions == 0 {
            return Err(GatewayError::InvalidConfig(
                "session.max_sessions must be at least 1".to_string(),
            ));
        }
        if self.override_timeout_ms == 0 {
            return Err(GatewayError::InvalidConfig(
                "override_timeout_ms must be positive".to_string(),
            ));
        }
        self.policy.validate().map_err(GatewayError::InvalidConfig)
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file, TOML or JSON by extension
    pub fn to_file(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        let content = if is_toml(path) {
            toml::to_string_pretty(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Idle time after which a session is dropped
    pub timeout_secs: u64,

    /// Maximum number of live sessions
    pub max_sessions: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 3600, // 1 hour
            max_sessions: 10_000,
        }
    }
}
