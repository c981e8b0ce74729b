//! Platter Gateway - multi-session host for the recommendation engine
//!
//! Wraps [`platter_core::Engine`] for many concurrent conversations.
//!
//! # Architecture
//!
//! ```text
//!   turn(session, text)
//!          │
//!   ┌──────▼──────────┐     ┌─────────────────────┐
//!   │  SessionStore   │     │  catalog snapshot   │◄── reload / reload_with_override
//!   │ (per-id mutex)  │     │ Arc<ClassifiedCat.> │
//!   └──────┬──────────┘     └──────────┬──────────┘
//!          └──────────┬────────────────┘
//!              ┌──────▼──────┐
//!              │   Engine    │──► Recommendation ──► TurnLog (JSONL)
//!              └─────────────┘
//! ```
//!
//! # Features
//!
//! - **Session isolation**: preferences are keyed by session id and never leak across sessions
//! - **Hot reload**: catalogs are swapped atomically; in-flight turns keep their snapshot
//! - **Classifier override**: an async batch classifier bounded by a timeout
//! - **Turn log**: optional JSONL record of every turn, summarised by [`summarize`]

pub mod classify;
pub mod config;
pub mod error;
pub mod gateway;
pub mod session;
pub mod turn_log;

pub use classify::{classify_with_override, ClassifierOverride};
pub use config::{GatewayConfig, SessionSettings, DEFAULT_RESET_KEYWORDS};
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, RESET_NOTE};
pub use session::{SessionId, SessionInfo, SessionSlot, SessionStore};
pub use turn_log::{summarize, TurnLog, TurnRecord, TurnStats, BUDGET_BANDS};

/// Gateway version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
