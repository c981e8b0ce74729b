//! JSONL turn log
//!
//! One line per handled turn. Logging is best effort: a failed write is reported through
//! `tracing` and never fails the turn. [`summarize`] reads a log back into preference
//! counts.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use platter_core::{PreferenceState, Recommendation};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::session::SessionId;

/// A single logged turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord<'a> {
    pub session_id: &'a SessionId,
    pub text: &'a str,
    pub recommendation: &'a Recommendation,
    pub preferences: &'a PreferenceState,
    pub at: DateTime<Utc>,
}

/// Append-only JSONL writer
#[derive(Debug)]
pub struct TurnLog {
    path: PathBuf,
    // serialises appends so lines from concurrent sessions never interleave
    lock: Mutex<()>,
}

impl TurnLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record, returning the I/O or encoding error if any
    pub fn try_append(&self, record: &TurnRecord<'_>) -> crate::Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.lock.lock();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Append a record, logging and swallowing any failure
    pub fn append(&self, record: &TurnRecord<'_>) {
        if let Err(e) = self.try_append(record) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write turn log");
        }
    }
}

/// Budget bands used by [`TurnStats`]
pub const BUDGET_BANDS: [&str; 3] = ["<500", "500-1000", ">1000"];

/// Preference counts aggregated over a turn log
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TurnStats {
    pub turns: usize,
    pub sessions: usize,
    /// Lines that were not valid JSON
    pub skipped_lines: usize,
    /// Turns per [`BUDGET_BANDS`] entry, for turns with a budget
    pub budget_bands: [usize; 3],
    pub drinks_wanted: usize,
    pub drinks_declined: usize,
    pub drinks_unmentioned: usize,
    pub spice_levels: BTreeMap<String, usize>,
    /// Turns answered by an over-budget fallback
    pub over_budget: usize,
}

impl TurnStats {
    fn record(&mut self, turn: &Value) {
        self.turns += 1;
        let prefs = &turn["preferences"];

        if let Some(budget) = prefs["budget"].as_f64() {
            let band = if budget < 500.0 {
                0
            } else if budget <= 1000.0 {
                1
            } else {
                2
            };
            self.budget_bands[band] += 1;
        }

        match prefs["needDrink"].as_bool() {
            Some(true) => self.drinks_wanted += 1,
            Some(false) => self.drinks_declined += 1,
            None => self.drinks_unmentioned += 1,
        }

        if let Some(level) = prefs["spiceLevel"].as_str().filter(|l| !l.is_empty()) {
            *self.spice_levels.entry(level.to_string()).or_insert(0) += 1;
        }

        if turn["recommendation"]["overBudget"].as_bool() == Some(true) {
            self.over_budget += 1;
        }
    }
}

/// Aggregate a JSONL turn log. Broken lines are counted and skipped.
pub fn summarize(path: impl AsRef<Path>) -> crate::Result<TurnStats> {
    let path = path.as_ref();
    let reader = BufReader::new(std::fs::File::open(path)?);
    let mut stats = TurnStats::default();
    let mut sessions = HashSet::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(turn) => {
                if let Some(id) = turn["session_id"].as_str() {
                    sessions.insert(id.to_string());
                }
                stats.record(&turn);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), line = index + 1, error = %e, "skipping broken turn log line");
                stats.skipped_lines += 1;
            }
        }
    }

    stats.sessions = sessions.len();
    Ok(stats)
}
