//! Bounded history of executed commands
//!
//! The planner has no undo; the log only records what ran and when, for
//! diagnostics and for hosts that show recent activity.

use crate::Outcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One executed command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Display name of the command
    pub name: String,
    /// When the command finished
    pub at: DateTime<Utc>,
    /// What it did
    pub outcome: Outcome,
}

/// Keeps the most recent command entries
#[derive(Debug, Clone)]
pub struct CommandLog {
    entries: VecDeque<LogEntry>,
    max_entries: usize,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::with_limit(100)
    }

    /// Create a log that keeps at most `max_entries` entries
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries.min(128)),
            max_entries: max_entries.max(1),
        }
    }

    /// Record a command, evicting the oldest entry when full
    pub fn record(&mut self, name: impl Into<String>, outcome: Outcome) {
        self.entries.push_back(LogEntry {
            name: name.into(),
            at: Utc::now(),
            outcome,
        });
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Entries oldest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_last() {
        let mut log = CommandLog::new();
        assert!(log.is_empty());
        log.record("Add Page", Outcome::Applied);
        log.record("Clear Page", Outcome::Declined);

        assert_eq!(log.len(), 2);
        let last = log.last().unwrap();
        assert_eq!(last.name, "Clear Page");
        assert_eq!(last.outcome, Outcome::Declined);
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut log = CommandLog::with_limit(3);
        for i in 0..5 {
            log.record(format!("cmd {i}"), Outcome::Applied);
        }
        let names: Vec<_> = log.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["cmd 2", "cmd 3", "cmd 4"]);
    }
}
