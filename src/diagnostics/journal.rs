// SPDX-License-Identifier: MPL-2.0
//! Session journal: structured log sink with bounded in-memory history.
//!
//! Each recorded entry is emitted through `tracing` with `stage`,
//! `generation`, `attempt` and `cause` fields, then kept in a
//! [`CircularBuffer`] so hosts can show or export recent activity.

use super::buffer::{JournalCapacity, CircularBuffer};
use super::events::{JournalEntry, Severity, Stage};
use crate::error::Result;

/// Bounded history of session journal entries.
#[derive(Debug, Clone)]
pub struct SessionJournal {
    entries: CircularBuffer<JournalEntry>,
    evicted: u64,
}

impl SessionJournal {
    #[must_use]
    pub fn new(capacity: JournalCapacity) -> Self {
        Self {
            entries: CircularBuffer::new(capacity),
            evicted: 0,
        }
    }

    /// Emits the entry as a tracing event and stores it.
    pub fn record(&mut self, entry: JournalEntry) {
        let stage = entry.stage.as_str();
        match entry.severity {
            Severity::Debug => tracing::debug!(
                stage,
                generation = ?entry.generation,
                attempt = ?entry.attempt,
                cause = ?entry.cause,
                "{}",
                entry.message
            ),
            Severity::Info => tracing::info!(
                stage,
                generation = ?entry.generation,
                attempt = ?entry.attempt,
                cause = ?entry.cause,
                "{}",
                entry.message
            ),
            Severity::Warning => tracing::warn!(
                stage,
                generation = ?entry.generation,
                attempt = ?entry.attempt,
                cause = ?entry.cause,
                "{}",
                entry.message
            ),
            Severity::Error => tracing::error!(
                stage,
                generation = ?entry.generation,
                attempt = ?entry.attempt,
                cause = ?entry.cause,
                "{}",
                entry.message
            ),
        }
        if self.entries.push(entry).is_some() {
            self.evicted += 1;
        }
    }

    /// Entries in chronological order.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    /// Entries produced by one stage, oldest first.
    pub fn entries_for(&self, stage: Stage) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().filter(move |entry| entry.stage == stage)
    }

    #[must_use]
    pub fn last(&self) -> Option<&JournalEntry> {
        self.entries.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if any entry at or above `severity` was recorded.
    #[must_use]
    pub fn has_severity(&self, severity: Severity) -> bool {
        self.entries.iter().any(|entry| entry.severity >= severity)
    }

    /// Entries dropped from the history since the session started.
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Serializes the history as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> Result<String> {
        let entries: Vec<&JournalEntry> = self.entries.iter().collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }
}

impl Default for SessionJournal {
    fn default() -> Self {
        Self::new(JournalCapacity::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnostics::journal_capacity_bounds;
    use crate::domain::session::LoadGeneration;

    #[test]
    fn record_keeps_entries_in_order() {
        let mut journal = SessionJournal::default();
        journal.record(JournalEntry::info(Stage::Bootstrap, "engine ready"));
        journal.record(JournalEntry::info(Stage::Load, "loading").with_generation(LoadGeneration::new(1)));

        let stages: Vec<_> = journal.entries().map(|e| e.stage).collect();
        assert_eq!(stages, vec![Stage::Bootstrap, Stage::Load]);
        assert_eq!(journal.last().map(|e| e.generation), Some(Some(1)));
    }

    #[test]
    fn capacity_bounds_history() {
        let mut journal = SessionJournal::new(JournalCapacity::new(0));
        for attempt in 0..(journal_capacity_bounds::MIN as u32 + 5) {
            journal.record(JournalEntry::debug(Stage::Activation, "retry").with_attempt(attempt));
        }
        assert_eq!(journal.len(), journal_capacity_bounds::MIN);
        assert_eq!(journal.entries().next().and_then(|e| e.attempt), Some(5));
        assert_eq!(journal.evicted(), 5);
    }

    #[test]
    fn filters_by_stage_and_severity() {
        let mut journal = SessionJournal::default();
        journal.record(JournalEntry::info(Stage::Load, "loading"));
        journal.record(JournalEntry::warning(Stage::Activation, "unavailable"));

        assert_eq!(journal.entries_for(Stage::Activation).count(), 1);
        assert!(journal.has_severity(Severity::Warning));
        assert!(!journal.has_severity(Severity::Error));
    }

    #[test]
    fn export_json_produces_array() {
        let mut journal = SessionJournal::default();
        journal.record(JournalEntry::error(Stage::Bootstrap, "failed").with_cause("no assets"));

        let json = journal.export_json().expect("export succeeds");
        let parsed: Vec<JournalEntry> = serde_json::from_str(&json).expect("valid json");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].cause.as_deref(), Some("no assets"));
    }
}
