// SPDX-License-Identifier: MPL-2.0
//! Journal entry types.
//!
//! Every orchestrator and sequencer handler records one structured entry
//! `{stage, attempt, cause}` per notable step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::session::LoadGeneration;

/// Session stage that produced an entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Engine bootstrap.
    Bootstrap,
    /// Auxiliary panel opening.
    Panels,
    /// Document load request.
    Load,
    /// Engine document lifecycle events.
    DocumentEvent,
    /// Spreadsheet editor activation.
    Activation,
    /// Session teardown.
    Teardown,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Bootstrap => "bootstrap",
            Stage::Panels => "panels",
            Stage::Load => "load",
            Stage::DocumentEvent => "document_event",
            Stage::Activation => "activation",
            Stage::Teardown => "teardown",
        }
    }
}

/// How serious an entry is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// One structured journal record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,
    pub stage: Stage,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl JournalEntry {
    #[must_use]
    pub fn new(stage: Stage, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            stage,
            severity,
            message: message.into(),
            generation: None,
            attempt: None,
            cause: None,
        }
    }

    #[must_use]
    pub fn debug(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, Severity::Debug, message)
    }

    #[must_use]
    pub fn info(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, Severity::Info, message)
    }

    #[must_use]
    pub fn warning(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, Severity::Warning, message)
    }

    #[must_use]
    pub fn error(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, Severity::Error, message)
    }

    #[must_use]
    pub fn with_generation(mut self, generation: LoadGeneration) -> Self {
        self.generation = Some(generation.value());
        self
    }

    #[must_use]
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl ToString) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_structured_fields() {
        let entry = JournalEntry::warning(Stage::Activation, "edit mode unavailable")
            .with_generation(LoadGeneration::new(2))
            .with_attempt(4)
            .with_cause("manager missing");

        assert_eq!(entry.stage, Stage::Activation);
        assert_eq!(entry.severity, Severity::Warning);
        assert_eq!(entry.generation, Some(2));
        assert_eq!(entry.attempt, Some(4));
        assert_eq!(entry.cause.as_deref(), Some("manager missing"));
    }

    #[test]
    fn serializes_stage_in_snake_case_and_skips_empty_fields() {
        let entry = JournalEntry::info(Stage::DocumentEvent, "loaded");
        let json = serde_json::to_string(&entry).expect("entry serializes");
        assert!(json.contains("\"stage\":\"document_event\""));
        assert!(json.contains("\"severity\":\"info\""));
        assert!(!json.contains("attempt"));
    }

    #[test]
    fn severity_orders_by_seriousness() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Info > Severity::Debug);
    }
}
