// SPDX-License-Identifier: MPL-2.0
//! Viewer session state machine.
//!
//! This module defines the lifecycle states of a viewer session and the
//! generation tag used to discard stale engine events.

use std::fmt;

/// Represents the current lifecycle state of a viewer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Session constructed, engine not requested yet.
    #[default]
    Uninitialized,
    /// Engine bootstrap in progress.
    EngineStarting,
    /// Engine is up and no document has been requested.
    EngineReady,
    /// A document load was requested and has not been confirmed.
    DocumentLoading,
    /// The engine confirmed the current document.
    DocumentLoaded,
    /// Waiting for the spreadsheet edit-mode capability.
    EditorActivating,
    /// Spreadsheet editing enabled.
    EditorReady,
    /// Spreadsheet editing could not be enabled; document stays read-only.
    EditorUnavailable,
    /// Engine bootstrap failed. Terminal.
    Failed,
}

impl SessionState {
    /// Returns true once the engine is bootstrapped and until teardown or failure.
    #[must_use]
    pub fn is_engine_up(self) -> bool {
        !matches!(
            self,
            Self::Uninitialized | Self::EngineStarting | Self::Failed
        )
    }

    /// Returns true if the state waits on an asynchronous engine result.
    #[must_use]
    pub fn is_transitional(self) -> bool {
        matches!(
            self,
            Self::EngineStarting | Self::DocumentLoading | Self::EditorActivating
        )
    }

    /// Returns true if a document is on screen (editable or not).
    #[must_use]
    pub fn has_document(self) -> bool {
        matches!(
            self,
            Self::DocumentLoaded
                | Self::EditorActivating
                | Self::EditorReady
                | Self::EditorUnavailable
        )
    }

    /// Stable lowercase label used in logs and journal exports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::EngineStarting => "engine_starting",
            Self::EngineReady => "engine_ready",
            Self::DocumentLoading => "document_loading",
            Self::DocumentLoaded => "document_loaded",
            Self::EditorActivating => "editor_activating",
            Self::EditorReady => "editor_ready",
            Self::EditorUnavailable => "editor_unavailable",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monotonically increasing tag identifying one document load request.
///
/// Engine events carry the tag of the request that produced them; the session
/// only acts on events whose tag equals its current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoadGeneration(u64);

impl LoadGeneration {
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the tag for the next load request.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
