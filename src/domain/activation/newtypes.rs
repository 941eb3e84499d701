// SPDX-License-Identifier: MPL-2.0
//! Activation newtypes.
//!
//! This module provides type-safe wrappers for activation timing values,
//! ensuring they are always within valid ranges.

use std::time::Duration;

// =============================================================================
// Bounds
// =============================================================================

/// Backoff delay bounds in milliseconds (10 to 10000).
pub mod backoff_delay_bounds {
    /// Minimum delay between two attempts.
    pub const MIN: u64 = 10;
    /// Maximum delay between two attempts.
    pub const MAX: u64 = 10_000;
    /// Default first delay.
    pub const DEFAULT: u64 = 100;
}

/// Activation deadline bounds in milliseconds (100 to 60000).
pub mod activation_deadline_bounds {
    /// Minimum total activation budget.
    pub const MIN: u64 = 100;
    /// Maximum total activation budget.
    pub const MAX: u64 = 60_000;
    /// Default total activation budget.
    pub const DEFAULT: u64 = 5_000;
}

// =============================================================================
// BackoffDelay
// =============================================================================

/// Delay between two edit-mode capability queries.
///
/// # Example
///
/// ```
/// use viewer_session::domain::activation::BackoffDelay;
///
/// assert_eq!(BackoffDelay::from_millis(500).as_millis(), 500);
/// assert_eq!(BackoffDelay::from_millis(0).as_millis(), 10); // clamped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BackoffDelay(u64);

impl BackoffDelay {
    /// Creates a delay, clamping to the valid range.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self(millis.clamp(backoff_delay_bounds::MIN, backoff_delay_bounds::MAX))
    }

    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Returns the doubled delay, never exceeding `cap`.
    #[must_use]
    pub fn doubled(self, cap: BackoffDelay) -> Self {
        Self(self.0.saturating_mul(2).min(cap.0))
    }
}

impl Default for BackoffDelay {
    fn default() -> Self {
        Self(backoff_delay_bounds::DEFAULT)
    }
}

// =============================================================================
// ActivationDeadline
// =============================================================================

/// Total time budget for one editor activation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActivationDeadline(u64);

impl ActivationDeadline {
    /// Creates a deadline, clamping to the valid range.
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self(millis.clamp(
            activation_deadline_bounds::MIN,
            activation_deadline_bounds::MAX,
        ))
    }

    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for ActivationDeadline {
    fn default() -> Self {
        Self(activation_deadline_bounds::DEFAULT)
    }
}

// =============================================================================
// ActivationAttempt
// =============================================================================

/// One query/activation attempt made by the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationAttempt {
    /// 1-based attempt counter.
    pub attempt_number: u32,
    /// Time since the run started when the attempt was made.
    pub elapsed: Duration,
}

impl ActivationAttempt {
    #[must_use]
    pub fn new(attempt_number: u32, elapsed: Duration) -> Self {
        Self {
            attempt_number,
            elapsed,
        }
    }

    /// Number of attempts that failed before this one.
    #[must_use]
    pub fn retries(self) -> u32 {
        self.attempt_number.saturating_sub(1)
    }
}

// =============================================================================
// Engine mode identifiers
// =============================================================================

/// Spreadsheet edit mode understood by the engine's edit-mode manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    ReadOnly,
    Editing,
}

impl EditMode {
    /// Engine-defined numeric identifier.
    #[must_use]
    pub fn engine_value(self) -> u8 {
        match self {
            Self::ReadOnly => 0,
            Self::Editing => 1,
        }
    }
}

/// Rendering mode hint given to the engine at bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerMode {
    /// Engine default (PDF/generic document UI).
    Default,
    /// Spreadsheet editor UI.
    #[default]
    SpreadsheetEditor,
}

impl ViewerMode {
    /// Engine-defined mode name.
    #[must_use]
    pub fn engine_name(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::SpreadsheetEditor => "SPREADSHEET_EDITOR",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_delay_clamps() {
        assert_eq!(
            BackoffDelay::from_millis(0).as_millis(),
            backoff_delay_bounds::MIN
        );
        assert_eq!(
            BackoffDelay::from_millis(1_000_000).as_millis(),
            backoff_delay_bounds::MAX
        );
    }

    #[test]
    fn backoff_delay_doubles_up_to_cap() {
        let cap = BackoffDelay::from_millis(2000);
        let mut delay = BackoffDelay::default();
        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(delay.as_millis());
            delay = delay.doubled(cap);
        }
        assert_eq!(seen, vec![100, 200, 400, 800, 1600, 2000, 2000]);
    }

    #[test]
    fn deadline_clamps_and_defaults() {
        assert_eq!(
            ActivationDeadline::default().as_millis(),
            activation_deadline_bounds::DEFAULT
        );
        assert_eq!(
            ActivationDeadline::from_millis(1).as_millis(),
            activation_deadline_bounds::MIN
        );
        assert_eq!(
            ActivationDeadline::from_millis(5000).as_duration(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn attempt_counts_retries() {
        assert_eq!(ActivationAttempt::new(1, Duration::ZERO).retries(), 0);
        assert_eq!(
            ActivationAttempt::new(3, Duration::from_millis(300)).retries(),
            2
        );
    }

    #[test]
    fn mode_identifiers() {
        assert_eq!(EditMode::Editing.engine_value(), 1);
        assert_eq!(EditMode::ReadOnly.engine_value(), 0);
        assert_eq!(ViewerMode::default().engine_name(), "SPREADSHEET_EDITOR");
    }
}
