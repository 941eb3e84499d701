// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the session. Constants are organized by category.
//!
//! # Categories
//!
//! - **Engine**: Bootstrap passthrough values
//! - **Activation**: Edit-mode capability polling
//! - **Diagnostics**: Journal capacity

// ==========================================================================
// Engine Defaults
// ==========================================================================

/// Default location of the engine's static assets.
pub const DEFAULT_ENGINE_ASSET_PATH: &str = "../../lib/webviewer";

/// Auxiliary panel opened once the engine is ready.
pub const DEFAULT_AUXILIARY_PANEL: &str = "notesPanel";

/// Whether the first catalog sample is loaded as soon as the engine is ready.
pub const DEFAULT_AUTO_LOAD_DEFAULT: bool = true;

// ==========================================================================
// Activation Defaults
// ==========================================================================

/// First wait between two capability queries (milliseconds).
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 100;

/// Upper bound of the exponential backoff (milliseconds).
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 2_000;

/// Total activation budget (milliseconds).
pub const DEFAULT_ACTIVATION_DEADLINE_MS: u64 = 5_000;

/// Interval used by the fixed strategy (milliseconds).
pub const DEFAULT_FIXED_INTERVAL_MS: u64 = 500;

/// Minimum backoff (milliseconds).
pub const MIN_BACKOFF_MS: u64 = 10;

/// Maximum backoff (milliseconds).
pub const MAX_BACKOFF_MS: u64 = 10_000;

/// Minimum activation deadline (milliseconds).
pub const MIN_ACTIVATION_DEADLINE_MS: u64 = 100;

/// Maximum activation deadline (milliseconds).
pub const MAX_ACTIVATION_DEADLINE_MS: u64 = 60_000;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of journal entries kept in memory.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 256;

/// Minimum journal capacity.
pub const MIN_JOURNAL_CAPACITY: usize = 16;

/// Maximum journal capacity.
pub const MAX_JOURNAL_CAPACITY: usize = 4096;
