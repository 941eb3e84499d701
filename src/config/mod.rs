// SPDX-License-Identifier: MPL-2.0
//! This module handles the session configuration, loaded from a
//! `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[engine]` - Passthrough bootstrap values (asset path, license, mode, panels)
//! - `[session]` - Session behaviour (auto-loading the default sample)
//! - `[activation]` - Spreadsheet editor activation backoff
//! - `[diagnostics]` - Journal settings
//! - `[[samples]]` / `[[gallery]]` - Optional catalog replacing the built-in one
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` on the command line
//! 3. Set `VIEWER_SESSION_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use viewer_session::config;
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! config.session.auto_load_default = Some(false);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;
pub mod paths;

pub use defaults::*;

use crate::application::query::SampleCatalog;
use crate::domain::activation::ViewerMode;
use crate::domain::document::FileMetadata;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Enums (shared between sections)
// =============================================================================

/// Rendering mode requested at engine bootstrap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InitialMode {
    Default,
    #[default]
    SpreadsheetEditor,
}

impl From<InitialMode> for ViewerMode {
    fn from(mode: InitialMode) -> Self {
        match mode {
            InitialMode::Default => ViewerMode::Default,
            InitialMode::SpreadsheetEditor => ViewerMode::SpreadsheetEditor,
        }
    }
}

/// Backoff strategy used while waiting for the edit-mode capability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackoffStrategy {
    /// Start small, double after each failed attempt, capped.
    #[default]
    Exponential,
    /// Same interval between every attempt.
    Fixed,
}

// =============================================================================
// Section Structs
// =============================================================================

/// Values handed to the engine at bootstrap. Not validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default = "default_asset_path", skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,

    #[serde(default = "default_initial_mode", skip_serializing_if = "Option::is_none")]
    pub initial_mode: Option<InitialMode>,

    /// Panels opened once the engine is ready.
    #[serde(
        default = "default_auxiliary_panels",
        skip_serializing_if = "Option::is_none"
    )]
    pub auxiliary_panels: Option<Vec<String>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            asset_path: default_asset_path(),
            license_key: None,
            initial_mode: default_initial_mode(),
            auxiliary_panels: default_auxiliary_panels(),
        }
    }
}

/// Session behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Load the first catalog sample as soon as the engine is ready.
    #[serde(
        default = "default_auto_load_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_load_default: Option<bool>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_load_default: default_auto_load_default(),
        }
    }
}

/// Spreadsheet editor activation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<BackoffStrategy>,

    #[serde(
        default = "default_initial_backoff_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub initial_backoff_ms: Option<u64>,

    #[serde(
        default = "default_max_backoff_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_backoff_ms: Option<u64>,

    #[serde(default = "default_deadline_ms", skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,

    /// Interval of the fixed strategy.
    #[serde(
        default = "default_fixed_interval_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub fixed_interval_ms: Option<u64>,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            strategy: Some(BackoffStrategy::default()),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            deadline_ms: default_deadline_ms(),
            fixed_interval_ms: default_fixed_interval_ms(),
        }
    }
}

/// Diagnostics settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsConfig {
    #[serde(
        default = "default_journal_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub journal_capacity: Option<usize>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            journal_capacity: default_journal_capacity(),
        }
    }
}

/// A catalog entry as written in `settings.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub display_name: String,
    pub path: String,
    pub extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl From<CatalogEntry> for FileMetadata {
    fn from(entry: CatalogEntry) -> Self {
        let mut meta = FileMetadata::new(entry.name, entry.display_name, entry.path, entry.extension);
        if let Some(display_extension) = entry.display_extension {
            meta = meta.with_display_extension(display_extension);
        }
        if let Some(id) = entry.id {
            meta = meta.with_id(id);
        }
        if let Some(thumbnail) = entry.thumbnail {
            meta = meta.with_thumbnail(thumbnail);
        }
        meta
    }
}

impl From<&FileMetadata> for CatalogEntry {
    fn from(meta: &FileMetadata) -> Self {
        Self {
            name: meta.name().to_string(),
            display_name: meta.display_name().to_string(),
            path: meta.path().to_string(),
            extension: meta.extension().to_string(),
            display_extension: meta.display_extension().map(str::to_string),
            id: meta.id(),
            thumbnail: meta.thumbnail().map(str::to_string),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Session configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub activation: ActivationConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    /// Sample documents; the built-in set is used when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<CatalogEntry>,

    /// Gallery entries; the built-in set is used when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<CatalogEntry>,
}

impl Config {
    /// Builds the document catalog, falling back to the built-in lists.
    #[must_use]
    pub fn catalog(&self) -> SampleCatalog {
        let builtin = SampleCatalog::builtin();
        let samples = if self.samples.is_empty() {
            builtin.samples().to_vec()
        } else {
            self.samples.iter().cloned().map(FileMetadata::from).collect()
        };
        let gallery = if self.gallery.is_empty() {
            builtin.gallery().to_vec()
        } else {
            self.gallery.iter().cloned().map(FileMetadata::from).collect()
        };
        SampleCatalog::new(samples, gallery)
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_asset_path() -> Option<String> {
    Some(DEFAULT_ENGINE_ASSET_PATH.to_string())
}

fn default_initial_mode() -> Option<InitialMode> {
    Some(InitialMode::default())
}

fn default_auxiliary_panels() -> Option<Vec<String>> {
    Some(vec![DEFAULT_AUXILIARY_PANEL.to_string()])
}

fn default_auto_load_default() -> Option<bool> {
    Some(DEFAULT_AUTO_LOAD_DEFAULT)
}

fn default_initial_backoff_ms() -> Option<u64> {
    Some(DEFAULT_INITIAL_BACKOFF_MS)
}

fn default_max_backoff_ms() -> Option<u64> {
    Some(DEFAULT_MAX_BACKOFF_MS)
}

fn default_deadline_ms() -> Option<u64> {
    Some(DEFAULT_ACTIVATION_DEADLINE_MS)
}

fn default_fixed_interval_ms() -> Option<u64> {
    Some(DEFAULT_FIXED_INTERVAL_MS)
}

fn default_journal_capacity() -> Option<usize> {
    Some(DEFAULT_JOURNAL_CAPACITY)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), cause = %err, "falling back to default config");
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
