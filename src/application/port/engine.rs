// SPDX-License-Identifier: MPL-2.0
//! Viewer engine port definition.
//!
//! The engine is an external black box: it boots against a host surface,
//! loads documents, reports lifecycle events, and exposes an edit-mode
//! manager once its spreadsheet editor has finished initializing.

use crate::domain::activation::{EditMode, ViewerMode};
use crate::domain::session::LoadGeneration;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

// =============================================================================
// EngineError
// =============================================================================

/// Errors reported by an engine adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine could not be started (missing assets, bad license, ...).
    Bootstrap(String),

    /// The engine rejected or failed to load a document.
    Load(String),

    /// A capability call (e.g. setting the edit mode) raised an error.
    Capability(String),

    /// A UI element could not be opened.
    Ui(String),

    /// The engine handle was disposed.
    Disposed,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Bootstrap(msg) => write!(f, "Engine bootstrap failed: {msg}"),
            EngineError::Load(msg) => write!(f, "Document load failed: {msg}"),
            EngineError::Capability(msg) => write!(f, "Engine capability call failed: {msg}"),
            EngineError::Ui(msg) => write!(f, "Engine UI call failed: {msg}"),
            EngineError::Disposed => write!(f, "Engine handle was disposed"),
        }
    }
}

impl std::error::Error for EngineError {}

// =============================================================================
// Bootstrap options
// =============================================================================

/// Opaque reference to the host element the engine renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceHandle(String);

impl SurfaceHandle {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Values passed through to the engine at bootstrap.
///
/// The session does not validate any of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Location of the engine's static assets.
    pub asset_path: String,
    pub license_key: Option<String>,
    pub initial_mode: ViewerMode,
    pub surface: SurfaceHandle,
}

// =============================================================================
// Load requests and events
// =============================================================================

/// Document content handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentPayload {
    /// In-memory bytes of a user-selected file.
    Bytes(Arc<[u8]>),
    /// Remote URL or local blob reference fetched by the engine itself.
    Url(String),
}

impl DocumentPayload {
    /// Returns a short description suitable for logs (never the bytes).
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            DocumentPayload::Bytes(bytes) => format!("{} bytes", bytes.len()),
            DocumentPayload::Url(url) => url.clone(),
        }
    }
}

/// A single document load instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Tag the engine must echo on events produced by this load.
    pub generation: LoadGeneration,
    pub payload: DocumentPayload,
    pub filename: String,
    /// Explicit extension hint, set for spreadsheets.
    pub extension: Option<String>,
    /// Explicit MIME type, set for spreadsheets.
    pub mime_type: Option<&'static str>,
}

impl LoadRequest {
    #[must_use]
    pub fn new(
        generation: LoadGeneration,
        payload: DocumentPayload,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            generation,
            payload,
            filename: filename.into(),
            extension: None,
            mime_type: None,
        }
    }

    /// Attaches the format hints the engine needs to pick its spreadsheet loader.
    #[must_use]
    pub fn with_format_hint(mut self, extension: impl Into<String>, mime_type: &'static str) -> Self {
        self.extension = Some(extension.into());
        self.mime_type = Some(mime_type);
        self
    }
}

/// Lifecycle events emitted by the engine after `subscribe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The document of `generation` finished loading. `filename` is the name
    /// the engine reports, which may be normalized.
    DocumentLoaded {
        generation: LoadGeneration,
        filename: String,
    },
    /// The document of `generation` failed after the load call resolved.
    DocumentLoadFailed {
        generation: LoadGeneration,
        cause: String,
    },
    /// Annotations of the document of `generation` are available.
    AnnotationsLoaded { generation: LoadGeneration },
}

impl EngineEvent {
    /// Generation tag carried by the event.
    #[must_use]
    pub fn generation(&self) -> LoadGeneration {
        match self {
            EngineEvent::DocumentLoaded { generation, .. }
            | EngineEvent::DocumentLoadFailed { generation, .. }
            | EngineEvent::AnnotationsLoaded { generation } => *generation,
        }
    }
}

// =============================================================================
// Port traits
// =============================================================================

/// Spreadsheet edit-mode capability exposed by a loaded engine.
///
/// The engine may expose the manager before its setter is attached, so
/// callers check [`has_set_edit_mode`](Self::has_set_edit_mode) first.
pub trait EditModeManager {
    /// Returns true if the edit-mode setter is attached.
    fn has_set_edit_mode(&self) -> bool;

    /// Switches the spreadsheet editor to `mode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine raises during the call.
    fn set_edit_mode(&mut self, mode: EditMode) -> Result<(), EngineError>;
}

/// A running engine instance bound to one viewer surface.
#[allow(async_fn_in_trait)]
pub trait EngineHandle {
    /// Instructs the engine to load a document.
    ///
    /// Resolves once the engine accepted the request; completion is reported
    /// later through [`EngineEvent::DocumentLoaded`].
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the request.
    async fn load_document(&mut self, request: LoadRequest) -> Result<(), EngineError>;

    /// Subscribes to lifecycle events. Called once, when the engine is ready.
    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<EngineEvent>;

    /// Returns the edit-mode manager if the engine has created it.
    fn edit_mode_manager(&mut self) -> Option<&mut dyn EditModeManager>;

    /// Opens auxiliary UI panels by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine does not know one of the panels.
    fn open_elements(&mut self, names: &[String]) -> Result<(), EngineError>;

    /// Releases engine resources. The handle is not used afterwards.
    fn dispose(&mut self) {}
}

/// Entry point of an engine: boots an instance into a surface.
#[allow(async_fn_in_trait)]
pub trait EngineBootstrap {
    type Handle: EngineHandle;

    /// Starts the engine with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Bootstrap`] if the engine fails to start.
    async fn bootstrap(&mut self, options: &EngineOptions) -> Result<Self::Handle, EngineError>;
}
