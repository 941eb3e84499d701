// SPDX-License-Identifier: MPL-2.0
//! In-memory viewer engine adapter.
//!
//! Behaves like an embeddable engine whose spreadsheet editor initializes
//! late: the edit-mode manager shows up after a scripted number of queries,
//! its setter may attach later still, and calls can fail. Load failures,
//! filename normalization and event timing are scriptable too.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::application::port::{
    EditModeManager, EngineBootstrap, EngineError, EngineEvent, EngineHandle, EngineOptions,
    LoadRequest, SurfaceHandle,
};
use crate::domain::activation::{EditMode, ViewerMode};

// =============================================================================
// Scripts
// =============================================================================

/// When the edit-mode capability becomes usable after a document load.
///
/// Query counts restart at every load, since the engine builds a new manager
/// for each document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityScript {
    /// Query number (1-based) at which the manager appears; `None` = never.
    manager_after: Option<u32>,
    /// Query number at which the setter attaches; `None` = with the manager.
    setter_after: Option<u32>,
    has_setter: bool,
    failing_calls: u32,
}

impl CapabilityScript {
    /// Manager and setter are usable on the first query.
    #[must_use]
    pub fn ready() -> Self {
        Self {
            manager_after: Some(1),
            setter_after: None,
            has_setter: true,
            failing_calls: 0,
        }
    }

    /// The manager never appears.
    #[must_use]
    pub fn never() -> Self {
        Self {
            manager_after: None,
            ..Self::ready()
        }
    }

    /// The manager appears on query `n`.
    #[must_use]
    pub fn after_queries(n: u32) -> Self {
        Self {
            manager_after: Some(n.max(1)),
            ..Self::ready()
        }
    }

    /// The manager never gets a setter.
    #[must_use]
    pub fn without_setter(mut self) -> Self {
        self.has_setter = false;
        self
    }

    /// The setter attaches on query `n`.
    #[must_use]
    pub fn setter_after_queries(mut self, n: u32) -> Self {
        self.setter_after = Some(n);
        self
    }

    /// The first `n` setter calls raise an error.
    #[must_use]
    pub fn failing_calls(mut self, n: u32) -> Self {
        self.failing_calls = n;
        self
    }
}

impl Default for CapabilityScript {
    fn default() -> Self {
        Self::ready()
    }
}

/// Scripted behaviour of a simulated engine.
#[derive(Debug, Clone, Default)]
pub struct EngineScript {
    bootstrap_failure: Option<String>,
    bootstrap_latency: Duration,
    load_latency: Duration,
    rejected_files: Vec<String>,
    broken_files: Vec<String>,
    reported_names: HashMap<String, String>,
    known_panels: Option<Vec<String>>,
    capability: CapabilityScript,
    defer_events: bool,
    emit_annotations: bool,
}

impl EngineScript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bootstrap fails with `cause`.
    #[must_use]
    pub fn failing_bootstrap(mut self, cause: impl Into<String>) -> Self {
        self.bootstrap_failure = Some(cause.into());
        self
    }

    #[must_use]
    pub fn with_bootstrap_latency(mut self, latency: Duration) -> Self {
        self.bootstrap_latency = latency;
        self
    }

    #[must_use]
    pub fn with_load_latency(mut self, latency: Duration) -> Self {
        self.load_latency = latency;
        self
    }

    /// The load call for `filename` is rejected.
    #[must_use]
    pub fn rejecting(mut self, filename: impl Into<String>) -> Self {
        self.rejected_files.push(filename.into());
        self
    }

    /// The load call for `filename` resolves but a failure event follows.
    #[must_use]
    pub fn breaking(mut self, filename: impl Into<String>) -> Self {
        self.broken_files.push(filename.into());
        self
    }

    /// The engine reports `reported` as the name of a loaded `requested` file.
    #[must_use]
    pub fn reporting_name(mut self, requested: impl Into<String>, reported: impl Into<String>) -> Self {
        self.reported_names.insert(requested.into(), reported.into());
        self
    }

    /// Only these panels exist; opening another one fails.
    #[must_use]
    pub fn with_known_panels(mut self, panels: Vec<String>) -> Self {
        self.known_panels = Some(panels);
        self
    }

    #[must_use]
    pub fn with_capability(mut self, capability: CapabilityScript) -> Self {
        self.capability = capability;
        self
    }

    /// Events are held until [`SimulatedHandle::release_events`].
    #[must_use]
    pub fn deferring_events(mut self) -> Self {
        self.defer_events = true;
        self
    }

    /// An annotations event follows every successful load.
    #[must_use]
    pub fn with_annotations(mut self) -> Self {
        self.emit_annotations = true;
        self
    }
}

// =============================================================================
// Edit-mode manager
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct SimulatedManager {
    setter_attached: bool,
    failures_left: u32,
    calls: u32,
    mode: EditMode,
}

impl EditModeManager for SimulatedManager {
    fn has_set_edit_mode(&self) -> bool {
        self.setter_attached
    }

    fn set_edit_mode(&mut self, mode: EditMode) -> Result<(), EngineError> {
        self.calls += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(EngineError::Capability(
                "spreadsheet editor still initializing".to_string(),
            ));
        }
        self.mode = mode;
        Ok(())
    }
}

// =============================================================================
// Handle
// =============================================================================

/// A running simulated engine.
#[derive(Debug)]
pub struct SimulatedHandle {
    script: EngineScript,
    options: Option<EngineOptions>,
    queries: u32,
    manager: SimulatedManager,
    set_edit_mode_calls: u32,
    events: Option<mpsc::UnboundedSender<EngineEvent>>,
    held_events: Vec<EngineEvent>,
    loads: Vec<LoadRequest>,
    opened_panels: Vec<String>,
    disposed: bool,
}

impl SimulatedHandle {
    fn new(script: EngineScript, options: Option<EngineOptions>) -> Self {
        let manager = SimulatedManager {
            failures_left: script.capability.failing_calls,
            ..SimulatedManager::default()
        };
        Self {
            script,
            options,
            queries: 0,
            manager,
            set_edit_mode_calls: 0,
            events: None,
            held_events: Vec::new(),
            loads: Vec::new(),
            opened_panels: Vec::new(),
            disposed: false,
        }
    }

    /// A handle with a loaded document and the given capability, without bootstrap.
    #[must_use]
    pub fn detached(capability: CapabilityScript) -> Self {
        Self::new(EngineScript::new().with_capability(capability), None)
    }

    /// Options the engine was bootstrapped with.
    #[must_use]
    pub fn options(&self) -> Option<&EngineOptions> {
        self.options.as_ref()
    }

    /// Every load request received, oldest first.
    #[must_use]
    pub fn loads(&self) -> &[LoadRequest] {
        &self.loads
    }

    #[must_use]
    pub fn opened_panels(&self) -> &[String] {
        &self.opened_panels
    }

    /// Setter invocations across all documents.
    #[must_use]
    pub fn set_edit_mode_calls(&self) -> u32 {
        self.set_edit_mode_calls + self.manager.calls
    }

    /// Edit mode of the current document.
    #[must_use]
    pub fn edit_mode(&self) -> EditMode {
        self.manager.mode
    }

    /// Capability queries since the last load.
    #[must_use]
    pub fn capability_queries(&self) -> u32 {
        self.queries
    }

    #[must_use]
    pub fn held_events(&self) -> usize {
        self.held_events.len()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Delivers held events in their original order. Returns how many were sent.
    pub fn release_events(&mut self) -> usize {
        let held = std::mem::take(&mut self.held_events);
        let count = held.len();
        for event in held {
            self.send(event);
        }
        count
    }

    /// Delivers held events newest first. Returns how many were sent.
    pub fn release_events_reversed(&mut self) -> usize {
        let mut held = std::mem::take(&mut self.held_events);
        held.reverse();
        let count = held.len();
        for event in held {
            self.send(event);
        }
        count
    }

    fn send(&self, event: EngineEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver means the session is gone.
            let _ = tx.send(event);
        }
    }

    fn emit(&mut self, event: EngineEvent) {
        if self.script.defer_events {
            self.held_events.push(event);
        } else {
            self.send(event);
        }
    }

    fn reset_capability(&mut self) {
        self.queries = 0;
        self.set_edit_mode_calls += self.manager.calls;
        self.manager = SimulatedManager {
            failures_left: self.script.capability.failing_calls,
            ..SimulatedManager::default()
        };
    }
}

impl EngineHandle for SimulatedHandle {
    async fn load_document(&mut self, request: LoadRequest) -> Result<(), EngineError> {
        if self.disposed {
            return Err(EngineError::Disposed);
        }
        if !self.script.load_latency.is_zero() {
            tokio::time::sleep(self.script.load_latency).await;
        }
        self.loads.push(request.clone());

        if self.script.rejected_files.contains(&request.filename) {
            return Err(EngineError::Load(format!(
                "unsupported document {}",
                request.filename
            )));
        }

        self.reset_capability();

        if self.script.broken_files.contains(&request.filename) {
            self.emit(EngineEvent::DocumentLoadFailed {
                generation: request.generation,
                cause: "document is corrupted".to_string(),
            });
            return Ok(());
        }

        let filename = self
            .script
            .reported_names
            .get(&request.filename)
            .cloned()
            .unwrap_or_else(|| request.filename.clone());
        self.emit(EngineEvent::DocumentLoaded {
            generation: request.generation,
            filename,
        });
        if self.script.emit_annotations {
            self.emit(EngineEvent::AnnotationsLoaded {
                generation: request.generation,
            });
        }
        Ok(())
    }

    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<EngineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    fn edit_mode_manager(&mut self) -> Option<&mut dyn EditModeManager> {
        self.queries += 1;
        let capability = &self.script.capability;
        let appears = capability.manager_after.is_some_and(|n| self.queries >= n);
        if !appears {
            return None;
        }
        self.manager.setter_attached = capability.has_setter
            && capability.setter_after.map_or(true, |n| self.queries >= n);
        Some(&mut self.manager)
    }

    fn open_elements(&mut self, names: &[String]) -> Result<(), EngineError> {
        if let Some(known) = &self.script.known_panels {
            if let Some(unknown) = names.iter().find(|name| !known.contains(name)) {
                return Err(EngineError::Ui(format!("unknown panel {unknown}")));
            }
        }
        self.opened_panels.extend(names.iter().cloned());
        Ok(())
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.events = None;
        self.held_events.clear();
    }
}

// =============================================================================
// Bootstrap
// =============================================================================

/// Simulated engine entry point.
#[derive(Debug, Clone, Default)]
pub struct SimulatedEngine {
    script: EngineScript,
    boots: u32,
}

impl SimulatedEngine {
    #[must_use]
    pub fn new(script: EngineScript) -> Self {
        Self { script, boots: 0 }
    }

    /// Number of bootstrap calls received.
    #[must_use]
    pub fn boots(&self) -> u32 {
        self.boots
    }
}

impl EngineBootstrap for SimulatedEngine {
    type Handle = SimulatedHandle;

    async fn bootstrap(&mut self, options: &EngineOptions) -> Result<SimulatedHandle, EngineError> {
        self.boots += 1;
        if !self.script.bootstrap_latency.is_zero() {
            tokio::time::sleep(self.script.bootstrap_latency).await;
        }
        if let Some(cause) = &self.script.bootstrap_failure {
            return Err(EngineError::Bootstrap(cause.clone()));
        }
        Ok(SimulatedHandle::new(self.script.clone(), Some(options.clone())))
    }
}

/// Options used by tests and the demo binary.
#[must_use]
pub fn demo_options() -> EngineOptions {
    EngineOptions {
        asset_path: crate::config::DEFAULT_ENGINE_ASSET_PATH.to_string(),
        license_key: None,
        initial_mode: ViewerMode::SpreadsheetEditor,
        surface: SurfaceHandle::new("viewer"),
    }
}
