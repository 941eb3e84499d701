// SPDX-License-Identifier: MPL-2.0
//! Viewer session orchestrator.
//!
//! A [`ViewerSession`] owns one engine instance bound to one viewer surface.
//! It boots the engine, opens auxiliary panels, loads documents, and once a
//! spreadsheet is displayed drives the [`activation`] sequencer until the
//! editor accepts edit mode or the deadline passes.
//!
//! # Generations
//!
//! Every load bumps a [`LoadGeneration`]. The engine echoes it on the events
//! it emits for that load, and events carrying any other generation are
//! discarded. A new load also drops the activation run of the previous one,
//! so a slow document can never switch a newer document into edit mode.
//!
//! # Driving the session
//!
//! Hosts either call the operations directly and pump events with
//! [`ViewerSession::drain_events`] / [`ViewerSession::settle`], or hand a
//! command channel to [`ViewerSession::run`], which multiplexes commands,
//! engine events and activation timers on the current task.

pub mod activation;
mod command;
mod source;

pub use activation::{
    activate, try_enable_editing, Activated, ActivationRun, AttemptFailure, BackoffPolicy,
    RunStep, Unavailable,
};
pub use command::SessionCommand;
pub use source::{DocumentSource, LocalFile, SourceOrigin};

use std::future;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::application::port::{
    EngineBootstrap, EngineEvent, EngineHandle, EngineOptions, LoadRequest, SurfaceHandle,
};
use crate::application::query::SampleCatalog;
use crate::config::{self, Config};
use crate::diagnostics::{JournalCapacity, JournalEntry, SessionJournal, Stage};
use crate::document;
use crate::domain::document::{DocumentKind, FileMetadata};
use crate::domain::session::{LoadGeneration, SessionState};
use crate::error::SessionError;

// =============================================================================
// Options
// =============================================================================

/// Everything a session needs besides the engine and the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub engine: EngineOptions,
    /// Panels opened once when the engine becomes ready.
    pub auxiliary_panels: Vec<String>,
    /// Load the catalog's default selection right after the engine is ready.
    pub auto_load_default: bool,
    pub policy: BackoffPolicy,
    pub journal_capacity: JournalCapacity,
}

impl SessionOptions {
    /// Options with default session behaviour around the given engine options.
    #[must_use]
    pub fn new(engine: EngineOptions) -> Self {
        Self {
            engine,
            auxiliary_panels: vec![config::DEFAULT_AUXILIARY_PANEL.to_string()],
            auto_load_default: config::DEFAULT_AUTO_LOAD_DEFAULT,
            policy: BackoffPolicy::default(),
            journal_capacity: JournalCapacity::default(),
        }
    }

    /// Builds options from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config, surface: SurfaceHandle) -> Self {
        let engine = EngineOptions {
            asset_path: config
                .engine
                .asset_path
                .clone()
                .unwrap_or_else(|| config::DEFAULT_ENGINE_ASSET_PATH.to_string()),
            license_key: config.engine.license_key.clone(),
            initial_mode: config.engine.initial_mode.unwrap_or_default().into(),
            surface,
        };
        Self {
            engine,
            auxiliary_panels: config
                .engine
                .auxiliary_panels
                .clone()
                .unwrap_or_else(|| vec![config::DEFAULT_AUXILIARY_PANEL.to_string()]),
            auto_load_default: config
                .session
                .auto_load_default
                .unwrap_or(config::DEFAULT_AUTO_LOAD_DEFAULT),
            policy: BackoffPolicy::from_config(&config.activation),
            journal_capacity: JournalCapacity::new(
                config
                    .diagnostics
                    .journal_capacity
                    .unwrap_or(config::DEFAULT_JOURNAL_CAPACITY),
            ),
        }
    }
}

// =============================================================================
// Session bookkeeping types
// =============================================================================

/// The document currently displayed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub generation: LoadGeneration,
    /// Name reported by the engine.
    pub filename: String,
    pub kind: DocumentKind,
}

/// Spreadsheet editor introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadsheetInfo {
    /// The engine exposes its edit-mode manager.
    pub is_initialized: bool,
    /// The manager's setter is attached.
    pub has_set_edit_mode: bool,
}

/// What [`ViewerSession::handle_event`] did with an engine event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event belonged to the current load and changed the session.
    Applied,
    /// The event belonged to a superseded load and was dropped.
    Stale,
    /// The event was current but nothing was waiting for it.
    Ignored,
}

#[derive(Debug, Clone)]
struct PendingLoad {
    generation: LoadGeneration,
    filename: String,
    /// State to restore if the load fails.
    prior: SessionState,
}

// =============================================================================
// ViewerSession
// =============================================================================

/// Owned session state for one viewer surface.
pub struct ViewerSession<B: EngineBootstrap> {
    bootstrap: B,
    options: SessionOptions,
    catalog: SampleCatalog,
    handle: Option<B::Handle>,
    events: Option<mpsc::UnboundedReceiver<EngineEvent>>,
    state: SessionState,
    generation: LoadGeneration,
    /// Highest generation handed to the engine, rejected loads included.
    issued: LoadGeneration,
    pending: Option<PendingLoad>,
    document: Option<LoadedDocument>,
    activation: Option<ActivationRun>,
    panels_opened: bool,
    journal: SessionJournal,
}

impl<B: EngineBootstrap> ViewerSession<B> {
    #[must_use]
    pub fn new(bootstrap: B, options: SessionOptions, catalog: SampleCatalog) -> Self {
        let journal = SessionJournal::new(options.journal_capacity);
        Self {
            bootstrap,
            options,
            catalog,
            handle: None,
            events: None,
            state: SessionState::Uninitialized,
            generation: LoadGeneration::default(),
            issued: LoadGeneration::default(),
            pending: None,
            document: None,
            activation: None,
            panels_opened: false,
            journal,
        }
    }

    /// Creates a session from the loaded configuration and its catalog.
    #[must_use]
    pub fn from_config(bootstrap: B, config: &Config, surface: SurfaceHandle) -> Self {
        Self::new(
            bootstrap,
            SessionOptions::from_config(config, surface),
            config.catalog(),
        )
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Generation of the load the session currently tracks.
    ///
    /// A load the engine rejects does not replace it.
    #[must_use]
    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }

    #[must_use]
    pub fn journal(&self) -> &SessionJournal {
        &self.journal
    }

    #[must_use]
    pub fn catalog(&self) -> &SampleCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    #[must_use]
    pub fn bootstrap(&self) -> &B {
        &self.bootstrap
    }

    /// The running engine, if any.
    #[must_use]
    pub fn engine(&self) -> Option<&B::Handle> {
        self.handle.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut B::Handle> {
        self.handle.as_mut()
    }

    #[must_use]
    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Boots the engine, opens auxiliary panels and loads the default sample.
    ///
    /// A failing default load is journaled and leaves the session in
    /// `EngineReady`; it does not fail `start`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidState`] unless the session is
    /// `Uninitialized`, and [`SessionError::EngineBootstrap`] if the engine
    /// fails to start. The session is then `Failed` and is not retried.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Uninitialized {
            return Err(SessionError::InvalidState {
                operation: "start",
                state: self.state,
            });
        }

        self.state = SessionState::EngineStarting;
        self.journal.record(JournalEntry::info(
            Stage::Bootstrap,
            format!("starting viewer engine from {}", self.options.engine.asset_path),
        ));

        let mut handle = match self.bootstrap.bootstrap(&self.options.engine).await {
            Ok(handle) => handle,
            Err(cause) => {
                self.state = SessionState::Failed;
                self.journal.record(
                    JournalEntry::error(Stage::Bootstrap, "viewer engine failed to start")
                        .with_cause(&cause),
                );
                return Err(SessionError::EngineBootstrap(cause));
            }
        };

        self.events = Some(handle.subscribe());
        self.handle = Some(handle);
        self.state = SessionState::EngineReady;
        self.journal
            .record(JournalEntry::info(Stage::Bootstrap, "viewer engine ready"));

        self.open_panels();

        if self.options.auto_load_default {
            if let Some(default) = self.catalog.default_selection() {
                let source = DocumentSource::from_metadata(default, SourceOrigin::Sample);
                // Failures are journaled by load_document.
                let _ = self.load_document(source).await;
            }
        }
        Ok(())
    }

    fn open_panels(&mut self) {
        if self.panels_opened || self.options.auxiliary_panels.is_empty() {
            return;
        }
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        self.panels_opened = true;

        let panels = self.options.auxiliary_panels.join(", ");
        match handle.open_elements(&self.options.auxiliary_panels) {
            Ok(()) => self
                .journal
                .record(JournalEntry::debug(Stage::Panels, format!("opened {panels}"))),
            Err(cause) => self.journal.record(
                JournalEntry::warning(Stage::Panels, format!("could not open {panels}"))
                    .with_cause(cause),
            ),
        }
    }

    /// Disposes the engine and returns to `Uninitialized`.
    ///
    /// The generation counter is kept, so events from the disposed engine
    /// that are still in flight stay stale.
    pub fn teardown(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.dispose();
        }
        self.events = None;
        self.pending = None;
        self.document = None;
        self.activation = None;
        self.panels_opened = false;
        self.state = SessionState::Uninitialized;
        self.journal
            .record(JournalEntry::info(Stage::Teardown, "viewer engine disposed"));
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Asks the engine to display `source`.
    ///
    /// Allowed in every state where the engine is up. Supersedes any load or
    /// activation still in progress. Completion arrives later as an engine
    /// event; the returned generation identifies it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EngineNotReady`] before the engine is up, and
    /// [`SessionError::DocumentLoad`] if the engine rejects the request. On
    /// rejection the session returns to the state it had before the call,
    /// including any load or activation the call would have superseded.
    pub async fn load_document(
        &mut self,
        source: DocumentSource,
    ) -> Result<LoadGeneration, SessionError> {
        let state = self.state;
        let Some(handle) = self.handle.as_mut().filter(|_| state.is_engine_up()) else {
            self.journal.record(
                JournalEntry::warning(Stage::Load, "load requested before engine is ready")
                    .with_cause(format!("session is {state}")),
            );
            return Err(SessionError::EngineNotReady { state });
        };

        // Held until the engine accepts the new load, restored on rejection.
        let previous_generation = self.generation;
        let interrupted_run = self.activation.take();
        let superseded = self.pending.take();

        let prior = match state {
            SessionState::DocumentLoading => superseded
                .as_ref()
                .map_or(SessionState::EngineReady, |pending| pending.prior),
            SessionState::EditorActivating => SessionState::DocumentLoaded,
            other => other,
        };

        let generation = self.issued.next();
        self.issued = generation;
        self.generation = generation;

        let classification = document::classify(&source.filename);
        let mut request = LoadRequest::new(generation, source.payload, source.filename.clone());
        if let Some(mime_type) = classification.mime_type {
            request = request.with_format_hint(classification.extension.clone(), mime_type);
        }

        self.pending = Some(PendingLoad {
            generation,
            filename: source.filename.clone(),
            prior,
        });
        self.state = SessionState::DocumentLoading;
        self.journal.record(
            JournalEntry::info(
                Stage::Load,
                format!(
                    "loading {} from {} ({})",
                    source.filename,
                    source.origin.as_str(),
                    request.payload.describe()
                ),
            )
            .with_generation(generation),
        );

        match handle.load_document(request).await {
            Ok(()) => {
                if interrupted_run.is_some() {
                    self.journal.record(
                        JournalEntry::debug(Stage::Activation, "activation cancelled by new load")
                            .with_generation(previous_generation),
                    );
                }
                Ok(generation)
            }
            Err(cause) => {
                self.generation = previous_generation;
                self.pending = superseded;
                self.activation = interrupted_run;
                self.state = state;
                self.journal.record(
                    JournalEntry::error(Stage::Load, format!("could not load {}", source.filename))
                        .with_generation(generation)
                        .with_cause(&cause),
                );
                Err(SessionError::DocumentLoad {
                    filename: source.filename,
                    cause,
                })
            }
        }
    }

    /// A file picked from disk.
    ///
    /// # Errors
    ///
    /// See [`load_document`](Self::load_document).
    pub async fn on_file_selected(&mut self, file: LocalFile) -> Result<LoadGeneration, SessionError> {
        self.load_document(DocumentSource::from_local(file)).await
    }

    /// A gallery entry.
    ///
    /// # Errors
    ///
    /// See [`load_document`](Self::load_document).
    pub async fn on_gallery_selection(
        &mut self,
        meta: FileMetadata,
    ) -> Result<LoadGeneration, SessionError> {
        self.load_document(DocumentSource::from_metadata(&meta, SourceOrigin::Gallery))
            .await
    }

    /// A sample from the catalog.
    ///
    /// # Errors
    ///
    /// See [`load_document`](Self::load_document).
    pub async fn on_sample_selected(
        &mut self,
        meta: FileMetadata,
    ) -> Result<LoadGeneration, SessionError> {
        self.load_document(DocumentSource::from_metadata(&meta, SourceOrigin::Sample))
            .await
    }

    // -------------------------------------------------------------------------
    // Engine events
    // -------------------------------------------------------------------------

    /// Applies one engine event.
    pub fn handle_event(&mut self, event: EngineEvent) -> EventOutcome {
        let generation = event.generation();
        if generation != self.generation {
            self.journal.record(
                JournalEntry::debug(Stage::DocumentEvent, "discarding stale engine event")
                    .with_generation(generation),
            );
            return EventOutcome::Stale;
        }

        match event {
            EngineEvent::DocumentLoaded { filename, .. } => {
                let Some(pending) = self.take_pending(generation) else {
                    return EventOutcome::Ignored;
                };

                let kind = document::classify(&filename).kind;
                self.journal.record(
                    JournalEntry::info(
                        Stage::DocumentEvent,
                        format!("document loaded: {filename} (requested {})", pending.filename),
                    )
                    .with_generation(generation),
                );
                self.document = Some(LoadedDocument {
                    generation,
                    filename,
                    kind,
                });
                self.state = SessionState::DocumentLoaded;

                self.resume_activation();
                EventOutcome::Applied
            }
            EngineEvent::DocumentLoadFailed { cause, .. } => {
                let Some(pending) = self.take_pending(generation) else {
                    return EventOutcome::Ignored;
                };
                self.state = pending.prior;
                self.journal.record(
                    JournalEntry::error(Stage::DocumentEvent, format!("could not load {}", pending.filename))
                        .with_generation(generation)
                        .with_cause(cause),
                );
                self.resume_activation();
                EventOutcome::Applied
            }
            EngineEvent::AnnotationsLoaded { .. } => {
                self.journal.record(
                    JournalEntry::debug(Stage::DocumentEvent, "annotations loaded")
                        .with_generation(generation),
                );
                EventOutcome::Applied
            }
        }
    }

    /// Starts an activation run if a displayed spreadsheet is still read-only
    /// without one.
    fn resume_activation(&mut self) {
        let displays_spreadsheet = self
            .document
            .as_ref()
            .is_some_and(|document| document.kind.is_spreadsheet());
        if self.state != SessionState::DocumentLoaded || !displays_spreadsheet {
            return;
        }
        self.state = SessionState::EditorActivating;
        self.activation = Some(ActivationRun::new(self.options.policy, Instant::now()));
        self.journal.record(
            JournalEntry::info(Stage::Activation, "activating spreadsheet editor")
                .with_generation(self.generation),
        );
    }

    fn take_pending(&mut self, generation: LoadGeneration) -> Option<PendingLoad> {
        match self.pending.take() {
            Some(pending) if pending.generation == generation => Some(pending),
            other => {
                self.pending = other;
                self.journal.record(
                    JournalEntry::debug(Stage::DocumentEvent, "no load waiting for engine event")
                        .with_generation(generation),
                );
                None
            }
        }
    }

    /// Applies every engine event already queued, without waiting.
    pub fn drain_events(&mut self) -> Vec<EventOutcome> {
        let mut received = Vec::new();
        if let Some(events) = self.events.as_mut() {
            while let Ok(event) = events.try_recv() {
                received.push(event);
            }
        }
        received
            .into_iter()
            .map(|event| self.handle_event(event))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    /// When the pending activation attempt is due, if one is running.
    #[must_use]
    pub fn next_activation_at(&self) -> Option<Instant> {
        self.activation.as_ref().map(ActivationRun::poll_at)
    }

    /// Makes the pending activation attempt if it is due.
    pub fn poll_activation(&mut self) -> Option<RunStep> {
        let now = Instant::now();
        let run = self.activation.as_mut().filter(|run| run.poll_at() <= now)?;
        let handle = self.handle.as_mut()?;
        let step = run.attempt(handle, now);

        match &step {
            RunStep::Activated(activated) => {
                self.activation = None;
                self.state = SessionState::EditorReady;
                self.journal.record(
                    JournalEntry::info(
                        Stage::Activation,
                        format!("spreadsheet editor ready after {} retries", activated.retries()),
                    )
                    .with_generation(self.generation)
                    .with_attempt(activated.attempt.attempt_number),
                );
            }
            RunStep::Retry { failure, cause, .. } => {
                self.journal.record(
                    JournalEntry::debug(Stage::Activation, "edit mode not ready, retrying")
                        .with_generation(self.generation)
                        .with_attempt(failure.attempt_number)
                        .with_cause(cause),
                );
            }
            RunStep::Exhausted(unavailable) => {
                self.activation = None;
                self.state = SessionState::EditorUnavailable;
                self.journal.record(
                    JournalEntry::warning(
                        Stage::Activation,
                        "spreadsheet editor unavailable, document stays read-only",
                    )
                    .with_generation(self.generation)
                    .with_attempt(unavailable.attempt.attempt_number)
                    .with_cause(&unavailable.last_cause),
                );
            }
        }
        Some(step)
    }

    /// Current edit-mode capability of the engine.
    ///
    /// Returns `None` without an engine or while the engine exposes no
    /// edit-mode manager.
    pub fn spreadsheet_info(&mut self) -> Option<SpreadsheetInfo> {
        let manager = self.handle.as_mut()?.edit_mode_manager()?;
        Some(SpreadsheetInfo {
            is_initialized: true,
            has_set_edit_mode: manager.has_set_edit_mode(),
        })
    }

    // -------------------------------------------------------------------------
    // Driving
    // -------------------------------------------------------------------------

    /// Processes queued events and activation attempts until nothing is due.
    ///
    /// Sleeps between activation attempts. Returns once no activation is
    /// running; a load whose events have not arrived yet is left pending.
    pub async fn settle(&mut self) {
        loop {
            self.drain_events();
            let Some(at) = self.next_activation_at() else {
                break;
            };
            tokio::time::sleep_until(at).await;
            self.poll_activation();
        }
    }

    /// Runs the session loop until [`SessionCommand::Shutdown`] or until the
    /// command channel closes, then tears the session down.
    pub async fn run(&mut self, commands: &mut mpsc::UnboundedReceiver<SessionCommand>) {
        loop {
            let wake_at = self.next_activation_at();
            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.apply(command).await,
                },
                event = next_event(&mut self.events) => match event {
                    Some(event) => {
                        self.handle_event(event);
                    }
                    None => self.events = None,
                },
                () = wait_until(wake_at) => {
                    self.poll_activation();
                }
            }
        }
        self.teardown();
    }

    async fn apply(&mut self, command: SessionCommand) {
        // Failures are journaled by load_document.
        let _ = match command {
            SessionCommand::FileSelected(file) => self.on_file_selected(file).await,
            SessionCommand::GallerySelected(meta) => self.on_gallery_selection(meta).await,
            SessionCommand::SampleSelected(meta) => self.on_sample_selected(meta).await,
            SessionCommand::Shutdown => return,
        };
    }
}

async fn next_event(
    events: &mut Option<mpsc::UnboundedReceiver<EngineEvent>>,
) -> Option<EngineEvent> {
    match events {
        Some(events) => events.recv().await,
        None => future::pending().await,
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => future::pending().await,
    }
}

impl<B: EngineBootstrap> std::fmt::Debug for ViewerSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerSession")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("document", &self.document)
            .field("activating", &self.activation.is_some())
            .finish_non_exhaustive()
    }
}
