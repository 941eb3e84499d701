// SPDX-License-Identifier: MPL-2.0
use std::time::Duration;
use tempfile::tempdir;
use tokio::sync::mpsc;
use viewer_session::application::port::{DocumentPayload, SurfaceHandle};
use viewer_session::config::Config;
use viewer_session::diagnostics::{Severity, Stage};
use viewer_session::domain::activation::EditMode;
use viewer_session::domain::session::SessionState;
use viewer_session::infrastructure::{CapabilityScript, EngineScript, SimulatedEngine};
use viewer_session::session::{LocalFile, SessionCommand, ViewerSession};

fn session(script: EngineScript) -> ViewerSession<SimulatedEngine> {
    ViewerSession::from_config(
        SimulatedEngine::new(script),
        &Config::default(),
        SurfaceHandle::new("viewer"),
    )
}

#[tokio::test(start_paused = true)]
async fn startup_activates_editor_for_default_sample() {
    let script = EngineScript::new()
        .with_bootstrap_latency(Duration::from_millis(250))
        .with_capability(CapabilityScript::after_queries(3));
    let mut session = session(script);

    session.start().await.expect("engine starts");
    session.settle().await;

    assert_eq!(session.state(), SessionState::EditorReady);
    let document = session.document().expect("default sample displayed");
    assert_eq!(document.filename, "annual_financial_report.xlsx");

    let engine = session.engine().expect("engine running");
    assert_eq!(engine.edit_mode(), EditMode::Editing);
    assert_eq!(
        engine.options().map(|options| options.surface.id()),
        Some("viewer")
    );

    let ready = session
        .journal()
        .entries_for(Stage::Activation)
        .last()
        .expect("activation journaled");
    assert_eq!(ready.severity, Severity::Info);
    assert_eq!(ready.attempt, Some(3));
}

#[tokio::test(start_paused = true)]
async fn local_file_replaces_spreadsheet_being_activated() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("minutes.pdf");
    std::fs::write(&path, b"%PDF-1.7").expect("Failed to write document");

    let script = EngineScript::new().with_capability(CapabilityScript::never());
    let mut session = session(script);
    session.start().await.expect("engine starts");
    session.drain_events();
    assert_eq!(session.state(), SessionState::EditorActivating);

    let file = LocalFile::read(&path).expect("Failed to read document");
    session.on_file_selected(file).await.expect("load accepted");
    session.settle().await;

    assert_eq!(session.state(), SessionState::DocumentLoaded);
    let engine = session.engine().expect("engine running");
    let last = engine.loads().last().expect("load recorded");
    assert_eq!(last.filename, "minutes.pdf");
    assert_eq!(last.payload, DocumentPayload::Bytes(b"%PDF-1.7".to_vec().into()));
    assert_eq!(engine.set_edit_mode_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn gallery_selection_after_unavailable_editor() {
    let script = EngineScript::new().with_capability(CapabilityScript::ready().without_setter());
    let mut session = session(script);
    session.start().await.expect("engine starts");
    session.settle().await;
    assert_eq!(session.state(), SessionState::EditorUnavailable);

    let entry = session.catalog().gallery()[1].clone();
    session
        .on_gallery_selection(entry)
        .await
        .expect("load accepted");
    session.settle().await;

    assert_eq!(session.state(), SessionState::DocumentLoaded);
    assert_eq!(
        session.document().map(|doc| doc.filename.as_str()),
        Some("project_plan.docx")
    );
}

#[tokio::test(start_paused = true)]
async fn run_loop_supersedes_loads_and_exports_journal() {
    let script = EngineScript::new()
        .with_load_latency(Duration::from_millis(50))
        .with_capability(CapabilityScript::after_queries(2));
    let mut session = session(script);
    session.start().await.expect("engine starts");

    let samples = session.catalog().samples().to_vec();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let driver = async move {
        tx.send(SessionCommand::SampleSelected(samples[3].clone()))
            .expect("send");
        tx.send(SessionCommand::SampleSelected(samples[2].clone()))
            .expect("send");
        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.send(SessionCommand::Shutdown).expect("send");
    };
    tokio::join!(session.run(&mut rx), driver);

    assert_eq!(session.state(), SessionState::Uninitialized);

    let json = session.journal().export_json().expect("journal exports");
    let entries: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    let entries = entries.as_array().expect("array of entries");
    assert!(entries
        .iter()
        .any(|entry| entry["stage"] == "teardown"));
    assert!(entries.iter().any(|entry| {
        entry["stage"] == "activation"
            && entry["message"]
                .as_str()
                .is_some_and(|message| message.starts_with("spreadsheet editor ready"))
    }));
}
