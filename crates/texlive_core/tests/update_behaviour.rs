use std::sync::Once;

use texlive_core::{
    update, AppState, CompileFailure, CompileOutcome, Effect, EngineChoice, ErrorKind, Msg,
    SessionStatus, UploadedArchive,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(texlive_logging::initialize_for_tests);
}

fn archive(name: &str) -> UploadedArchive {
    UploadedArchive::new(name, b"PK\x03\x04 sources".to_vec())
}

fn select(state: AppState, name: &str) -> AppState {
    update(state, Msg::ArchiveSelected(archive(name))).0
}

fn fail(state: AppState, kind: ErrorKind, message: &str) -> AppState {
    let attempt = state.attempt();
    update(
        state,
        Msg::CompileFinished {
            attempt,
            outcome: CompileOutcome::Failed(CompileFailure::new(kind, message)),
        },
    )
    .0
}

#[test]
fn submit_without_archive_is_a_validation_error_without_effects() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(state.status(), SessionStatus::Error);
    assert_eq!(state.attempt(), 0);
    let error = state.view().error.expect("error panel");
    assert_eq!(error.kind, ErrorKind::Validation);
    assert!(error.text.contains("No archive selected"));
    assert!(state.consume_dirty());
}

#[test]
fn submit_probes_queue_then_submits_archive_with_engine() {
    init_logging();
    let state = select(AppState::new(), "thesis.zip");
    let (state, _) = update(state, Msg::EngineChanged(EngineChoice::PdfLatex));
    let (state, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(state.status(), SessionStatus::Running);
    assert_eq!(
        effects,
        vec![
            Effect::ProbeQueue { attempt: 1 },
            Effect::SubmitCompile {
                attempt: 1,
                archive: archive("thesis.zip"),
                engine: Some(EngineChoice::PdfLatex),
            },
        ]
    );
}

#[test]
fn engine_defaults_to_xelatex() {
    init_logging();
    let state = select(AppState::new(), "thesis.rar");
    let (_state, effects) = update(state, Msg::SubmitClicked);

    assert!(matches!(
        effects.last(),
        Some(Effect::SubmitCompile {
            engine: Some(EngineChoice::XeLatex),
            ..
        })
    ));
}

#[test]
fn disabled_engine_selection_sends_no_engine_and_ignores_changes() {
    init_logging();
    let state = select(AppState::with_engine_selection(false), "thesis.zip");
    let (mut state, _) = update(state, Msg::EngineChanged(EngineChoice::PdfLatex));
    assert!(state.consume_dirty());
    assert_eq!(state.view().engine, None);

    let (_state, effects) = update(state, Msg::SubmitClicked);
    assert!(matches!(
        effects.last(),
        Some(Effect::SubmitCompile { engine: None, .. })
    ));
}

#[test]
fn submit_while_running_is_ignored() {
    init_logging();
    let state = select(AppState::new(), "thesis.zip");
    let (mut state, _) = update(state, Msg::SubmitClicked);
    assert!(state.consume_dirty());

    let (mut next, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(next.attempt(), 1);
    assert_eq!(next.status(), SessionStatus::Running);
    assert!(!next.consume_dirty());
}

#[test]
fn selection_and_engine_are_frozen_while_running() {
    init_logging();
    let state = select(AppState::new(), "thesis.zip");
    let (state, _) = update(state, Msg::SubmitClicked);

    let (state, effects) = update(state, Msg::ArchiveSelected(archive("other.zip")));
    assert!(effects.is_empty());
    let (state, _) = update(state, Msg::EngineChanged(EngineChoice::PdfLatex));

    let view = state.view();
    assert_eq!(view.selected_file, "thesis.zip");
    assert_eq!(view.engine, Some(EngineChoice::XeLatex));
    assert!(!view.submit_enabled);
    assert!(!view.picker_enabled);
}

#[test]
fn artifact_ends_in_success_and_requests_one_save() {
    init_logging();
    let state = select(AppState::new(), "thesis.ZIP");
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, effects) = update(
        state,
        Msg::CompileFinished {
            attempt: 1,
            outcome: CompileOutcome::Artifact(b"%PDF-1.7".to_vec()),
        },
    );

    assert_eq!(state.status(), SessionStatus::Success);
    assert_eq!(
        effects,
        vec![Effect::SaveArtifact {
            attempt: 1,
            archive_name: "thesis.ZIP".to_string(),
            pdf: b"%PDF-1.7".to_vec(),
        }]
    );
    let view = state.view();
    assert!(view.success.is_some());
    assert!(view.error.is_none());
    assert!(view.submit_enabled);
}

#[test]
fn failure_populates_error_text() {
    init_logging();
    let state = select(AppState::new(), "thesis.zip");
    let (state, _) = update(state, Msg::SubmitClicked);
    let state = fail(state, ErrorKind::Service, "missing main.tex");

    assert_eq!(state.status(), SessionStatus::Error);
    let error = state.view().error.expect("error panel");
    assert_eq!(error.kind, ErrorKind::Service);
    assert!(error.text.contains("missing main.tex"));
}

#[test]
fn resubmit_from_error_is_allowed() {
    init_logging();
    let state = select(AppState::new(), "thesis.zip");
    let (state, _) = update(state, Msg::SubmitClicked);
    let state = fail(state, ErrorKind::Network, "connection refused");

    let (state, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(state.status(), SessionStatus::Running);
    assert_eq!(state.attempt(), 2);
    assert_eq!(effects.len(), 2);
    assert!(state.view().error.is_none());
}

#[test]
fn new_selection_after_error_resets_to_idle() {
    init_logging();
    let state = select(AppState::new(), "thesis.zip");
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::QueueProbed {
            attempt: 1,
            running_jobs: Some(2),
        },
    );
    let state = fail(state, ErrorKind::Protocol, "unexpected content type");

    let state = select(state, "fixed.zip");
    let view = state.view();

    assert_eq!(view.status, SessionStatus::Idle);
    assert_eq!(view.selected_file, "fixed.zip");
    assert!(view.error.is_none());
    assert!(view.queue_message.is_none());
}

#[test]
fn new_selection_after_success_resets_to_idle() {
    init_logging();
    let state = select(AppState::new(), "thesis.zip");
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::CompileFinished {
            attempt: 1,
            outcome: CompileOutcome::Artifact(b"%PDF".to_vec()),
        },
    );

    let state = select(state, "next.rar");
    let view = state.view();

    assert_eq!(view.status, SessionStatus::Idle);
    assert!(view.success.is_none());
    assert!(view.queue_message.is_none());
}

#[test]
fn save_failure_turns_success_into_download_error() {
    init_logging();
    let state = select(AppState::new(), "thesis.zip");
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::CompileFinished {
            attempt: 1,
            outcome: CompileOutcome::Artifact(b"%PDF".to_vec()),
        },
    );
    let (state, effects) = update(
        state,
        Msg::ArtifactSaveFailed {
            attempt: 1,
            message: "permission denied".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.status(), SessionStatus::Error);
    assert_eq!(state.view().error.unwrap().kind, ErrorKind::Download);
}

#[test]
fn dismissing_success_hides_acknowledgment_once() {
    init_logging();
    let state = select(AppState::new(), "thesis.zip");
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::CompileFinished {
            attempt: 1,
            outcome: CompileOutcome::Artifact(b"%PDF".to_vec()),
        },
    );
    let (mut state, _) = update(
        state,
        Msg::ArtifactSaved {
            attempt: 1,
            path: "out/thesis.pdf".into(),
        },
    );
    assert_eq!(
        state.view().success.unwrap().saved_path,
        Some("out/thesis.pdf".into())
    );
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::SuccessDismissed);
    assert!(state.view().success.is_none());
    assert_eq!(state.status(), SessionStatus::Success);
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::SuccessDismissed);
    assert!(!state.consume_dirty());
}
