use crate::{AppState, CompileOutcome, CompileFailure, Effect, ErrorKind, Msg, SessionStatus};

/// Pure update function: applies a message to state and returns any effects.
///
/// Every (status, message) pair is handled by exactly one arm below. Results
/// tagged with an attempt other than the current one are dropped.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let status = state.status();
    let current = state.attempt();

    let effects = match (status, msg) {
        // Input is frozen while a request is in flight.
        (
            SessionStatus::Running,
            Msg::ArchiveSelected(_) | Msg::EngineChanged(_) | Msg::SubmitClicked,
        ) => Vec::new(),

        (_, Msg::ArchiveSelected(archive)) => {
            state.select_archive(archive);
            Vec::new()
        }
        (_, Msg::EngineChanged(engine)) => {
            state.set_engine(engine);
            Vec::new()
        }
        (_, Msg::SubmitClicked) => match state.begin_attempt() {
            Some((attempt, archive, engine)) => vec![
                Effect::ProbeQueue { attempt },
                Effect::SubmitCompile {
                    attempt,
                    archive,
                    engine,
                },
            ],
            None => {
                state.reject_missing_archive();
                Vec::new()
            }
        },

        (SessionStatus::Running, Msg::QueueProbed { attempt, running_jobs })
            if attempt == current =>
        {
            state.apply_queue(running_jobs);
            Vec::new()
        }
        (SessionStatus::Running, Msg::CompileFinished { attempt, outcome })
            if attempt == current =>
        {
            match outcome {
                CompileOutcome::Artifact(pdf) => {
                    let archive_name = state
                        .archive()
                        .map(|archive| archive.name().to_string())
                        .unwrap_or_default();
                    state.succeed();
                    vec![Effect::SaveArtifact {
                        attempt,
                        archive_name,
                        pdf,
                    }]
                }
                CompileOutcome::Failed(failure) => {
                    state.fail(failure);
                    Vec::new()
                }
            }
        }

        (SessionStatus::Success, Msg::ArtifactSaved { attempt, path }) if attempt == current => {
            state.record_saved(path);
            Vec::new()
        }
        (SessionStatus::Success, Msg::ArtifactSaveFailed { attempt, message })
            if attempt == current =>
        {
            state.fail(CompileFailure::new(ErrorKind::Download, message));
            Vec::new()
        }

        (_, Msg::SuccessDismissed) => {
            state.dismiss_success();
            Vec::new()
        }

        // Stale or out-of-state results.
        (
            _,
            Msg::QueueProbed { .. }
            | Msg::CompileFinished { .. }
            | Msg::ArtifactSaved { .. }
            | Msg::ArtifactSaveFailed { .. },
        ) => Vec::new(),

        (_, Msg::NoOp) => Vec::new(),
    };

    (state, effects)
}
