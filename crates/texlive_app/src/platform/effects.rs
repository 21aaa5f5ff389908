use texlive_client::{
    Artifact, ArtifactDownloader, CompileError, CompileRequest, EngineEvent, EngineHandle,
    FailureKind, TexEngine,
};
use texlive_core::{
    AttemptId, CompileFailure, CompileOutcome, Effect, EngineChoice, ErrorKind, Msg,
};
use texlive_logging::{texlive_error, texlive_info, texlive_warn};

/// Executes effects in the order `update` emitted them.
///
/// Service calls go to the engine worker and come back through `next_msg`;
/// saves run inline and their result messages are returned directly.
pub struct EffectRunner {
    engine: EngineHandle,
    downloader: ArtifactDownloader,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, downloader: ArtifactDownloader) -> Self {
        Self { engine, downloader }
    }

    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::ProbeQueue { attempt } => {
                    self.engine.probe_queue(attempt);
                }
                Effect::SubmitCompile {
                    attempt,
                    archive,
                    engine,
                } => {
                    texlive_info!(
                        "SubmitCompile attempt={} archive={} bytes={}",
                        attempt,
                        archive.name(),
                        archive.len()
                    );
                    self.engine.compile(
                        attempt,
                        CompileRequest {
                            archive_name: archive.name().to_string(),
                            archive: archive.content().to_vec(),
                            engine: engine.map(map_engine),
                        },
                    );
                }
                Effect::SaveArtifact {
                    attempt,
                    archive_name,
                    pdf,
                } => match self.downloader.download(&pdf, &archive_name) {
                    Ok(path) => follow_up.push(Msg::ArtifactSaved { attempt, path }),
                    Err(err) => {
                        texlive_warn!("Saving artifact for attempt {} failed: {}", attempt, err);
                        follow_up.push(Msg::ArtifactSaveFailed {
                            attempt,
                            message: format!(
                                "could not save the PDF to {}: {}",
                                self.downloader.dir().display(),
                                err
                            ),
                        });
                    }
                },
            }
        }
        follow_up
    }

    /// Blocks for the next engine result. If the worker is gone the attempt
    /// still settles, as a network failure.
    pub fn next_msg(&self, attempt: AttemptId) -> Msg {
        match self.engine.recv() {
            Some(EngineEvent::QueueProbed { attempt, snapshot }) => Msg::QueueProbed {
                attempt,
                running_jobs: snapshot.map(|snapshot| snapshot.running_jobs),
            },
            Some(EngineEvent::CompileCompleted { attempt, result }) => Msg::CompileFinished {
                attempt,
                outcome: map_result(result),
            },
            None => {
                texlive_error!("Engine worker stopped while attempt {} was running", attempt);
                Msg::CompileFinished {
                    attempt,
                    outcome: CompileOutcome::Failed(CompileFailure::new(
                        ErrorKind::Network,
                        "the compile worker stopped before the request finished",
                    )),
                }
            }
        }
    }
}

fn map_result(result: Result<Artifact, CompileError>) -> CompileOutcome {
    match result {
        Ok(artifact) => CompileOutcome::Artifact(artifact.pdf),
        Err(err) => {
            texlive_warn!("Compile failed: {}", err);
            CompileOutcome::Failed(CompileFailure::new(map_failure(&err.kind), err.to_string()))
        }
    }
}

fn map_failure(kind: &FailureKind) -> ErrorKind {
    if kind.is_transport() {
        return ErrorKind::Network;
    }
    match kind {
        FailureKind::Protocol { .. } => ErrorKind::Protocol,
        _ => ErrorKind::Service,
    }
}

fn map_engine(engine: EngineChoice) -> TexEngine {
    match engine {
        EngineChoice::XeLatex => TexEngine::XeLatex,
        EngineChoice::PdfLatex => TexEngine::PdfLatex,
    }
}
