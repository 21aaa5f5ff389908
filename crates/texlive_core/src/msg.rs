use std::path::PathBuf;

use crate::{AttemptId, CompileOutcome, EngineChoice, UploadedArchive};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a local archive.
    ArchiveSelected(UploadedArchive),
    /// User changed the typesetting engine.
    EngineChanged(EngineChoice),
    /// User clicked the compile button.
    SubmitClicked,
    /// Queue probe settled. `None` means no information was available.
    QueueProbed {
        attempt: AttemptId,
        running_jobs: Option<u64>,
    },
    /// Compile request settled and its response was classified.
    CompileFinished {
        attempt: AttemptId,
        outcome: CompileOutcome,
    },
    /// The artifact was written to disk.
    ArtifactSaved { attempt: AttemptId, path: PathBuf },
    /// The artifact could not be written.
    ArtifactSaveFailed { attempt: AttemptId, message: String },
    /// User acknowledged the success notice.
    SuccessDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
