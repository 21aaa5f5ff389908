use crate::{AttemptId, EngineChoice, UploadedArchive};

/// Side effects requested by `update`, executed in order by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ProbeQueue {
        attempt: AttemptId,
    },
    SubmitCompile {
        attempt: AttemptId,
        archive: UploadedArchive,
        /// `None` when the deployment disabled engine selection.
        engine: Option<EngineChoice>,
    },
    SaveArtifact {
        attempt: AttemptId,
        archive_name: String,
        pdf: Vec<u8>,
    },
}
