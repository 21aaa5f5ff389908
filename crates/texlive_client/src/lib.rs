//! Compile client: HTTP contract with the compile service, response
//! classification, artifact saving and effect execution.
mod classify;
mod client;
mod download;
mod engine;
mod filename;
mod queue;
mod settings;
mod types;

pub use classify::{classify, preview, Classification, ServiceResponse, PREVIEW_CHARS};
pub use client::{CompileService, ReqwestCompileService};
pub use download::{ensure_output_dir, ArtifactDownloader, DownloadError, StagedArtifact};
pub use engine::EngineHandle;
pub use filename::{artifact_filename, DEFAULT_BASE_NAME};
pub use queue::{parse_queue_status, probe_queue};
pub use settings::{InvalidEndpoint, ServiceSettings, DEFAULT_BASE_URL};
pub use types::{
    Artifact, AttemptId, CompileError, CompileRequest, EngineEvent, FailureKind, ProbeError,
    QueueSnapshot, TexEngine,
};
