use std::fmt;
use std::path::PathBuf;

use crate::view_model::{self, ErrorPanel, SessionView, SuccessAck};
use crate::{EngineChoice, UploadedArchive};

pub type AttemptId = u64;

pub(crate) const STATUS_PENDING: &str = "Waiting to compile";
pub(crate) const STATUS_RUNNING: &str = "Compiling… this can take a minute or two, please wait.";
pub(crate) const STATUS_SUCCEEDED: &str = "Compiled successfully!";
pub(crate) const STATUS_FAILED: &str = "Compilation failed";
pub(crate) const NO_ARCHIVE_MESSAGE: &str = "No archive selected: choose a .zip / .rar archive first.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Error,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Submit without an archive. No request was made.
    Validation,
    /// The compile request did not complete.
    Network,
    /// The service answered with a non-success status.
    Service,
    /// The service reported success with something other than a PDF.
    Protocol,
    /// The PDF arrived but could not be saved locally.
    Download,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Validation => "validation error",
            ErrorKind::Network => "network error",
            ErrorKind::Service => "service error",
            ErrorKind::Protocol => "protocol error",
            ErrorKind::Download => "download error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl CompileFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// The compiled PDF.
    Artifact(Vec<u8>),
    Failed(CompileFailure),
}

/// The single compile session owned by the update function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    archive: Option<UploadedArchive>,
    engine: EngineChoice,
    engine_selectable: bool,
    status: SessionStatus,
    status_text: String,
    error: Option<CompileFailure>,
    queue_message: String,
    show_success: bool,
    saved_path: Option<PathBuf>,
    attempt: AttemptId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_engine_selection(true)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose engine selector may be switched off by the deployment.
    /// When off, submissions carry no engine and the service picks its default.
    pub fn with_engine_selection(enabled: bool) -> Self {
        Self {
            archive: None,
            engine: EngineChoice::default(),
            engine_selectable: enabled,
            status: SessionStatus::Idle,
            status_text: STATUS_PENDING.to_string(),
            error: None,
            queue_message: String::new(),
            show_success: false,
            saved_path: None,
            attempt: 0,
            dirty: false,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Id of the most recently started attempt, 0 before the first submit.
    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    pub fn archive(&self) -> Option<&UploadedArchive> {
        self.archive.as_ref()
    }

    pub fn engine(&self) -> EngineChoice {
        self.engine
    }

    pub fn engine_selectable(&self) -> bool {
        self.engine_selectable
    }

    pub fn view(&self) -> SessionView {
        let running = self.status == SessionStatus::Running;
        SessionView {
            status: self.status,
            header_label: view_model::header_label(self.status),
            selected_file: self
                .archive
                .as_ref()
                .map(|archive| archive.name().to_string())
                .unwrap_or_else(|| view_model::NO_FILE_LABEL.to_string()),
            engine: self.engine_selectable.then_some(self.engine),
            status_text: self.status_text.clone(),
            queue_message: (!self.queue_message.is_empty()).then(|| self.queue_message.clone()),
            error: self.error.as_ref().map(|failure| ErrorPanel {
                kind: failure.kind,
                text: failure.message.clone(),
            }),
            success: self.show_success.then(|| SuccessAck {
                text: view_model::SUCCESS_ACK_TEXT,
                saved_path: self.saved_path.clone(),
            }),
            submit_label: view_model::submit_label(self.status),
            submit_enabled: !running,
            picker_enabled: !running,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn select_archive(&mut self, archive: UploadedArchive) {
        self.archive = Some(archive);
        self.status = SessionStatus::Idle;
        self.status_text = STATUS_PENDING.to_string();
        self.error = None;
        self.queue_message.clear();
        self.show_success = false;
        self.saved_path = None;
        self.mark_dirty();
    }

    pub(crate) fn set_engine(&mut self, engine: EngineChoice) {
        if !self.engine_selectable || self.engine == engine {
            return;
        }
        self.engine = engine;
        self.mark_dirty();
    }

    pub(crate) fn reject_missing_archive(&mut self) {
        self.fail(CompileFailure::new(ErrorKind::Validation, NO_ARCHIVE_MESSAGE));
    }

    /// Moves to `Running` and hands back what the submit effect needs.
    /// Returns `None` when there is nothing to submit.
    pub(crate) fn begin_attempt(
        &mut self,
    ) -> Option<(AttemptId, UploadedArchive, Option<EngineChoice>)> {
        let archive = self.archive.clone()?;
        self.attempt += 1;
        self.status = SessionStatus::Running;
        self.status_text = STATUS_RUNNING.to_string();
        self.error = None;
        self.queue_message.clear();
        self.show_success = false;
        self.saved_path = None;
        self.mark_dirty();
        let engine = self.engine_selectable.then_some(self.engine);
        Some((self.attempt, archive, engine))
    }

    pub(crate) fn apply_queue(&mut self, running_jobs: Option<u64>) {
        let message = match running_jobs {
            Some(count) if count > 0 => queue_message(count),
            _ => String::new(),
        };
        if message != self.queue_message {
            self.queue_message = message;
            self.mark_dirty();
        }
    }

    pub(crate) fn succeed(&mut self) {
        self.status = SessionStatus::Success;
        self.status_text = STATUS_SUCCEEDED.to_string();
        self.queue_message.clear();
        self.show_success = true;
        self.mark_dirty();
    }

    pub(crate) fn fail(&mut self, failure: CompileFailure) {
        self.status = SessionStatus::Error;
        self.status_text = STATUS_FAILED.to_string();
        self.queue_message.clear();
        self.show_success = false;
        self.error = Some(failure);
        self.mark_dirty();
    }

    pub(crate) fn record_saved(&mut self, path: PathBuf) {
        self.saved_path = Some(path);
        self.mark_dirty();
    }

    pub(crate) fn dismiss_success(&mut self) {
        if self.show_success {
            self.show_success = false;
            self.mark_dirty();
        }
    }
}

fn queue_message(running_jobs: u64) -> String {
    let noun = if running_jobs == 1 { "job" } else { "jobs" };
    format!(
        "{running_jobs} compile {noun} already running on the server; yours will be queued and run in turn."
    )
}
