use std::path::PathBuf;

use crate::{EngineChoice, ErrorKind, SessionStatus};

pub(crate) const NO_FILE_LABEL: &str = "No file selected";
pub(crate) const SUCCESS_ACK_TEXT: &str = "Your PDF has been generated and saved.";

/// Everything the front end shows, derived from the session alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub status: SessionStatus,
    pub header_label: &'static str,
    pub selected_file: String,
    /// `None` when engine selection is disabled.
    pub engine: Option<EngineChoice>,
    pub status_text: String,
    pub queue_message: Option<String>,
    pub error: Option<ErrorPanel>,
    pub success: Option<SuccessAck>,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub picker_enabled: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub kind: ErrorKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessAck {
    pub text: &'static str,
    pub saved_path: Option<PathBuf>,
}

/// Short status label shown in the panel header.
pub fn header_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Error => "Error",
        SessionStatus::Running => "Compiling",
        SessionStatus::Success => "Completed",
        SessionStatus::Idle => "Pending",
    }
}

pub(crate) fn submit_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Running => "Compiling…",
        SessionStatus::Idle | SessionStatus::Error | SessionStatus::Success => "Start compile",
    }
}
