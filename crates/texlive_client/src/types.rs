use std::fmt;

pub type AttemptId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexEngine {
    XeLatex,
    PdfLatex,
}

impl TexEngine {
    pub fn as_str(self) -> &'static str {
        match self {
            TexEngine::XeLatex => "xelatex",
            TexEngine::PdfLatex => "pdflatex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub archive_name: String,
    pub archive: Vec<u8>,
    /// Omitted from the form when `None`; the service then uses its default.
    pub engine: Option<TexEngine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub running_jobs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub pdf: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    QueueProbed {
        attempt: AttemptId,
        snapshot: Option<QueueSnapshot>,
    },
    CompileCompleted {
        attempt: AttemptId,
        result: Result<Artifact, CompileError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub kind: FailureKind,
    pub message: String,
}

impl CompileError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for CompileError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Network,
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Non-success status from the service.
    Service { status: u16 },
    /// Success status with something other than a PDF.
    Protocol { content_type: String },
}

impl FailureKind {
    /// True for failures where the request never produced a usable response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FailureKind::InvalidUrl
                | FailureKind::Network
                | FailureKind::Timeout
                | FailureKind::TooLarge { .. }
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid service url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Service { status } => write!(f, "compilation failed (HTTP {status})"),
            FailureKind::Protocol { content_type } => {
                write!(f, "unexpected response content type {content_type}")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid service url: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Network(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
}
