use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Extensions offered by the archive picker. Contents are never inspected.
pub const PICKER_EXTENSIONS: &[&str] = &["zip", "rar"];

/// Returns true when `name` passes the picker's extension filter.
pub fn matches_picker_filter(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            PICKER_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// An archive picked by the user: its original file name and raw bytes.
///
/// The content is shared so the submit effect can carry it without copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedArchive {
    name: String,
    content: Arc<[u8]>,
}

impl UploadedArchive {
    pub fn new(name: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum EngineChoice {
    #[default]
    XeLatex,
    PdfLatex,
}

impl EngineChoice {
    pub const ALL: [EngineChoice; 2] = [EngineChoice::XeLatex, EngineChoice::PdfLatex];

    /// Wire value of the `engine` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            EngineChoice::XeLatex => "xelatex",
            EngineChoice::PdfLatex => "pdflatex",
        }
    }
}

impl fmt::Display for EngineChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEngineError(String);

impl fmt::Display for ParseEngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown engine '{}' (expected xelatex or pdflatex)", self.0)
    }
}

impl std::error::Error for ParseEngineError {}

impl FromStr for EngineChoice {
    type Err = ParseEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineChoice::ALL
            .into_iter()
            .find(|engine| engine.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEngineError(s.to_string()))
    }
}
