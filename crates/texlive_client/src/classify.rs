use crate::{Artifact, CompileError, FailureKind};

/// Maximum number of body characters quoted in a protocol error.
pub const PREVIEW_CHARS: usize = 500;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const GENERIC_FAILURE: &str = "the compile request failed; check that the engine suits your template \
and that the sources compile locally";

/// A settled HTTP response from the compile endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Artifact(Artifact),
    StructuredError {
        status: u16,
        message: String,
    },
    UnstructuredError {
        status: u16,
        message: String,
    },
    /// Success status, but the body is not a PDF.
    ProtocolError {
        status: u16,
        content_type: String,
        preview: String,
    },
}

impl Classification {
    pub fn into_result(self) -> Result<Artifact, CompileError> {
        match self {
            Classification::Artifact(artifact) => Ok(artifact),
            Classification::StructuredError { status, message }
            | Classification::UnstructuredError { status, message } => {
                Err(CompileError::new(FailureKind::Service { status }, message))
            }
            Classification::ProtocolError {
                content_type,
                preview,
                ..
            } => {
                let message = format!(
                    "the server reported success but sent {content_type} instead of a PDF; body: {preview}"
                );
                Err(CompileError::new(
                    FailureKind::Protocol { content_type },
                    message,
                ))
            }
        }
    }
}

/// Sorts a compile response into artifact, service error or protocol error.
///
/// Only the content type separates the artifact channel from the error
/// channel, so a success status is not trusted on its own.
pub fn classify(response: ServiceResponse) -> Classification {
    let ServiceResponse {
        status,
        content_type,
        body,
    } = response;
    let essence = content_type.as_deref().map(mime_essence);

    if !(200..300).contains(&status) {
        return match essence.as_deref() {
            Some(ct) if is_structured(ct) => Classification::StructuredError {
                status,
                message: structured_detail(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            },
            _ => Classification::UnstructuredError {
                status,
                message: text_detail(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            },
        };
    }

    if essence.as_deref() == Some(PDF_CONTENT_TYPE) {
        return Classification::Artifact(Artifact {
            pdf: body,
            content_type: content_type.unwrap_or_default(),
        });
    }

    Classification::ProtocolError {
        status,
        content_type: content_type.unwrap_or_else(|| "<none>".to_string()),
        preview: preview(&body),
    }
}

/// First `PREVIEW_CHARS` characters of a body, decoded lossily.
pub fn preview(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(PREVIEW_CHARS)
        .collect()
}

fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase()
}

fn is_structured(essence: &str) -> bool {
    essence == "application/json" || essence.ends_with("+json")
}

fn structured_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let message = match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Object(map) => match map.get("detail") {
            Some(detail) if !is_falsy(detail) => match detail {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            },
            // An absent or empty detail shows the whole object.
            _ => serde_json::Value::Object(map).to_string(),
        },
        other => other.to_string(),
    };
    non_empty(message)
}

fn is_falsy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(flag) => !flag,
        serde_json::Value::String(text) => text.is_empty(),
        serde_json::Value::Number(number) => number.as_f64() == Some(0.0),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => false,
    }
}

fn text_detail(body: &[u8]) -> Option<String> {
    non_empty(String::from_utf8_lossy(body).trim().to_string())
}

fn non_empty(message: String) -> Option<String> {
    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}
