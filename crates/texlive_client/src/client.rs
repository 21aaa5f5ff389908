use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use texlive_logging::{texlive_debug, texlive_info};

use crate::classify::{classify, ServiceResponse};
use crate::queue::parse_queue_status;
use crate::{
    Artifact, CompileError, CompileRequest, FailureKind, ProbeError, QueueSnapshot,
    ServiceSettings,
};

/// The two calls a compile session makes against the service.
#[async_trait::async_trait]
pub trait CompileService: Send + Sync {
    /// `GET {base}/queue`.
    async fn queue_status(&self) -> Result<QueueSnapshot, ProbeError>;

    /// `POST {base}/compile`, classified into an artifact or a failure.
    async fn compile(&self, request: CompileRequest) -> Result<Artifact, CompileError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestCompileService {
    settings: ServiceSettings,
}

impl ReqwestCompileService {
    pub fn new(settings: ServiceSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self, timeout: Option<Duration>) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder().connect_timeout(self.settings.connect_timeout);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// `GET {base}/health`; returns the body text on a success status.
    pub async fn health(&self) -> Result<String, ProbeError> {
        let url = self
            .settings
            .endpoint("health")
            .map_err(|err| ProbeError::InvalidUrl(err.to_string()))?;
        let client = self
            .build_client(Some(self.settings.queue_timeout))
            .map_err(|err| ProbeError::Network(err.to_string()))?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|err| ProbeError::Network(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::HttpStatus(status.as_u16()));
        }
        let body = read_body(response, self.settings.max_response_bytes)
            .await
            .map_err(|err| ProbeError::Network(err.to_string()))?;
        Ok(health_text(&body))
    }
}

#[async_trait::async_trait]
impl CompileService for ReqwestCompileService {
    async fn queue_status(&self) -> Result<QueueSnapshot, ProbeError> {
        let url = self
            .settings
            .endpoint("queue")
            .map_err(|err| ProbeError::InvalidUrl(err.to_string()))?;
        let client = self
            .build_client(Some(self.settings.queue_timeout))
            .map_err(|err| ProbeError::Network(err.to_string()))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|err| ProbeError::Network(err.to_string()))?;
        let status = response.status();
        if status.as_u16() != 200 {
            return Err(ProbeError::HttpStatus(status.as_u16()));
        }

        let body = read_body(response, self.settings.max_response_bytes)
            .await
            .map_err(|err| ProbeError::Network(err.to_string()))?;
        parse_queue_status(&body)
    }

    async fn compile(&self, request: CompileRequest) -> Result<Artifact, CompileError> {
        let url = self
            .settings
            .endpoint("compile")
            .map_err(|err| CompileError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self
            .build_client(self.settings.compile_timeout)
            .map_err(|err| CompileError::new(FailureKind::Network, err.to_string()))?;

        texlive_info!(
            "Submitting {} ({} bytes) engine={}",
            request.archive_name,
            request.archive.len(),
            request.engine.map(|engine| engine.as_str()).unwrap_or("<service default>")
        );
        let form = build_form(request)?;

        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let body = read_body(response, self.settings.max_response_bytes).await?;
        texlive_debug!(
            "Compile response status={} content_type={:?} bytes={}",
            status,
            content_type,
            body.len()
        );

        classify(ServiceResponse {
            status,
            content_type,
            body,
        })
        .into_result()
    }
}

fn build_form(request: CompileRequest) -> Result<Form, CompileError> {
    let mime = archive_mime(&request.archive_name);
    let part = Part::bytes(request.archive)
        .file_name(request.archive_name)
        .mime_str(mime)
        .map_err(|err| CompileError::new(FailureKind::Network, err.to_string()))?;

    let mut form = Form::new().part("file", part);
    if let Some(engine) = request.engine {
        form = form.text("engine", engine.as_str());
    }
    Ok(form)
}

/// The health endpoint answers with a JSON string; anything else is shown as text.
fn health_text(body: &[u8]) -> String {
    serde_json::from_slice::<String>(body)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string())
}

fn archive_mime(name: &str) -> &'static str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".zip") {
        "application/zip"
    } else if lower.ends_with(".rar") {
        "application/vnd.rar"
    } else {
        "application/octet-stream"
    }
}

async fn read_body(response: reqwest::Response, max_bytes: u64) -> Result<Vec<u8>, CompileError> {
    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(CompileError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                },
                "response too large",
            ));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(CompileError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn map_reqwest_error(err: reqwest::Error) -> CompileError {
    if err.is_timeout() {
        return CompileError::new(FailureKind::Timeout, err.to_string());
    }
    CompileError::new(FailureKind::Network, err.to_string())
}
