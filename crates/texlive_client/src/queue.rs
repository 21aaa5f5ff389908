use serde::Deserialize;
use texlive_logging::{texlive_debug, texlive_warn};

use crate::{CompileService, ProbeError, QueueSnapshot};

#[derive(Debug, Deserialize)]
struct RawQueueStatus {
    #[serde(default)]
    running_jobs: Option<serde_json::Value>,
}

/// Parses `{ "running_jobs": n }`. A missing or non-numeric count reads as 0;
/// a body that is not a JSON object is malformed.
pub fn parse_queue_status(body: &[u8]) -> Result<QueueSnapshot, ProbeError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|err| ProbeError::Malformed(err.to_string()))?;
    if !value.is_object() {
        return Err(ProbeError::Malformed(format!("expected an object, got {value}")));
    }
    let raw: RawQueueStatus =
        serde_json::from_value(value).map_err(|err| ProbeError::Malformed(err.to_string()))?;
    let running_jobs = raw.running_jobs.as_ref().and_then(job_count).unwrap_or(0);
    Ok(QueueSnapshot { running_jobs })
}

/// Any non-negative JSON number counts; fractions are truncated.
fn job_count(value: &serde_json::Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|count| count.is_finite() && *count >= 0.0)
            .map(|count| count as u64)
    })
}

/// Best-effort queue check made before a compile.
///
/// Failures are logged and reported as "no information"; they never reach the
/// session as errors.
pub async fn probe_queue(service: &dyn CompileService) -> Option<QueueSnapshot> {
    match service.queue_status().await {
        Ok(snapshot) => {
            texlive_debug!("Queue probe: {} running jobs", snapshot.running_jobs);
            Some(snapshot)
        }
        Err(err) => {
            texlive_warn!("Queue probe failed: {}", err);
            None
        }
    }
}
