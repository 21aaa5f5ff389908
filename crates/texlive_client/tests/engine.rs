use std::sync::{Arc, Mutex};

use texlive_client::{
    Artifact, CompileError, CompileRequest, CompileService, EngineEvent, EngineHandle,
    ProbeError, QueueSnapshot, ServiceSettings, TexEngine,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records calls in order; the queue probe fails when `queue_down` is set.
struct RecordingService {
    calls: Arc<Mutex<Vec<&'static str>>>,
    queue_down: bool,
}

#[async_trait::async_trait]
impl CompileService for RecordingService {
    async fn queue_status(&self) -> Result<QueueSnapshot, ProbeError> {
        self.calls.lock().unwrap().push("queue");
        if self.queue_down {
            Err(ProbeError::Network("connection refused".to_string()))
        } else {
            Ok(QueueSnapshot { running_jobs: 2 })
        }
    }

    async fn compile(&self, request: CompileRequest) -> Result<Artifact, CompileError> {
        self.calls.lock().unwrap().push("compile");
        Ok(Artifact {
            pdf: request.archive,
            content_type: "application/pdf".to_string(),
        })
    }
}

fn request() -> CompileRequest {
    CompileRequest {
        archive_name: "thesis.zip".to_string(),
        archive: b"%PDF".to_vec(),
        engine: Some(TexEngine::XeLatex),
    }
}

fn run_attempt(queue_down: bool) -> (Vec<EngineEvent>, Vec<&'static str>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let engine = EngineHandle::with_service(Arc::new(RecordingService {
        calls: calls.clone(),
        queue_down,
    }))
    .unwrap();

    engine.probe_queue(1);
    engine.compile(1, request());
    let events = vec![engine.recv().unwrap(), engine.recv().unwrap()];
    let calls = calls.lock().unwrap().clone();
    (events, calls)
}

#[test]
fn commands_run_in_issue_order() {
    let (events, calls) = run_attempt(false);

    assert_eq!(calls, vec!["queue", "compile"]);
    assert_eq!(
        events[0],
        EngineEvent::QueueProbed {
            attempt: 1,
            snapshot: Some(QueueSnapshot { running_jobs: 2 })
        }
    );
    assert!(matches!(
        &events[1],
        EngineEvent::CompileCompleted { attempt: 1, result: Ok(_) }
    ));
}

#[test]
fn queue_failure_does_not_change_compile_result() {
    let (healthy, _) = run_attempt(false);
    let (degraded, calls) = run_attempt(true);

    assert_eq!(calls, vec!["queue", "compile"]);
    assert_eq!(
        degraded[0],
        EngineEvent::QueueProbed {
            attempt: 1,
            snapshot: None
        }
    );
    assert_eq!(healthy[1], degraded[1]);
}

#[test]
fn reqwest_engine_reports_artifact() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(MockServer::start());
    runtime.block_on(async {
        Mock::given(method("GET"))
            .and(path("/queue"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "running_jobs": 0 })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/compile"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
            )
            .mount(&server)
            .await;
    });

    let engine = EngineHandle::new(ServiceSettings::with_base_url(server.uri())).unwrap();
    engine.probe_queue(7);
    engine.compile(7, request());

    assert_eq!(
        engine.recv(),
        Some(EngineEvent::QueueProbed {
            attempt: 7,
            snapshot: Some(QueueSnapshot { running_jobs: 0 })
        })
    );
    match engine.recv() {
        Some(EngineEvent::CompileCompleted {
            attempt: 7,
            result: Ok(artifact),
        }) => assert_eq!(artifact.pdf, b"%PDF-1.4".to_vec()),
        other => panic!("unexpected event {other:?}"),
    }
    assert!(engine.try_recv().is_none());
}
