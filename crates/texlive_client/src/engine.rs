use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use texlive_logging::texlive_error;

use crate::client::{CompileService, ReqwestCompileService};
use crate::queue::probe_queue;
use crate::{AttemptId, CompileRequest, EngineEvent, ServiceSettings};

enum EngineCommand {
    ProbeQueue {
        attempt: AttemptId,
    },
    Compile {
        attempt: AttemptId,
        request: CompileRequest,
    },
}

/// Runs service calls on a worker thread, one command at a time and in the
/// order they were issued, and reports results as `EngineEvent`s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ServiceSettings) -> io::Result<Self> {
        Self::with_service(Arc::new(ReqwestCompileService::new(settings)))
    }

    pub fn with_service(service: Arc<dyn CompileService>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("texlive-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    runtime.block_on(handle_command(service.as_ref(), command, &event_tx));
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn probe_queue(&self, attempt: AttemptId) {
        self.send(EngineCommand::ProbeQueue { attempt });
    }

    pub fn compile(&self, attempt: AttemptId, request: CompileRequest) {
        self.send(EngineCommand::Compile { attempt, request });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event. `None` once the worker has stopped.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            texlive_error!("Engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    service: &dyn CompileService,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::ProbeQueue { attempt } => EngineEvent::QueueProbed {
            attempt,
            snapshot: probe_queue(service).await,
        },
        EngineCommand::Compile { attempt, request } => EngineEvent::CompileCompleted {
            attempt,
            result: service.compile(request).await,
        },
    };
    let _ = event_tx.send(event);
}
