use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use texlive_client::{ArtifactDownloader, EngineHandle, ServiceSettings};
use texlive_core::{
    matches_picker_filter, update, AppState, EngineChoice, ErrorPanel, Msg, SessionStatus,
    UploadedArchive,
};
use texlive_logging::{texlive_info, texlive_warn};

use super::effects::EffectRunner;
use super::render::Renderer;

pub struct CompileOptions {
    pub archive: PathBuf,
    pub engine: EngineChoice,
    pub engine_selectable: bool,
    pub out_dir: PathBuf,
    pub settings: ServiceSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub status: SessionStatus,
    pub saved_path: Option<PathBuf>,
    pub error: Option<ErrorPanel>,
}

/// Runs one compile session: select, submit, wait for the result, save.
pub fn run_compile(options: CompileOptions) -> Result<SessionOutcome> {
    let archive = pick_archive(&options.archive)?;
    let engine = EngineHandle::new(options.settings).context("failed to start compile worker")?;
    let runner = EffectRunner::new(engine, ArtifactDownloader::new(options.out_dir));

    let mut session = Session {
        state: AppState::with_engine_selection(options.engine_selectable),
        runner,
        renderer: Renderer::stdout(),
    };

    session.dispatch(Msg::ArchiveSelected(archive));
    session.dispatch(Msg::EngineChanged(options.engine));
    session.dispatch(Msg::SubmitClicked);
    while session.state.status() == SessionStatus::Running {
        let msg = session.runner.next_msg(session.state.attempt());
        session.dispatch(msg);
    }

    let view = session.state.view();
    let outcome = SessionOutcome {
        status: view.status,
        saved_path: view.success.as_ref().and_then(|ack| ack.saved_path.clone()),
        error: view.error,
    };
    if outcome.status == SessionStatus::Success {
        // The terminal has shown the acknowledgment; nothing waits for a click.
        session.dispatch(Msg::SuccessDismissed);
    }
    texlive_info!("Session finished with {:?}", outcome.status);
    Ok(outcome)
}

/// Applies the picker's extension filter and reads the archive. Contents are
/// not inspected.
fn pick_archive(path: &Path) -> Result<UploadedArchive> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} is not a file", path.display()))?;
    if !matches_picker_filter(&name) {
        bail!("{} is not a .zip or .rar archive", path.display());
    }
    let content = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(UploadedArchive::new(name, content))
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
}

impl Session {
    /// Applies `msg` and any messages its effects produce inline, then
    /// renders once if anything changed.
    fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        let mut changed = false;
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            changed |= state.consume_dirty();
            self.state = state;
            inbox.extend(self.runner.run(effects));
        }

        if changed {
            if let Err(err) = self.renderer.present(&self.state.view()) {
                texlive_warn!("Failed to render session: {}", err);
            }
        }
    }
}
