//! Compile client core: pure session state machine and feedback projection.
mod archive;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use archive::{
    matches_picker_filter, EngineChoice, ParseEngineError, UploadedArchive, PICKER_EXTENSIONS,
};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, AttemptId, CompileFailure, CompileOutcome, ErrorKind, SessionStatus};
pub use update::update;
pub use view_model::{header_label, ErrorPanel, SessionView, SuccessAck};
