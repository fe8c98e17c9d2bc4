//! Toolkit core: pure UI state machine for forms, progress, results and drop zones.
mod effect;
mod form;
mod msg;
mod size;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use form::{
    build_payload, FieldValue, FormDescriptor, FormField, FormId, ReplyFields, SelectedFile,
    SubmitPayload, TaskId, TOOLKIT_FORM_CLASS, URL_FORM_CLASS,
};
pub use msg::Msg;
pub use size::format_file_size;
pub use state::{
    AlertLevel, AppState, ButtonState, ProgressView, ResultKind, ResultPanel, Timings,
    ZoneDescriptor, ZoneId, BUSY_LABEL, DEFAULT_SUBMIT_LABEL, DEFAULT_SUCCESS_MESSAGE,
    GENERIC_ERROR_MESSAGE,
};
pub use update::update;
pub use view_model::{AlertView, AppViewModel, FormView, ZoneView};
