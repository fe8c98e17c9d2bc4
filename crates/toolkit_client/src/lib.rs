//! Toolkit client: HTTP access to the toolkit server and progress tracking.
mod api;
mod engine;
mod registry;
mod submit;
mod tracker;
mod types;

pub use api::{ClientSettings, ReqwestApi, ToolkitApi};
pub use engine::{EngineEvent, EngineHandle, RequestId};
pub use registry::PollRegistry;
pub use submit::{Submission, SubmissionBody, SubmissionPart};
pub use tracker::{ProgressRenderer, ProgressTracker, TrackerSettings};
pub use types::{
    ClientError, FailureKind, Outcome, OutcomeKind, ProgressSnapshot, SubmitReply, TaskId,
    TaskStatus,
};
