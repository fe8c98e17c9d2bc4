use crate::{AlertLevel, FormDescriptor, FormField, FormId, ReplyFields, ResultKind, SelectedFile};
use crate::{TaskId, ZoneDescriptor, ZoneId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A form was found on the page.
    FormRegistered(FormDescriptor),
    /// An upload zone was found on the page.
    ZoneRegistered(ZoneDescriptor),
    /// User clicked the menu toggle.
    MenuToggled,
    /// User submitted a form.
    FormSubmitted {
        form_id: FormId,
        fields: Vec<FormField>,
    },
    /// The submission request finished. `Err` carries a transport or decode failure.
    SubmitCompleted {
        form_id: FormId,
        result: Result<ReplyFields, String>,
    },
    /// The post-submit delay elapsed; the submit control may be restored.
    SubmitButtonRestoreElapsed { form_id: FormId },
    /// Start following a task on behalf of a form.
    TrackRequested { form_id: FormId, task_id: TaskId },
    /// Tracker: a progress snapshot arrived.
    ProgressUpdated {
        task_id: TaskId,
        progress: Option<f64>,
        message: Option<String>,
    },
    /// Tracker: the task reached a terminal state.
    ResultShown {
        task_id: TaskId,
        kind: ResultKind,
        title: String,
        message: String,
    },
    /// Tracker: the task's artifact can be downloaded.
    DownloadReady { task_id: TaskId, href: String },
    /// Tracker: the progress indicator for the task should disappear.
    ProgressHidden { task_id: TaskId },
    /// dragenter or dragover on a zone.
    DragEntered { zone_id: ZoneId },
    /// dragleave on a zone.
    DragLeft { zone_id: ZoneId },
    /// Drag event anywhere on the page outside a zone.
    PageDragged,
    FilesDropped {
        zone_id: ZoneId,
        files: Vec<SelectedFile>,
    },
    FileInputChanged {
        zone_id: ZoneId,
        files: Vec<SelectedFile>,
    },
    ZoneClicked { zone_id: ZoneId },
    AlertRequested { message: String, level: AlertLevel },
    AlertExpired { alert_id: u64 },
    /// Fallback for placeholder wiring.
    NoOp,
}
