use std::time::Duration;

use crate::{FormId, SubmitPayload, TaskId, ZoneId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The platform must cancel the event's default action (navigation, file open).
    SuppressDefault,
    Submit {
        form_id: FormId,
        target: String,
        payload: SubmitPayload,
    },
    ScheduleButtonRestore { form_id: FormId, delay: Duration },
    TrackProgress { task_id: TaskId },
    OpenFileBrowser { zone_id: ZoneId },
    ScheduleAlertDismiss { alert_id: u64, delay: Duration },
}
