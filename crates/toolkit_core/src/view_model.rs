use crate::{AlertLevel, ButtonState, FormId, ProgressView, ResultPanel, TaskId, ZoneId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub sidebar_collapsed: bool,
    pub main_expanded: bool,
    pub forms: Vec<FormView>,
    pub zones: Vec<ZoneView>,
    pub alerts: Vec<AlertView>,
    pub tracked_tasks: Vec<TaskId>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn form(&self, form_id: FormId) -> Option<&FormView> {
        self.forms.iter().find(|form| form.form_id == form_id)
    }

    pub fn zone(&self, zone_id: ZoneId) -> Option<&ZoneView> {
        self.zones.iter().find(|zone| zone.zone_id == zone_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub form_id: FormId,
    pub button: Option<ButtonState>,
    pub progress: Option<ProgressView>,
    pub result: Option<ResultPanel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneView {
    pub zone_id: ZoneId,
    pub drag_active: bool,
    pub file_selected: bool,
    pub label_text: String,
    pub hint_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertView {
    pub alert_id: u64,
    pub level: AlertLevel,
    pub message: String,
}
