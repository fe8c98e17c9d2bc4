use std::collections::BTreeMap;
use std::time::Duration;

use crate::view_model::{AlertView, AppViewModel, FormView, ZoneView};
use crate::{format_file_size, FormDescriptor, FormId, SelectedFile, TaskId};

pub type ZoneId = u64;

pub const BUSY_LABEL: &str = "Processing...";
pub const DEFAULT_SUBMIT_LABEL: &str = "Submit";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation completed successfully!";
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub button_restore: Duration,
    pub alert_dismiss: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            button_restore: Duration::from_secs(1),
            alert_dismiss: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Success,
    Error,
}

impl ResultKind {
    /// State class applied to the result panel.
    pub fn class_name(self) -> &'static str {
        match self {
            ResultKind::Success => "success",
            ResultKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub enabled: bool,
    pub label: String,
    original_label: String,
}

impl ButtonState {
    fn new(label: &str) -> Self {
        let original = if label.is_empty() {
            DEFAULT_SUBMIT_LABEL
        } else {
            label
        };
        Self {
            enabled: true,
            label: original.to_string(),
            original_label: original.to_string(),
        }
    }

    fn set_busy(&mut self) {
        self.enabled = false;
        self.label = BUSY_LABEL.to_string();
    }

    fn restore(&mut self) {
        self.enabled = true;
        self.label = self.original_label.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressView {
    pub visible: bool,
    pub active: bool,
    /// Bar fill in percent, 0..=100.
    pub width_percent: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultPanel {
    pub visible: bool,
    pub kind: Option<ResultKind>,
    pub title: String,
    pub message: String,
    pub fade_in: bool,
    pub download_href: Option<String>,
}

impl ResultPanel {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn show(&mut self, kind: ResultKind, title: &str, message: &str) {
        self.kind = Some(kind);
        self.visible = true;
        self.title = title.to_string();
        self.message = message.to_string();
        self.fade_in = true;
    }

    /// Returns false when a download affordance already exists.
    fn show_download(&mut self, href: &str) -> bool {
        if self.download_href.is_some() {
            return false;
        }
        self.download_href = Some(href.to_string());
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FormState {
    descriptor: FormDescriptor,
    button: Option<ButtonState>,
    progress: Option<ProgressView>,
    result: Option<ResultPanel>,
    /// A submission was sent and its reply has not arrived yet.
    awaiting_reply: bool,
}

impl FormState {
    fn new(descriptor: FormDescriptor) -> Self {
        let button = descriptor.submit_label.as_deref().map(ButtonState::new);
        let progress = descriptor.has_progress.then(ProgressView::default);
        let result = descriptor.has_result.then(ResultPanel::default);
        Self {
            descriptor,
            button,
            progress,
            result,
            awaiting_reply: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ZoneDescriptor {
    pub id: ZoneId,
    pub has_file_input: bool,
    pub label_text: String,
    pub hint_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ZoneState {
    descriptor: ZoneDescriptor,
    drag_active: bool,
    label_text: String,
    hint_text: String,
    selected: Option<SelectedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Alert {
    id: u64,
    level: AlertLevel,
    message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    sidebar_collapsed: bool,
    forms: BTreeMap<FormId, FormState>,
    zones: BTreeMap<ZoneId, ZoneState>,
    task_owners: BTreeMap<TaskId, FormId>,
    alerts: Vec<Alert>,
    next_alert_id: u64,
    timings: Timings,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timings(timings: Timings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            sidebar_collapsed: self.sidebar_collapsed,
            main_expanded: self.sidebar_collapsed,
            forms: self
                .forms
                .iter()
                .map(|(form_id, form)| FormView {
                    form_id: *form_id,
                    button: form.button.clone(),
                    progress: form.progress.clone(),
                    result: form.result.clone(),
                })
                .collect(),
            zones: self
                .zones
                .iter()
                .map(|(zone_id, zone)| ZoneView {
                    zone_id: *zone_id,
                    drag_active: zone.drag_active,
                    file_selected: zone.selected.is_some(),
                    label_text: zone.label_text.clone(),
                    hint_text: zone.hint_text.clone(),
                })
                .collect(),
            alerts: self
                .alerts
                .iter()
                .map(|alert| AlertView {
                    alert_id: alert.id,
                    level: alert.level,
                    message: alert.message.clone(),
                })
                .collect(),
            tracked_tasks: self.task_owners.keys().cloned().collect(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// True when no submission is in flight, no task is being followed and
    /// every submit control is usable.
    pub fn is_settled(&self) -> bool {
        self.task_owners.is_empty()
            && self.forms.values().all(|form| {
                !form.awaiting_reply && form.button.as_ref().is_none_or(|button| button.enabled)
            })
    }

    pub fn owner_of(&self, task_id: &str) -> Option<FormId> {
        self.task_owners.get(task_id).copied()
    }

    pub fn selected_file(&self, zone_id: ZoneId) -> Option<&SelectedFile> {
        self.zones.get(&zone_id)?.selected.as_ref()
    }

    pub(crate) fn form_descriptor(&self, form_id: FormId) -> Option<&FormDescriptor> {
        self.forms.get(&form_id).map(|form| &form.descriptor)
    }

    pub(crate) fn register_form(&mut self, descriptor: FormDescriptor) {
        self.forms.insert(descriptor.id, FormState::new(descriptor));
        self.dirty = true;
    }

    pub(crate) fn register_zone(&mut self, descriptor: ZoneDescriptor) {
        let zone = ZoneState {
            drag_active: false,
            label_text: descriptor.label_text.clone(),
            hint_text: descriptor.hint_text.clone(),
            selected: None,
            descriptor,
        };
        self.zones.insert(zone.descriptor.id, zone);
        self.dirty = true;
    }

    pub(crate) fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        self.dirty = true;
    }

    /// Puts the form into its in-flight look: progress shown, result cleared,
    /// submit control disabled.
    pub(crate) fn begin_submission(&mut self, form_id: FormId) {
        let Some(form) = self.forms.get_mut(&form_id) else {
            return;
        };
        if let Some(progress) = form.progress.as_mut() {
            progress.visible = true;
            progress.active = true;
        }
        if let Some(result) = form.result.as_mut() {
            result.reset();
        }
        if let Some(button) = form.button.as_mut() {
            button.set_busy();
        }
        self.dirty = true;
    }

    pub(crate) fn set_awaiting_reply(&mut self, form_id: FormId, awaiting: bool) {
        if let Some(form) = self.forms.get_mut(&form_id) {
            form.awaiting_reply = awaiting;
        }
    }

    pub(crate) fn restore_button(&mut self, form_id: FormId) {
        if let Some(button) = self
            .forms
            .get_mut(&form_id)
            .and_then(|form| form.button.as_mut())
        {
            button.restore();
            self.dirty = true;
        }
    }

    pub(crate) fn show_result(
        &mut self,
        form_id: FormId,
        kind: ResultKind,
        title: &str,
        message: &str,
    ) {
        if let Some(result) = self
            .forms
            .get_mut(&form_id)
            .and_then(|form| form.result.as_mut())
        {
            result.show(kind, title, message);
            self.dirty = true;
        }
    }

    pub(crate) fn show_download(&mut self, form_id: FormId, href: &str) {
        if let Some(result) = self
            .forms
            .get_mut(&form_id)
            .and_then(|form| form.result.as_mut())
        {
            if result.show_download(href) {
                self.dirty = true;
            }
        }
    }

    /// Records that `form_id` follows `task_id`. Returns false for unknown forms.
    pub(crate) fn assign_task(&mut self, form_id: FormId, task_id: &str) -> bool {
        let Some(form) = self.forms.get_mut(&form_id) else {
            return false;
        };
        if let Some(progress) = form.progress.as_mut() {
            progress.visible = true;
            progress.active = true;
        }
        self.task_owners.insert(task_id.to_string(), form_id);
        self.dirty = true;
        true
    }

    pub(crate) fn apply_progress(
        &mut self,
        task_id: &str,
        progress: Option<f64>,
        message: Option<&str>,
    ) {
        let Some(view) = self.progress_of_task(task_id) else {
            return;
        };
        if let Some(percent) = progress {
            view.width_percent = percent.clamp(0.0, 100.0);
        }
        match (message.filter(|m| !m.is_empty()), progress) {
            (Some(message), _) => view.text = message.to_string(),
            (None, Some(percent)) => view.text = format!("{percent}% complete"),
            (None, None) => {}
        }
        self.dirty = true;
    }

    pub(crate) fn hide_progress(&mut self, task_id: &str) {
        if let Some(view) = self.progress_of_task(task_id) {
            view.visible = false;
            view.active = false;
        }
        if self.task_owners.remove(task_id).is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn set_drag_active(&mut self, zone_id: ZoneId, active: bool) {
        if let Some(zone) = self.zones.get_mut(&zone_id) {
            if zone.drag_active != active {
                zone.drag_active = active;
                self.dirty = true;
            }
        }
    }

    pub(crate) fn zone_has_input(&self, zone_id: ZoneId) -> bool {
        self.zones
            .get(&zone_id)
            .is_some_and(|zone| zone.descriptor.has_file_input)
    }

    /// Adopts the first file of a selection; the rest are ignored.
    pub(crate) fn select_file(&mut self, zone_id: ZoneId, files: Vec<SelectedFile>) {
        let Some(zone) = self.zones.get_mut(&zone_id) else {
            return;
        };
        let Some(file) = files.into_iter().next() else {
            return;
        };
        zone.label_text = file.name.clone();
        zone.hint_text = format!("{} - Ready to upload", format_file_size(file.size));
        zone.selected = Some(file);
        self.dirty = true;
    }

    pub(crate) fn push_alert(&mut self, level: AlertLevel, message: String) -> u64 {
        self.next_alert_id += 1;
        let id = self.next_alert_id;
        self.alerts.push(Alert { id, level, message });
        self.dirty = true;
        id
    }

    pub(crate) fn remove_alert(&mut self, alert_id: u64) {
        let before = self.alerts.len();
        self.alerts.retain(|alert| alert.id != alert_id);
        if self.alerts.len() != before {
            self.dirty = true;
        }
    }

    fn progress_of_task(&mut self, task_id: &str) -> Option<&mut ProgressView> {
        let form_id = *self.task_owners.get(task_id)?;
        self.forms.get_mut(&form_id)?.progress.as_mut()
    }
}
