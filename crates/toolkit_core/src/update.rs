use toolkit_logging::{toolkit_debug, toolkit_warn};

use crate::{
    build_payload, AppState, Effect, FormId, Msg, ResultKind, DEFAULT_SUCCESS_MESSAGE,
    GENERIC_ERROR_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FormRegistered(descriptor) => {
            state.register_form(descriptor);
            Vec::new()
        }
        Msg::ZoneRegistered(descriptor) => {
            state.register_zone(descriptor);
            Vec::new()
        }
        Msg::MenuToggled => {
            state.toggle_sidebar();
            Vec::new()
        }
        Msg::FormSubmitted { form_id, fields } => {
            let Some(form) = state.form_descriptor(form_id).cloned() else {
                return (state, Vec::new());
            };
            // Forms without the marker keep their native behavior.
            if !form.is_toolkit_form() {
                return (state, Vec::new());
            }

            state.begin_submission(form_id);
            let mut effects = vec![Effect::SuppressDefault];
            match form.target() {
                Some(target) => {
                    state.set_awaiting_reply(form_id, true);
                    effects.push(Effect::Submit {
                        form_id,
                        target: target.to_string(),
                        payload: build_payload(&form, fields),
                    });
                }
                None => {
                    toolkit_warn!("Form {} has neither action nor data-action", form_id);
                    state.show_result(form_id, ResultKind::Error, "Error", GENERIC_ERROR_MESSAGE);
                    effects.push(restore_effect(&state, form_id));
                }
            }
            effects
        }
        Msg::SubmitCompleted { form_id, result } => {
            if state.form_descriptor(form_id).is_none() {
                return (state, Vec::new());
            }
            state.set_awaiting_reply(form_id, false);
            let mut effects = Vec::with_capacity(2);
            match result {
                Ok(reply) => {
                    if let Some(task_id) = reply.task_id() {
                        if state.assign_task(form_id, task_id) {
                            effects.push(Effect::TrackProgress {
                                task_id: task_id.to_string(),
                            });
                        }
                    } else if let Some(error) = reply.error() {
                        state.show_result(form_id, ResultKind::Error, "Error", error);
                    } else {
                        let message = reply.message().unwrap_or(DEFAULT_SUCCESS_MESSAGE);
                        state.show_result(form_id, ResultKind::Success, "Success", message);
                    }
                }
                Err(err) => {
                    toolkit_warn!("Form {} submission failed: {}", form_id, err);
                    state.show_result(form_id, ResultKind::Error, "Error", GENERIC_ERROR_MESSAGE);
                }
            }
            effects.push(restore_effect(&state, form_id));
            effects
        }
        Msg::SubmitButtonRestoreElapsed { form_id } => {
            state.restore_button(form_id);
            Vec::new()
        }
        Msg::TrackRequested { form_id, task_id } => {
            if state.assign_task(form_id, &task_id) {
                vec![Effect::TrackProgress { task_id }]
            } else {
                toolkit_warn!("Cannot track {} for unknown form {}", task_id, form_id);
                Vec::new()
            }
        }
        Msg::ProgressUpdated {
            task_id,
            progress,
            message,
        } => {
            state.apply_progress(&task_id, progress, message.as_deref());
            Vec::new()
        }
        Msg::ResultShown {
            task_id,
            kind,
            title,
            message,
        } => {
            match state.owner_of(&task_id) {
                Some(form_id) => state.show_result(form_id, kind, &title, &message),
                None => toolkit_debug!("Result for untracked task {}", task_id),
            }
            Vec::new()
        }
        Msg::DownloadReady { task_id, href } => {
            if let Some(form_id) = state.owner_of(&task_id) {
                state.show_download(form_id, &href);
            }
            Vec::new()
        }
        Msg::ProgressHidden { task_id } => {
            state.hide_progress(&task_id);
            Vec::new()
        }
        Msg::DragEntered { zone_id } => {
            state.set_drag_active(zone_id, true);
            vec![Effect::SuppressDefault]
        }
        Msg::DragLeft { zone_id } => {
            state.set_drag_active(zone_id, false);
            vec![Effect::SuppressDefault]
        }
        Msg::PageDragged => vec![Effect::SuppressDefault],
        Msg::FilesDropped { zone_id, files } => {
            state.set_drag_active(zone_id, false);
            if state.zone_has_input(zone_id) {
                state.select_file(zone_id, files);
            }
            vec![Effect::SuppressDefault]
        }
        Msg::FileInputChanged { zone_id, files } => {
            if state.zone_has_input(zone_id) {
                state.select_file(zone_id, files);
            }
            Vec::new()
        }
        Msg::ZoneClicked { zone_id } => {
            if state.zone_has_input(zone_id) {
                vec![Effect::OpenFileBrowser { zone_id }]
            } else {
                Vec::new()
            }
        }
        Msg::AlertRequested { message, level } => {
            let alert_id = state.push_alert(level, message);
            vec![Effect::ScheduleAlertDismiss {
                alert_id,
                delay: state.timings().alert_dismiss,
            }]
        }
        Msg::AlertExpired { alert_id } => {
            state.remove_alert(alert_id);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn restore_effect(state: &AppState, form_id: FormId) -> Effect {
    Effect::ScheduleButtonRestore {
        form_id,
        delay: state.timings().button_restore,
    }
}
