use std::time::Duration;

use toolkit_core::{update, AlertLevel, AppState, Effect, FormDescriptor, Msg, ResultKind};

fn tracked_state(task_id: &str) -> AppState {
    let descriptor = FormDescriptor {
        id: 7,
        classes: vec!["toolkit-form".to_string()],
        action: Some("/api/image/convert".to_string()),
        submit_label: Some("Convert".to_string()),
        has_progress: true,
        has_result: true,
        ..FormDescriptor::default()
    };
    let (state, _) = update(AppState::new(), Msg::FormRegistered(descriptor));
    let (state, effects) = update(
        state,
        Msg::TrackRequested {
            form_id: 7,
            task_id: task_id.to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::TrackProgress {
            task_id: task_id.to_string()
        }]
    );
    state
}

fn progress(
    state: AppState,
    task_id: &str,
    percent: Option<f64>,
    message: Option<&str>,
) -> AppState {
    let (state, effects) = update(
        state,
        Msg::ProgressUpdated {
            task_id: task_id.to_string(),
            progress: percent,
            message: message.map(str::to_string),
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn track_request_for_unknown_form_is_ignored() {
    let (state, effects) = update(
        AppState::new(),
        Msg::TrackRequested {
            form_id: 1,
            task_id: "abc".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.owner_of("abc"), None);
}

#[test]
fn progress_sets_width_and_default_text() {
    let state = tracked_state("abc");
    let state = progress(state, "abc", Some(42.0), None);

    let view = state.view();
    let bar = view.form(7).unwrap().progress.as_ref().unwrap();
    assert!(bar.visible);
    assert_eq!(bar.width_percent, 42.0);
    assert_eq!(bar.text, "42% complete");
}

#[test]
fn progress_prefers_server_message_and_clamps() {
    let state = tracked_state("abc");
    let state = progress(state, "abc", Some(150.0), Some("Mengonversi..."));

    let view = state.view();
    let bar = view.form(7).unwrap().progress.as_ref().unwrap();
    assert_eq!(bar.width_percent, 100.0);
    assert_eq!(bar.text, "Mengonversi...");
}

#[test]
fn progress_without_percentage_keeps_width() {
    let state = tracked_state("abc");
    let state = progress(state, "abc", Some(42.5), None);
    let state = progress(state, "abc", None, Some("done"));

    let view = state.view();
    let bar = view.form(7).unwrap().progress.as_ref().unwrap();
    assert_eq!(bar.width_percent, 42.5);
    assert_eq!(bar.text, "done");
}

#[test]
fn completed_task_shows_result_download_then_hides() {
    let state = tracked_state("abc");
    let state = progress(state, "abc", Some(42.0), None);
    let (state, _) = update(
        state,
        Msg::ResultShown {
            task_id: "abc".to_string(),
            kind: ResultKind::Success,
            title: "Completed!".to_string(),
            message: "done".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::DownloadReady {
            task_id: "abc".to_string(),
            href: "/download/abc".to_string(),
        },
    );

    let view = state.view();
    let result = view.form(7).unwrap().result.as_ref().unwrap();
    assert_eq!(result.kind, Some(ResultKind::Success));
    assert_eq!(result.title, "Completed!");
    assert_eq!(result.message, "done");
    assert_eq!(result.download_href.as_deref(), Some("/download/abc"));
    assert!(view.form(7).unwrap().progress.as_ref().unwrap().visible);

    let (state, _) = update(
        state,
        Msg::ProgressHidden {
            task_id: "abc".to_string(),
        },
    );
    let view = state.view();
    assert!(!view.form(7).unwrap().progress.as_ref().unwrap().visible);
    assert!(view.tracked_tasks.is_empty());
    assert!(state.is_settled());
}

#[test]
fn download_affordance_added_once() {
    let state = tracked_state("abc");
    let (mut state, _) = update(
        state,
        Msg::DownloadReady {
            task_id: "abc".to_string(),
            href: "/download/abc".to_string(),
        },
    );
    assert!(state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::DownloadReady {
            task_id: "abc".to_string(),
            href: "/download/other".to_string(),
        },
    );

    assert!(!state.consume_dirty());
    let view = state.view();
    let result = view.form(7).unwrap().result.as_ref().unwrap();
    assert_eq!(result.download_href.as_deref(), Some("/download/abc"));
}

#[test]
fn second_result_overwrites_first() {
    let state = tracked_state("abc");
    let (state, _) = update(
        state,
        Msg::ResultShown {
            task_id: "abc".to_string(),
            kind: ResultKind::Success,
            title: "Completed!".to_string(),
            message: "first".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::ResultShown {
            task_id: "abc".to_string(),
            kind: ResultKind::Error,
            title: "Error".to_string(),
            message: "second".to_string(),
        },
    );

    let view = state.view();
    let result = view.form(7).unwrap().result.as_ref().unwrap();
    assert_eq!(result.kind, Some(ResultKind::Error));
    assert_eq!(result.message, "second");
}

#[test]
fn reports_for_untracked_tasks_are_dropped() {
    let state = tracked_state("abc");
    let before = state.view();

    let state = progress(state, "zzz", Some(10.0), None);
    let (state, _) = update(
        state,
        Msg::ResultShown {
            task_id: "zzz".to_string(),
            kind: ResultKind::Error,
            title: "Error".to_string(),
            message: "boom".to_string(),
        },
    );

    assert_eq!(state.view().forms, before.forms);
}

#[test]
fn menu_toggle_flips_sidebar() {
    let (state, _) = update(AppState::new(), Msg::MenuToggled);
    let view = state.view();
    assert!(view.sidebar_collapsed);
    assert!(view.main_expanded);

    let (state, _) = update(state, Msg::MenuToggled);
    assert!(!state.view().sidebar_collapsed);
}

#[test]
fn alerts_schedule_dismissal_and_expire() {
    let (state, effects) = update(
        AppState::new(),
        Msg::AlertRequested {
            message: "Tersalin".to_string(),
            level: AlertLevel::Success,
        },
    );
    assert_eq!(
        effects,
        vec![Effect::ScheduleAlertDismiss {
            alert_id: 1,
            delay: Duration::from_secs(5),
        }]
    );
    assert_eq!(state.view().alerts.len(), 1);
    assert_eq!(state.view().alerts[0].level, AlertLevel::Success);

    let (state, _) = update(state, Msg::AlertExpired { alert_id: 1 });
    assert!(state.view().alerts.is_empty());
}
