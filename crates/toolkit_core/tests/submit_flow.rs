use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use pretty_assertions::assert_eq;
use toolkit_core::{
    update, AppState, Effect, FormDescriptor, FormField, Msg, ReplyFields, ResultKind,
    SelectedFile, SubmitPayload, BUSY_LABEL, DEFAULT_SUCCESS_MESSAGE, GENERIC_ERROR_MESSAGE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(toolkit_logging::initialize_for_tests);
}

fn form(id: u64, classes: &[&str]) -> FormDescriptor {
    FormDescriptor {
        id,
        classes: classes.iter().map(|c| c.to_string()).collect(),
        action: Some("/api/video/convert".to_string()),
        data_action: None,
        submit_label: Some("Convert".to_string()),
        has_progress: true,
        has_result: true,
    }
}

fn registered(descriptor: FormDescriptor) -> AppState {
    let (state, _) = update(AppState::new(), Msg::FormRegistered(descriptor));
    state
}

fn submit(state: AppState, form_id: u64, fields: Vec<FormField>) -> (AppState, Vec<Effect>) {
    update(state, Msg::FormSubmitted { form_id, fields })
}

fn complete(state: AppState, form_id: u64, reply: ReplyFields) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::SubmitCompleted {
            form_id,
            result: Ok(reply),
        },
    )
}

#[test]
fn non_toolkit_form_is_left_alone() {
    init_logging();
    let mut state = registered(form(1, &["plain"]));
    state.consume_dirty();

    let (mut next, effects) = submit(state, 1, vec![FormField::text("q", "x")]);

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    let button = next.view().form(1).unwrap().button.clone().unwrap();
    assert!(button.enabled);
}

#[test]
fn unknown_form_is_left_alone() {
    init_logging();
    let (_, effects) = submit(AppState::new(), 42, Vec::new());
    assert!(effects.is_empty());
}

#[test]
fn url_form_submits_json_and_disables_button() {
    init_logging();
    let mut descriptor = form(1, &["toolkit-form", "url-form"]);
    descriptor.action = Some("/api/download".to_string());
    let state = registered(descriptor);

    let (state, effects) = submit(state, 1, vec![FormField::text("url", "http://x")]);

    let mut body = BTreeMap::new();
    body.insert("url".to_string(), "http://x".to_string());
    assert_eq!(
        effects,
        vec![
            Effect::SuppressDefault,
            Effect::Submit {
                form_id: 1,
                target: "/api/download".to_string(),
                payload: SubmitPayload::Json(body),
            },
        ]
    );

    let view = state.view();
    let form = view.form(1).unwrap();
    let button = form.button.as_ref().unwrap();
    assert!(!button.enabled);
    assert_eq!(button.label, BUSY_LABEL);
    let progress = form.progress.as_ref().unwrap();
    assert!(progress.visible);
    assert!(progress.active);
    assert!(!form.result.as_ref().unwrap().visible);
}

#[test]
fn json_body_keeps_last_value_and_skips_files() {
    init_logging();
    let state = registered(form(1, &["toolkit-form", "url-form"]));
    let file = SelectedFile {
        name: "a.mp4".to_string(),
        size: 10,
        path: PathBuf::from("a.mp4"),
    };

    let (_, effects) = submit(
        state,
        1,
        vec![
            FormField::text("quality", "low"),
            FormField::file("file", file),
            FormField::text("quality", "best"),
        ],
    );

    let Some(Effect::Submit {
        payload: SubmitPayload::Json(body),
        ..
    }) = effects.get(1)
    else {
        panic!("expected JSON submit, got {effects:?}");
    };
    assert_eq!(body.len(), 1);
    assert_eq!(body["quality"], "best");
}

#[test]
fn file_form_submits_multipart_with_all_fields() {
    init_logging();
    let state = registered(form(2, &["toolkit-form"]));
    let file = SelectedFile {
        name: "clip.mp4".to_string(),
        size: 2_500_000,
        path: PathBuf::from("/tmp/clip.mp4"),
    };
    let fields = vec![
        FormField::file("file", file),
        FormField::text("format", "webm"),
    ];

    let (_, effects) = submit(state, 2, fields.clone());

    assert_eq!(
        effects[1],
        Effect::Submit {
            form_id: 2,
            target: "/api/video/convert".to_string(),
            payload: SubmitPayload::Multipart(fields),
        }
    );
}

#[test]
fn data_action_used_when_action_missing() {
    init_logging();
    let mut descriptor = form(3, &["toolkit-form"]);
    descriptor.action = None;
    descriptor.data_action = Some("/api/audio/convert".to_string());
    let state = registered(descriptor);

    let (_, effects) = submit(state, 3, Vec::new());

    assert!(matches!(
        &effects[1],
        Effect::Submit { target, .. } if target == "/api/audio/convert"
    ));
}

#[test]
fn missing_target_shows_error_without_request() {
    init_logging();
    let mut descriptor = form(4, &["toolkit-form"]);
    descriptor.action = Some(String::new());
    let state = registered(descriptor);

    let (state, effects) = submit(state, 4, Vec::new());

    assert_eq!(
        effects,
        vec![
            Effect::SuppressDefault,
            Effect::ScheduleButtonRestore {
                form_id: 4,
                delay: Duration::from_secs(1),
            },
        ]
    );
    let result = state.view().form(4).unwrap().result.clone().unwrap();
    assert_eq!(result.kind, Some(ResultKind::Error));
    assert_eq!(result.message, GENERIC_ERROR_MESSAGE);
}

#[test]
fn task_reply_starts_tracking() {
    init_logging();
    let state = registered(form(1, &["toolkit-form", "url-form"]));
    let (state, _) = submit(state, 1, vec![FormField::text("url", "http://x")]);

    let (state, effects) = complete(
        state,
        1,
        ReplyFields {
            task_id: Some("abc".to_string()),
            ..ReplyFields::default()
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::TrackProgress {
                task_id: "abc".to_string()
            },
            Effect::ScheduleButtonRestore {
                form_id: 1,
                delay: Duration::from_secs(1),
            },
        ]
    );
    assert_eq!(state.owner_of("abc"), Some(1));
    assert_eq!(state.view().tracked_tasks, vec!["abc".to_string()]);
    assert!(!state.is_settled());
}

#[test]
fn error_reply_shows_server_error() {
    init_logging();
    let state = registered(form(1, &["toolkit-form"]));
    let (state, _) = submit(state, 1, Vec::new());

    let (state, effects) = complete(
        state,
        1,
        ReplyFields {
            error: Some("Format file tidak valid".to_string()),
            ..ReplyFields::default()
        },
    );

    assert_eq!(effects.len(), 1);
    let result = state.view().form(1).unwrap().result.clone().unwrap();
    assert!(result.visible);
    assert!(result.fade_in);
    assert_eq!(result.kind, Some(ResultKind::Error));
    assert_eq!(result.title, "Error");
    assert_eq!(result.message, "Format file tidak valid");
}

#[test]
fn plain_reply_shows_success_with_default_message() {
    init_logging();
    let state = registered(form(1, &["toolkit-form"]));
    let (state, _) = submit(state, 1, Vec::new());

    let (state, _) = complete(
        state,
        1,
        ReplyFields {
            task_id: Some(String::new()),
            message: Some(String::new()),
            ..ReplyFields::default()
        },
    );

    let result = state.view().form(1).unwrap().result.clone().unwrap();
    assert_eq!(result.kind, Some(ResultKind::Success));
    assert_eq!(result.title, "Success");
    assert_eq!(result.message, DEFAULT_SUCCESS_MESSAGE);
    assert!(state.view().tracked_tasks.is_empty());
}

#[test]
fn transport_failure_shows_generic_error() {
    init_logging();
    let state = registered(form(1, &["toolkit-form"]));
    let (state, _) = submit(state, 1, Vec::new());

    let (state, effects) = update(
        state,
        Msg::SubmitCompleted {
            form_id: 1,
            result: Err("network error: connection refused".to_string()),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::ScheduleButtonRestore {
            form_id: 1,
            delay: Duration::from_secs(1),
        }]
    );
    let result = state.view().form(1).unwrap().result.clone().unwrap();
    assert_eq!(result.message, GENERIC_ERROR_MESSAGE);
}

#[test]
fn button_restores_original_label() {
    init_logging();
    let state = registered(form(1, &["toolkit-form"]));
    let (state, _) = submit(state, 1, Vec::new());
    let (state, _) = complete(state, 1, ReplyFields::default());
    assert!(!state.is_settled());

    let (state, _) = update(state, Msg::SubmitButtonRestoreElapsed { form_id: 1 });

    let button = state.view().form(1).unwrap().button.clone().unwrap();
    assert!(button.enabled);
    assert_eq!(button.label, "Convert");
    assert!(state.is_settled());
}

#[test]
fn form_without_button_waits_for_reply() {
    init_logging();
    let mut descriptor = form(1, &["toolkit-form", "url-form"]);
    descriptor.submit_label = None;
    let state = registered(descriptor);

    let (state, _) = submit(state, 1, vec![FormField::text("url", "http://x")]);
    assert!(state.view().form(1).unwrap().button.is_none());
    assert!(!state.is_settled());

    let (state, _) = update(
        state,
        Msg::SubmitCompleted {
            form_id: 1,
            result: Err("network error: connection refused".to_string()),
        },
    );
    assert!(state.is_settled());
    let result = state.view().form(1).unwrap().result.clone().unwrap();
    assert_eq!(result.kind, Some(ResultKind::Error));
}

#[test]
fn restore_before_reply_keeps_form_unsettled() {
    init_logging();
    let state = registered(form(1, &["toolkit-form"]));
    let (state, _) = submit(state, 1, Vec::new());

    let (state, _) = update(state, Msg::SubmitButtonRestoreElapsed { form_id: 1 });
    assert!(!state.is_settled());

    let (state, _) = complete(state, 1, ReplyFields::default());
    let (state, _) = update(state, Msg::SubmitButtonRestoreElapsed { form_id: 1 });
    assert!(state.is_settled());
}

#[test]
fn empty_label_restores_to_submit() {
    init_logging();
    let mut descriptor = form(1, &["toolkit-form"]);
    descriptor.submit_label = Some(String::new());
    let state = registered(descriptor);
    let (state, _) = submit(state, 1, Vec::new());
    let (state, _) = update(state, Msg::SubmitButtonRestoreElapsed { form_id: 1 });

    let button = state.view().form(1).unwrap().button.clone().unwrap();
    assert_eq!(button.label, "Submit");
}

#[test]
fn new_submission_resets_previous_result() {
    init_logging();
    let state = registered(form(1, &["toolkit-form"]));
    let (state, _) = submit(state, 1, Vec::new());
    let (state, _) = complete(state, 1, ReplyFields::default());
    assert!(state.view().form(1).unwrap().result.as_ref().unwrap().visible);

    let (state, _) = submit(state, 1, Vec::new());

    let result = state.view().form(1).unwrap().result.clone().unwrap();
    assert!(!result.visible);
    assert_eq!(result.kind, None);
    assert!(!result.fade_in);
}
