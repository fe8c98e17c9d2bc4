use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use toolkit_client::{EngineEvent, EngineHandle, OutcomeKind, RequestId, Submission, SubmissionPart};
use toolkit_core::{Effect, FieldValue, FormId, Msg, ReplyFields, ResultKind, SubmitPayload};
use toolkit_logging::{toolkit_debug, toolkit_info, toolkit_warn};

/// Carries effects out against the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    msg_tx: mpsc::Sender<Msg>,
    next_request: RequestId,
    pending: HashMap<RequestId, FormId>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self {
            engine,
            msg_tx,
            next_request: 1,
            pending: HashMap::new(),
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SuppressDefault => {
                    // nothing to suppress outside a browser
                }
                Effect::Submit {
                    form_id,
                    target,
                    payload,
                } => {
                    let request_id = self.next_request;
                    self.next_request += 1;
                    self.pending.insert(request_id, form_id);
                    toolkit_info!(
                        "Submit form_id={} request_id={} target={}",
                        form_id,
                        request_id,
                        target
                    );
                    self.engine.submit(request_id, to_submission(target, payload));
                }
                Effect::ScheduleButtonRestore { form_id, delay } => {
                    self.send_after(delay, Msg::SubmitButtonRestoreElapsed { form_id });
                }
                Effect::TrackProgress { task_id } => {
                    toolkit_info!("Tracking task {}", task_id);
                    self.engine.track(task_id);
                }
                Effect::OpenFileBrowser { zone_id } => {
                    toolkit_debug!("Zone {} wants a file browser; files come from --file", zone_id);
                }
                Effect::ScheduleAlertDismiss { alert_id, delay } => {
                    self.send_after(delay, Msg::AlertExpired { alert_id });
                }
            }
        }
    }

    /// Waits up to `timeout` for the first engine event, then collects every
    /// other event that has arrived.
    pub fn wait_events(&mut self, timeout: Duration) -> Vec<Msg> {
        let mut msgs = Vec::new();
        let Some(first) = self.engine.recv_timeout(timeout) else {
            return msgs;
        };
        msgs.extend(self.map_event(first));
        while let Some(event) = self.engine.try_recv() {
            if let Some(msg) = self.map_event(event) {
                msgs.push(msg);
            }
        }
        msgs
    }

    fn map_event(&mut self, event: EngineEvent) -> Option<Msg> {
        match event {
            EngineEvent::Submitted { request_id, result } => {
                let Some(form_id) = self.pending.remove(&request_id) else {
                    toolkit_warn!("Reply for unknown request {}", request_id);
                    return None;
                };
                let result = match result {
                    Ok(reply) => Ok(ReplyFields {
                        task_id: reply.task_id,
                        error: reply.error,
                        message: reply.message,
                    }),
                    Err(err) => {
                        toolkit_warn!("Submission for form {} failed: {}", form_id, err);
                        Err(err.to_string())
                    }
                };
                Some(Msg::SubmitCompleted { form_id, result })
            }
            EngineEvent::Progress { task_id, snapshot } => Some(Msg::ProgressUpdated {
                task_id,
                progress: snapshot.progress,
                message: snapshot.message,
            }),
            EngineEvent::Result { task_id, outcome } => Some(Msg::ResultShown {
                task_id,
                kind: match outcome.kind {
                    OutcomeKind::Success => ResultKind::Success,
                    OutcomeKind::Error => ResultKind::Error,
                },
                title: outcome.title,
                message: outcome.message,
            }),
            EngineEvent::Download { task_id, href } => Some(Msg::DownloadReady { task_id, href }),
            EngineEvent::ProgressHidden { task_id } => Some(Msg::ProgressHidden { task_id }),
        }
    }

    fn send_after(&self, delay: Duration, msg: Msg) {
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            let _ = msg_tx.send(msg);
        });
    }
}

fn to_submission(target: String, payload: SubmitPayload) -> Submission {
    match payload {
        SubmitPayload::Json(fields) => Submission::json(target, fields),
        SubmitPayload::Multipart(fields) => Submission::multipart(
            target,
            fields
                .into_iter()
                .map(|field| match field.value {
                    FieldValue::Text(value) => SubmissionPart::Text {
                        name: field.name,
                        value,
                    },
                    FieldValue::File(file) => SubmissionPart::File {
                        name: field.name,
                        file_name: file.name,
                        path: file.path,
                    },
                })
                .collect(),
        ),
    }
}
