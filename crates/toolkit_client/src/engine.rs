use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use toolkit_logging::toolkit_error;

use crate::{
    ClientError, ClientSettings, Outcome, ProgressRenderer, ProgressSnapshot, ProgressTracker,
    ReqwestApi, Submission, SubmitReply, TaskId, ToolkitApi, TrackerSettings,
};

/// Caller-chosen id echoed back with the submission result.
pub type RequestId = u64;

enum EngineCommand {
    Submit {
        request_id: RequestId,
        submission: Submission,
    },
    Track {
        task_id: TaskId,
    },
    Cancel {
        task_id: TaskId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Submitted {
        request_id: RequestId,
        result: Result<SubmitReply, ClientError>,
    },
    Progress {
        task_id: TaskId,
        snapshot: ProgressSnapshot,
    },
    Result {
        task_id: TaskId,
        outcome: Outcome,
    },
    Download {
        task_id: TaskId,
        href: String,
    },
    ProgressHidden {
        task_id: TaskId,
    },
}

/// Runs submissions and progress tracking on a background runtime.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(client: ClientSettings, tracker: TrackerSettings) -> Result<Self, ClientError> {
        let api: Arc<dyn ToolkitApi> = Arc::new(ReqwestApi::new(client)?);
        Ok(Self::with_api(api, tracker))
    }

    pub fn with_api(api: Arc<dyn ToolkitApi>, settings: TrackerSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    toolkit_error!("Could not start engine runtime: {}", err);
                    return;
                }
            };
            let _guard = runtime.enter();
            let tracker = ProgressTracker::new(api.clone(), settings);
            let renderer: Arc<dyn ProgressRenderer> =
                Arc::new(ChannelRenderer::new(event_tx.clone()));

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Submit {
                        request_id,
                        submission,
                    } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = api.submit(&submission).await;
                            let _ = event_tx.send(EngineEvent::Submitted { request_id, result });
                        });
                    }
                    EngineCommand::Track { task_id } => {
                        tracker.track(task_id, renderer.clone());
                    }
                    EngineCommand::Cancel { task_id } => {
                        tracker.cancel(&task_id);
                    }
                }
            }
            tracker.shutdown();
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, request_id: RequestId, submission: Submission) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            request_id,
            submission,
        });
    }

    pub fn track(&self, task_id: impl Into<TaskId>) {
        let _ = self.cmd_tx.send(EngineCommand::Track {
            task_id: task_id.into(),
        });
    }

    pub fn cancel(&self, task_id: impl Into<TaskId>) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel {
            task_id: task_id.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

/// Forwards renderer calls as engine events.
struct ChannelRenderer {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelRenderer {
    fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressRenderer for ChannelRenderer {
    fn set_progress(&self, task_id: &str, snapshot: &ProgressSnapshot) {
        let _ = self.tx.send(EngineEvent::Progress {
            task_id: task_id.to_string(),
            snapshot: snapshot.clone(),
        });
    }

    fn show_result(&self, task_id: &str, outcome: Outcome) {
        let _ = self.tx.send(EngineEvent::Result {
            task_id: task_id.to_string(),
            outcome,
        });
    }

    fn show_download(&self, task_id: &str, href: &str) {
        let _ = self.tx.send(EngineEvent::Download {
            task_id: task_id.to_string(),
            href: href.to_string(),
        });
    }

    fn hide_progress(&self, task_id: &str) {
        let _ = self.tx.send(EngineEvent::ProgressHidden {
            task_id: task_id.to_string(),
        });
    }
}
