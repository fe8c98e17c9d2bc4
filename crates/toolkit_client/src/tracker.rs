use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use toolkit_logging::{toolkit_debug, toolkit_info, toolkit_warn};

use crate::{Outcome, PollRegistry, ProgressSnapshot, TaskId, TaskStatus, ToolkitApi};

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub poll_interval: Duration,
    /// How long the progress indicator stays up after completion.
    pub hide_delay: Duration,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            hide_delay: Duration::from_secs(2),
        }
    }
}

/// Display side of progress tracking.
pub trait ProgressRenderer: Send + Sync {
    fn set_progress(&self, task_id: &str, snapshot: &ProgressSnapshot);
    fn show_result(&self, task_id: &str, outcome: Outcome);
    fn show_download(&self, task_id: &str, href: &str);
    fn hide_progress(&self, task_id: &str);
}

/// Polls task progress until a terminal status, one poller per task.
#[derive(Clone)]
pub struct ProgressTracker {
    api: Arc<dyn ToolkitApi>,
    settings: TrackerSettings,
    registry: Arc<Mutex<PollRegistry>>,
}

impl ProgressTracker {
    pub fn new(api: Arc<dyn ToolkitApi>, settings: TrackerSettings) -> Self {
        Self {
            api,
            settings,
            registry: Arc::new(Mutex::new(PollRegistry::new())),
        }
    }

    /// Starts polling `task_id`, replacing any poller already following it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn track(
        &self,
        task_id: impl Into<TaskId>,
        renderer: Arc<dyn ProgressRenderer>,
    ) -> JoinHandle<()> {
        let task_id = task_id.into();
        let (generation, cancel) = self.registry().install(&task_id);
        toolkit_info!("Tracking task {} (generation {})", task_id, generation);

        let poll = PollTask {
            api: self.api.clone(),
            registry: self.registry.clone(),
            renderer,
            settings: self.settings.clone(),
            task_id,
            generation,
            cancel,
        };
        tokio::spawn(poll.run())
    }

    pub fn cancel(&self, task_id: &str) -> bool {
        self.registry().cancel(task_id)
    }

    pub fn is_tracking(&self, task_id: &str) -> bool {
        self.registry().contains(task_id)
    }

    pub fn active_count(&self) -> usize {
        self.registry().len()
    }

    pub fn shutdown(&self) {
        self.registry().cancel_all();
    }

    fn registry(&self) -> MutexGuard<'_, PollRegistry> {
        lock(&self.registry)
    }
}

fn lock(registry: &Mutex<PollRegistry>) -> MutexGuard<'_, PollRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

struct PollTask {
    api: Arc<dyn ToolkitApi>,
    registry: Arc<Mutex<PollRegistry>>,
    renderer: Arc<dyn ProgressRenderer>,
    settings: TrackerSettings,
    task_id: TaskId,
    generation: u64,
    cancel: CancellationToken,
}

impl PollTask {
    async fn run(self) {
        // The first tick fires immediately. A tick is fully handled before the
        // next one is awaited, so requests for one task never overlap.
        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                _ = self.cancel.cancelled() => break,
                result = self.api.progress(&self.task_id) => result,
            };

            let snapshot = match result {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    toolkit_warn!("Progress check for {} failed: {}", self.task_id, err);
                    continue;
                }
            };

            self.renderer.set_progress(&self.task_id, &snapshot);
            if snapshot.status.is_terminal() {
                self.finish(snapshot).await;
                return;
            }
        }

        toolkit_debug!("Poller for {} cancelled", self.task_id);
    }

    async fn finish(&self, snapshot: ProgressSnapshot) {
        lock(&self.registry).release(&self.task_id, self.generation);
        let message = snapshot.message.unwrap_or_default();

        match snapshot.status {
            TaskStatus::Completed => {
                toolkit_info!("Task {} completed", self.task_id);
                self.renderer
                    .show_result(&self.task_id, Outcome::success("Completed!", message));
                self.renderer
                    .show_download(&self.task_id, &self.api.download_href(&self.task_id));
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep(self.settings.hide_delay) => {
                        self.renderer.hide_progress(&self.task_id);
                    }
                }
            }
            _ => {
                toolkit_warn!("Task {} failed: {}", self.task_id, message);
                self.renderer
                    .show_result(&self.task_id, Outcome::error("Error", message));
                self.renderer.hide_progress(&self.task_id);
            }
        }
    }
}
