use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use crate::TaskId;

#[derive(Debug)]
struct PollEntry {
    generation: u64,
    cancel: CancellationToken,
}

/// Active pollers keyed by task id. At most one entry per task.
///
/// Every installation gets a fresh generation number so a poller that was
/// replaced cannot remove its successor's entry.
#[derive(Debug, Default)]
pub struct PollRegistry {
    entries: HashMap<TaskId, PollEntry>,
    next_generation: u64,
}

impl PollRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a poller for `task_id`, cancelling any previous one.
    pub fn install(&mut self, task_id: &str) -> (u64, CancellationToken) {
        if let Some(previous) = self.entries.remove(task_id) {
            previous.cancel.cancel();
        }
        self.next_generation += 1;
        let generation = self.next_generation;
        let cancel = CancellationToken::new();
        self.entries.insert(
            task_id.to_string(),
            PollEntry {
                generation,
                cancel: cancel.clone(),
            },
        );
        (generation, cancel)
    }

    /// Drops the entry if it still belongs to `generation`.
    pub fn release(&mut self, task_id: &str, generation: u64) -> bool {
        match self.entries.get(task_id) {
            Some(entry) if entry.generation == generation => {
                self.entries.remove(task_id);
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self, task_id: &str) -> bool {
        match self.entries.remove(task_id) {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, entry) in self.entries.drain() {
            entry.cancel.cancel();
        }
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.entries.contains_key(task_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
