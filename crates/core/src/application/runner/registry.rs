// Process-wide Task Registry

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;

use super::constants::REGISTRY_PRUNE_THRESHOLD;
use super::handle::TaskHandle;

/// Tracks launched tasks until they are confirmed finished
///
/// The lock is only held to push, snapshot or prune, never while waiting on a
/// task, so registration is never blocked by a drain in progress. A handle is
/// only removed once its runnable has returned.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: Mutex<Vec<TaskHandle>>,
}

static GLOBAL_REGISTRY: OnceLock<Arc<TaskRegistry>> = OnceLock::new();

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, created on first use and never reset
    pub fn global() -> Arc<TaskRegistry> {
        Arc::clone(GLOBAL_REGISTRY.get_or_init(|| Arc::new(TaskRegistry::new())))
    }

    pub fn register(&self, handle: TaskHandle) {
        let mut tasks = self.tasks();
        if tasks.len() >= REGISTRY_PRUNE_THRESHOLD {
            let before = tasks.len();
            tasks.retain(|t| !t.is_finished());
            debug!(pruned = before - tasks.len(), "Pruned finished tasks on register");
        }
        tasks.push(handle);
    }

    /// Copy of the current handles, in launch order
    pub fn snapshot(&self) -> Vec<TaskHandle> {
        self.tasks().clone()
    }

    /// Drop finished handles, returning how many were removed
    pub fn prune_finished(&self) -> usize {
        let mut tasks = self.tasks();
        let before = tasks.len();
        tasks.retain(|t| !t.is_finished());
        before - tasks.len()
    }

    /// Number of registered tasks that have not finished
    pub fn outstanding(&self) -> usize {
        self.tasks().iter().filter(|t| !t.is_finished()).count()
    }

    pub fn len(&self) -> usize {
        self.tasks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<TaskHandle>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
