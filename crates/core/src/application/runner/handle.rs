// Task Handle - shared view of one launched background task

use std::sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use tracing::{debug, error, warn};

use crate::domain::{TaskId, TaskInfo, TaskOutcome, TaskState};

/// Mutable part of a task, guarded by one mutex so state and outcome change together
struct TaskStatus {
    state: TaskState,
    finished_at: Option<i64>,
    outcome: Option<TaskOutcome>,
}

struct TaskCell {
    id: TaskId,
    label: String,
    launched_at: i64,
    thread_id: OnceLock<ThreadId>,
    status: Mutex<TaskStatus>,
    finished: Condvar,
    join: Mutex<Option<JoinHandle<()>>>,
}

/// Cloneable reference to a launched task
///
/// Held by the registry (for draining) and by the spawned thread (which marks it
/// finished). Dropping every handle does not stop the thread.
#[derive(Clone)]
pub struct TaskHandle {
    inner: Arc<TaskCell>,
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("state", &self.state())
            .finish()
    }
}

impl TaskHandle {
    pub(crate) fn new(id: TaskId, label: String, launched_at: i64) -> Self {
        Self {
            inner: Arc::new(TaskCell {
                id,
                label,
                launched_at,
                thread_id: OnceLock::new(),
                status: Mutex::new(TaskStatus {
                    state: TaskState::Created,
                    finished_at: None,
                    outcome: None,
                }),
                finished: Condvar::new(),
                join: Mutex::new(None),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Thread name of the task
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn launched_at_millis(&self) -> i64 {
        self.inner.launched_at
    }

    pub fn state(&self) -> TaskState {
        self.status().state
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    /// How the runnable ended, once finished
    pub fn outcome(&self) -> Option<TaskOutcome> {
        self.status().outcome.clone()
    }

    pub fn info(&self) -> TaskInfo {
        let status = self.status();
        TaskInfo {
            id: self.inner.id.clone(),
            label: self.inner.label.clone(),
            state: status.state,
            launched_at: self.inner.launched_at,
            finished_at: status.finished_at,
            outcome: status.outcome.clone(),
        }
    }

    pub fn thread_id(&self) -> Option<ThreadId> {
        self.inner.thread_id.get().copied()
    }

    /// True when called from the task's own thread
    pub fn is_current_thread(&self) -> bool {
        self.thread_id() == Some(thread::current().id())
    }

    /// Block until the runnable has returned
    ///
    /// Returns immediately if the task already finished. Called from the task's
    /// own thread it returns without waiting.
    pub fn wait(&self) {
        if self.is_current_thread() {
            warn!(task_id = %self.inner.id, "Task tried to wait on itself, skipping");
            return;
        }

        let mut status = self.status();
        while !status.state.is_terminal() {
            status = self
                .inner
                .finished
                .wait(status)
                .unwrap_or_else(PoisonError::into_inner);
        }
        drop(status);

        // Reap the OS thread; it only has to unwind out of the closure by now
        let join = self
            .inner
            .join
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(join) = join {
            if join.join().is_err() {
                // Runnable panics are caught before this point
                error!(task_id = %self.inner.id, "Task thread terminated abnormally");
            }
        }
    }

    /// Record the spawned thread (called by the launcher after spawn)
    pub(crate) fn attach(&self, join: JoinHandle<()>) {
        self.bind_thread(join.thread().id());
        *self.inner.join.lock().unwrap_or_else(PoisonError::into_inner) = Some(join);
    }

    /// Record the thread id; idempotent, both the launcher and the task call it
    pub(crate) fn bind_thread(&self, id: ThreadId) {
        let _ = self.inner.thread_id.set(id);
    }

    pub(crate) fn mark_running(&self) {
        self.transition(TaskState::Running, None, None);
    }

    pub(crate) fn mark_finished(&self, outcome: TaskOutcome, now_millis: i64) {
        self.transition(TaskState::Finished, Some(outcome), Some(now_millis));
        self.inner.finished.notify_all();
    }

    fn transition(&self, to: TaskState, outcome: Option<TaskOutcome>, now: Option<i64>) {
        let mut status = self.status();
        match status.state.transition(to) {
            Ok(next) => {
                status.state = next;
                if outcome.is_some() {
                    status.outcome = outcome;
                }
                if now.is_some() {
                    status.finished_at = now;
                }
                debug!(task_id = %self.inner.id, state = %next, "Task state changed");
            }
            Err(e) => {
                error!(task_id = %self.inner.id, error = %e, "Rejected task state change");
            }
        }
    }

    fn status(&self) -> MutexGuard<'_, TaskStatus> {
        self.inner
            .status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_lifecycle_and_info() {
        let handle = TaskHandle::new("t1".to_string(), "worker".to_string(), 1_000);
        assert_eq!(handle.state(), TaskState::Created);
        assert!(handle.outcome().is_none());

        handle.mark_running();
        assert_eq!(handle.state(), TaskState::Running);

        handle.mark_finished(TaskOutcome::Completed, 1_500);
        let info = handle.info();
        assert_eq!(info.state, TaskState::Finished);
        assert_eq!(info.finished_at, Some(1_500));
        assert_eq!(info.outcome, Some(TaskOutcome::Completed));
        assert_eq!(info.label, "worker");
    }

    #[test]
    fn test_finish_is_not_repeated() {
        let handle = TaskHandle::new("t1".to_string(), "w".to_string(), 0);
        handle.mark_running();
        handle.mark_finished(TaskOutcome::Completed, 10);
        handle.mark_finished(TaskOutcome::Panicked("late".to_string()), 20);
        assert_eq!(handle.outcome(), Some(TaskOutcome::Completed));
        assert_eq!(handle.info().finished_at, Some(10));
    }

    #[test]
    fn test_wait_on_finished_returns_immediately() {
        let handle = TaskHandle::new("t1".to_string(), "w".to_string(), 0);
        handle.mark_running();
        handle.mark_finished(TaskOutcome::Completed, 0);
        handle.wait();
    }

    #[test]
    fn test_wait_blocks_until_finished() {
        let handle = TaskHandle::new("t1".to_string(), "w".to_string(), 0);
        let task = handle.clone();
        let join = thread::spawn(move || {
            task.mark_running();
            thread::sleep(Duration::from_millis(30));
            task.mark_finished(TaskOutcome::Completed, 0);
        });
        handle.attach(join);

        handle.wait();
        assert!(handle.is_finished());
    }

    #[test]
    fn test_wait_on_own_thread_does_not_block() {
        let handle = TaskHandle::new("t1".to_string(), "w".to_string(), 0);
        handle.bind_thread(thread::current().id());
        handle.mark_running();
        assert!(handle.is_current_thread());
        handle.wait();
        assert_eq!(handle.state(), TaskState::Running);
    }
}
