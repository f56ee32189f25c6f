// Background Task Runner - detached threads + drain at exit

pub mod constants;
mod exit_hook;
mod handle;
mod panic_guard;
mod registry;

pub use exit_hook::DrainOnExit;
pub use handle::TaskHandle;
pub use panic_guard::{execute_guarded, panic_message, PanicGuardResult};
pub use registry::TaskRegistry;

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use tracing::{debug, error, info, warn};

use crate::config::RunnerConfig;
use crate::domain::{DomainError, TaskOutcome};
use crate::error::{AppError, Result};
use crate::port::id_provider::UuidProvider;
use crate::port::time_provider::SystemTimeProvider;
use crate::port::{DiagnosticSink, IdProvider, StdoutSink, TimeProvider};

/// Suffix counter for unlabeled thread names, unique per process
static THREAD_COUNTER: AtomicU64 = AtomicU64::new(0);

static GLOBAL_RUNNER: OnceLock<TaskRunner> = OnceLock::new();

/// Launches runnables on detached OS threads and drains them on request
///
/// Cloning is cheap; clones share the registry and providers.
#[derive(Clone)]
pub struct TaskRunner {
    registry: Arc<TaskRegistry>,
    config: RunnerConfig,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    sink: Arc<dyn DiagnosticSink>,
}

impl TaskRunner {
    /// Create a runner over `registry` with production providers
    pub fn new(registry: Arc<TaskRegistry>, config: RunnerConfig) -> Self {
        Self {
            registry,
            config,
            id_provider: Arc::new(UuidProvider),
            time_provider: Arc::new(SystemTimeProvider),
            sink: Arc::new(StdoutSink),
        }
    }

    pub fn with_id_provider(mut self, id_provider: Arc<dyn IdProvider>) -> Self {
        self.id_provider = id_provider;
        self
    }

    pub fn with_time_provider(mut self, time_provider: Arc<dyn TimeProvider>) -> Self {
        self.time_provider = time_provider;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Process-wide runner over [`TaskRegistry::global`], configured from the environment
    pub fn global() -> &'static TaskRunner {
        GLOBAL_RUNNER.get_or_init(|| {
            let config = RunnerConfig::from_env().unwrap_or_else(|e| {
                warn!(error = %e, "Invalid runner configuration, using defaults");
                RunnerConfig::default()
            });
            TaskRunner::new(TaskRegistry::global(), config)
        })
    }

    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Start `runnable` on a new detached thread and return without waiting
    ///
    /// The handle is registered before this returns. Panics inside the runnable
    /// are caught, logged, and recorded on the handle; they never reach the caller.
    ///
    /// # Errors
    /// * `AppError::ResourceExhausted` if the OS cannot create a thread
    /// * `AppError::Domain` if `label` contains a NUL byte
    pub fn launch<F>(&self, runnable: F, label: Option<&str>) -> Result<TaskHandle>
    where
        F: FnOnce() + Send + 'static,
    {
        let label = match label {
            Some(l) if l.contains('\0') => {
                return Err(DomainError::ValidationError(
                    "task label cannot contain NUL bytes".to_string(),
                )
                .into());
            }
            Some(l) => l.to_string(),
            None => {
                let n = THREAD_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
                format!("{}-{}", self.config.thread_name_prefix, n)
            }
        };

        let handle = TaskHandle::new(
            self.id_provider.generate_id(),
            label.clone(),
            self.time_provider.now_millis(),
        );

        let mut builder = thread::Builder::new().name(label.clone());
        if let Some(size) = self.config.stack_size {
            builder = builder.stack_size(size);
        }

        let task = handle.clone();
        let time_provider = Arc::clone(&self.time_provider);
        let join = builder
            .spawn(move || {
                task.bind_thread(thread::current().id());
                task.mark_running();
                let outcome = match execute_guarded(AssertUnwindSafe(runnable)) {
                    PanicGuardResult::Success(()) => TaskOutcome::Completed,
                    PanicGuardResult::Panicked(msg) => {
                        error!(task_id = %task.id(), label = %task.label(), panic_msg = %msg, "Background task failed");
                        TaskOutcome::Panicked(msg)
                    }
                };
                task.mark_finished(outcome, time_provider.now_millis());
            })
            .map_err(|e| {
                AppError::ResourceExhausted(format!("cannot spawn thread '{}': {}", label, e))
            })?;

        handle.attach(join);
        self.registry.register(handle.clone());

        debug!(task_id = %handle.id(), label = %handle.label(), "Task launched");
        Ok(handle)
    }

    /// Wait for every registered, unfinished task except the calling thread's own
    ///
    /// Tasks launched while the drain is in progress may or may not be waited on.
    /// Never fails; with nothing outstanding it returns immediately.
    pub fn join_all(&self, verbose: bool) {
        let current = thread::current().id();
        let pending: Vec<TaskHandle> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|h| {
                if h.thread_id() == Some(current) {
                    debug!(task_id = %h.id(), "Skipping self-join");
                    return false;
                }
                !h.is_finished()
            })
            .collect();
        let joined = pending.len();

        for handle in pending {
            if verbose {
                self.sink.emit(&format!("Joining thread {}", handle.label()));
            }
            handle.wait();
        }

        let pruned = self.registry.prune_finished();
        if joined > 0 {
            info!(joined, pruned, "Background tasks drained");
        } else {
            debug!(pruned, "No background tasks to drain");
        }
    }

    /// Wrap a one-argument callable so that every call launches it in the background
    ///
    /// # Example
    /// ```text
    /// let save = runner.threaded(|path: PathBuf| write_report(&path));
    /// save(PathBuf::from("report.json"))?;
    /// ```
    pub fn threaded<A, F>(&self, f: F) -> impl Fn(A) -> Result<TaskHandle>
    where
        A: Send + 'static,
        F: Fn(A) + Send + Sync + 'static,
    {
        let runner = self.clone();
        let f = Arc::new(f);
        move |arg: A| {
            let f = Arc::clone(&f);
            runner.launch(move || f(arg), None)
        }
    }

    /// Guard that drains all tasks when dropped (register at the top of `main`)
    pub fn drain_on_exit(&self, verbose: bool) -> DrainOnExit {
        DrainOnExit::new(self.clone(), verbose)
    }
}

/// Launch on the process-wide runner
pub fn launch<F>(runnable: F) -> Result<TaskHandle>
where
    F: FnOnce() + Send + 'static,
{
    TaskRunner::global().launch(runnable, None)
}

/// Launch on the process-wide runner with a thread name
pub fn launch_labeled<F>(runnable: F, label: &str) -> Result<TaskHandle>
where
    F: FnOnce() + Send + 'static,
{
    TaskRunner::global().launch(runnable, Some(label))
}

/// Drain the process-wide runner
pub fn join_all(verbose: bool) {
    TaskRunner::global().join_all(verbose);
}
