// Failure-suppressing scope ("log and continue")
//
// One primitive (`Suppressor::run`) with two adapters: scoped block usage via
// `with_failure_suppressed(prefix).run(..)` and the callable wrapper `suppressed`.
// Every error and every panic inside the scope is reported and discarded. Do not
// wrap code whose failure must stop the process.

use std::fmt::Display;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::warn;

use crate::application::display::{display_safe_for, PlatformFamily};
use crate::application::runner::{execute_guarded, PanicGuardResult};
use crate::port::{DiagnosticSink, StdoutSink};

/// Runs blocks with all failures reported and suppressed
#[derive(Clone)]
pub struct Suppressor {
    prefix: String,
    sink: Arc<dyn DiagnosticSink>,
    platform: PlatformFamily,
}

impl Suppressor {
    /// Report to stdout, formatted for the current platform's console
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            sink: Arc::new(StdoutSink),
            platform: PlatformFamily::current(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_platform(mut self, platform: PlatformFamily) -> Self {
        self.platform = platform;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Run a fallible block; `None` if it returned `Err` or panicked
    ///
    /// # Example
    /// ```text
    /// let cfg = with_failure_suppressed("Loading config").run(|| std::fs::read_to_string(path));
    /// ```
    pub fn run<T, E, F>(&self, block: F) -> Option<T>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        match execute_guarded(AssertUnwindSafe(block)) {
            PanicGuardResult::Success(Ok(value)) => Some(value),
            PanicGuardResult::Success(Err(e)) => {
                self.report(&e.to_string());
                None
            }
            PanicGuardResult::Panicked(msg) => {
                self.report(&msg);
                None
            }
        }
    }

    /// Run a block that can only fail by panicking
    pub fn run_infallible<T, F>(&self, block: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        self.run(|| Ok::<T, std::convert::Infallible>(block()))
    }

    /// "{prefix}: {error}", or just the error when the prefix is empty
    pub fn format_report(&self, error: &str) -> String {
        let line = if self.prefix.is_empty() {
            error.to_string()
        } else {
            format!("{}: {}", self.prefix, error)
        };
        display_safe_for(&line, self.platform)
    }

    fn report(&self, error: &str) {
        warn!(prefix = %self.prefix, error = %error, "Suppressed failure");
        self.sink.emit(&self.format_report(error));
    }
}

/// Scoped form: `with_failure_suppressed("Context").run(|| ...)`
pub fn with_failure_suppressed(prefix: impl Into<String>) -> Suppressor {
    Suppressor::new(prefix)
}

/// Wrap a fallible one-argument callable so its failures are reported and suppressed
pub fn suppressed<A, T, E, F>(prefix: impl Into<String>, f: F) -> impl Fn(A) -> Option<T>
where
    E: Display,
    F: Fn(A) -> Result<T, E>,
{
    suppressed_with(Suppressor::new(prefix), f)
}

/// Like [`suppressed`], with a preconfigured suppressor
pub fn suppressed_with<A, T, E, F>(suppressor: Suppressor, f: F) -> impl Fn(A) -> Option<T>
where
    E: Display,
    F: Fn(A) -> Result<T, E>,
{
    move |arg: A| suppressor.run(|| f(arg))
}
