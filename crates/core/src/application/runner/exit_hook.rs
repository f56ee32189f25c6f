// Drain-at-exit guard
//
// Hold one in `main`; when it goes out of scope (normal return or unwind) every
// outstanding background task is joined before the process tears down.

use tracing::debug;

use super::TaskRunner;

/// Runs [`TaskRunner::join_all`] when dropped
#[must_use = "the drain runs when this guard is dropped"]
pub struct DrainOnExit {
    runner: TaskRunner,
    verbose: bool,
    armed: bool,
}

impl DrainOnExit {
    pub(crate) fn new(runner: TaskRunner, verbose: bool) -> Self {
        Self {
            runner,
            verbose,
            armed: true,
        }
    }

    /// Drop the guard without draining
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for DrainOnExit {
    fn drop(&mut self) {
        if self.armed {
            debug!(verbose = self.verbose, "Draining background tasks at exit");
            self.runner.join_all(self.verbose);
        }
    }
}
