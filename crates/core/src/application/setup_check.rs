// Setup Check - best-effort environment summary printed at startup
//
// Prints "Checking setup..." and then "Setup complete ✅ (N CPUs, X GB RAM, U/T GB disk)".
// Never fails: a probe that hangs past the timeout just drops the hardware summary.
// The probe runs on its own detached thread, so one that blocks instead of yielding
// cannot hold the caller past the timeout either.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::application::display::{display_safe_for, PlatformFamily};
use crate::port::{DiagnosticSink, StdoutSink, SystemMetrics, SystemProbe};

/// How long to wait for hardware metrics before giving up
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a setup check
#[derive(Debug, Clone, Serialize)]
pub struct SetupReport {
    /// None when not verbose or when the probe timed out
    pub metrics: Option<SystemMetrics>,
    /// "(8 CPUs, 15.5 GB RAM, 60.0/100.0 GB disk)" or empty
    pub summary: String,
}

pub struct SetupCheck {
    probe: Arc<dyn SystemProbe>,
    sink: Arc<dyn DiagnosticSink>,
    platform: PlatformFamily,
    timeout: Duration,
}

impl SetupCheck {
    pub fn new(probe: Arc<dyn SystemProbe>) -> Self {
        Self {
            probe,
            sink: Arc::new(StdoutSink),
            platform: PlatformFamily::current(),
            timeout: PROBE_TIMEOUT,
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

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the check, printing progress to the sink
    pub async fn run(&self, verbose: bool) -> SetupReport {
        self.sink.emit("Checking setup...");

        let metrics = if verbose { self.collect_metrics().await } else { None };

        let summary = metrics.as_ref().map(format_summary).unwrap_or_default();
        let line = format!("Setup complete ✅ {}", summary);
        self.sink.emit(&display_safe_for(&line, self.platform));

        info!(summary = %summary, "Setup check finished");
        SetupReport { metrics, summary }
    }
}

impl SetupCheck {
    /// Metrics from the probe, or None if it does not answer within the timeout
    async fn collect_metrics(&self) -> Option<SystemMetrics> {
        let (tx, rx) = oneshot::channel();
        let probe = Arc::clone(&self.probe);

        let spawned = std::thread::Builder::new()
            .name("setup-check".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        warn!(error = %e, "Could not start runtime for system probe");
                        return;
                    }
                };
                // Receiver is gone once the check has timed out
                let _ = tx.send(runtime.block_on(probe.get_metrics()));
            });
        if let Err(e) = spawned {
            warn!(error = %e, "Could not spawn system probe thread");
            return None;
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(metrics)) => Some(metrics),
            Ok(Err(_)) => {
                debug!("System probe thread exited without metrics");
                None
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "System probe timed out");
                None
            }
        }
    }
}

/// "(8 CPUs, 16.0 GB RAM, 60.0/100.0 GB disk)"
pub fn format_summary(metrics: &SystemMetrics) -> String {
    format!(
        "({} CPUs, {:.1} GB RAM, {:.1}/{:.1} GB disk)",
        metrics.cpu_count,
        metrics.memory_total_gib(),
        metrics.disk_used_gib(),
        metrics.disk_total_gib()
    )
}
