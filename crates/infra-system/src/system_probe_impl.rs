// System probe implementation
// reason: sysinfo for cross-platform hardware inspection
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use sysinfo::{Disk, Disks, System};
use tracing::{debug, warn};

use detach_core::port::system_probe::{SystemMetrics, SystemProbe};

/// System probe implementation using sysinfo
///
/// The sysinfo calls block (disk enumeration can stall on network mounts), so
/// they run on tokio's blocking pool and the returned future yields meanwhile.
pub struct SystemProbeImpl {
    system: Arc<Mutex<System>>,
}

impl SystemProbeImpl {
    /// Create a new system probe
    ///
    /// # Example
    /// ```ignore
    /// let probe = SystemProbeImpl::new();
    /// ```
    pub fn new() -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
        }
    }
}

impl Default for SystemProbeImpl {
    fn default() -> Self {
        Self::new()
    }
}

/// Disk holding the root filesystem, or the first disk if none is mounted at "/"
fn root_disk(disks: &Disks) -> Option<&Disk> {
    disks
        .iter()
        .find(|d| d.mount_point() == Path::new("/"))
        .or_else(|| disks.iter().next())
}

/// Logical CPUs from the OS, like os.cpu_count()
fn fallback_cpu_count() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

/// Blocking part of the probe
fn collect_metrics(system: &Mutex<System>) -> SystemMetrics {
    let mut sys = system.lock().unwrap_or_else(PoisonError::into_inner);

    sys.refresh_cpu();
    sys.refresh_memory();

    let cpu_count = match sys.cpus().len() {
        0 => fallback_cpu_count(),
        n => n,
    };
    let memory_total_bytes = sys.total_memory();
    drop(sys);

    let disks = Disks::new_with_refreshed_list();
    let (disk_total_bytes, disk_free_bytes) = root_disk(&disks)
        .map(|d| (d.total_space(), d.available_space()))
        .unwrap_or((0, 0));

    debug!(
        cpus = cpu_count,
        mem_total_bytes = memory_total_bytes,
        disk_total_bytes = disk_total_bytes,
        disk_free_bytes = disk_free_bytes,
        "System metrics collected"
    );

    SystemMetrics {
        cpu_count,
        memory_total_bytes,
        disk_total_bytes,
        disk_free_bytes,
    }
}

#[async_trait]
impl SystemProbe for SystemProbeImpl {
    async fn get_metrics(&self) -> SystemMetrics {
        let system = Arc::clone(&self.system);
        match tokio::task::spawn_blocking(move || collect_metrics(&system)).await {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!(error = %e, "System probe task failed, reporting CPU count only");
                SystemMetrics {
                    cpu_count: fallback_cpu_count(),
                    memory_total_bytes: 0,
                    disk_total_bytes: 0,
                    disk_free_bytes: 0,
                }
            }
        }
    }
}
