// System resource probe port (used by the setup check)
// reason: async-trait keeps the port object-safe for Arc<dyn SystemProbe>
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Bytes per GiB (1024 ^ 3)
pub const BYTES_PER_GIB: u64 = 1 << 30;

/// Host hardware snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub cpu_count: usize,
    pub memory_total_bytes: u64,
    pub disk_total_bytes: u64,
    pub disk_free_bytes: u64,
}

impl SystemMetrics {
    pub fn memory_total_gib(&self) -> f64 {
        self.memory_total_bytes as f64 / BYTES_PER_GIB as f64
    }

    pub fn disk_total_gib(&self) -> f64 {
        self.disk_total_bytes as f64 / BYTES_PER_GIB as f64
    }

    /// Used disk space, computed as total - free
    pub fn disk_used_gib(&self) -> f64 {
        self.disk_total_bytes.saturating_sub(self.disk_free_bytes) as f64 / BYTES_PER_GIB as f64
    }
}

/// System probe port for hardware inspection
#[async_trait]
pub trait SystemProbe: Send + Sync {
    /// Get current system metrics
    ///
    /// # Example
    /// ```text
    /// let metrics = probe.get_metrics().await;
    /// println!("{} CPUs", metrics.cpu_count);
    /// ```
    async fn get_metrics(&self) -> SystemMetrics;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock SystemProbe for testing
    pub struct MockSystemProbe {
        metrics: Arc<Mutex<SystemMetrics>>,
    }

    impl MockSystemProbe {
        /// 8 CPUs, 16 GiB RAM, 100 GiB disk of which 40 GiB free
        pub fn new() -> Self {
            Self::with_metrics(SystemMetrics {
                cpu_count: 8,
                memory_total_bytes: 16 * BYTES_PER_GIB,
                disk_total_bytes: 100 * BYTES_PER_GIB,
                disk_free_bytes: 40 * BYTES_PER_GIB,
            })
        }

        pub fn with_metrics(metrics: SystemMetrics) -> Self {
            Self {
                metrics: Arc::new(Mutex::new(metrics)),
            }
        }
    }

    impl Default for MockSystemProbe {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl SystemProbe for MockSystemProbe {
        async fn get_metrics(&self) -> SystemMetrics {
            self.metrics.lock().unwrap().clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gib_conversions() {
        let metrics = SystemMetrics {
            cpu_count: 4,
            memory_total_bytes: 3 * BYTES_PER_GIB / 2,
            disk_total_bytes: 10 * BYTES_PER_GIB,
            disk_free_bytes: 4 * BYTES_PER_GIB,
        };
        assert!((metrics.memory_total_gib() - 1.5).abs() < f64::EPSILON);
        assert!((metrics.disk_total_gib() - 10.0).abs() < f64::EPSILON);
        assert!((metrics.disk_used_gib() - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_disk_used_never_underflows() {
        let metrics = SystemMetrics {
            cpu_count: 1,
            memory_total_bytes: 0,
            disk_total_bytes: 1,
            disk_free_bytes: 2,
        };
        assert_eq!(metrics.disk_used_gib(), 0.0);
    }
}
