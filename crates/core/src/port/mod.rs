// Port Layer - Interfaces for external dependencies

pub mod diagnostic_sink;
pub mod id_provider; // For deterministic testing
pub mod system_probe;
pub mod time_provider;

// Re-exports
pub use diagnostic_sink::{DiagnosticSink, StderrSink, StdoutSink};
pub use id_provider::IdProvider;
pub use system_probe::{SystemMetrics, SystemProbe};
pub use time_provider::TimeProvider;
