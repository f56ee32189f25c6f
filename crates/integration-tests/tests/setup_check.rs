//! Setup check against mock and real system probes

use std::sync::Arc;

use detach_core::application::setup_check::format_summary;
use detach_core::application::SetupCheck;
use detach_core::port::diagnostic_sink::mocks::MemorySink;
use detach_core::port::system_probe::mocks::MockSystemProbe;
use detach_core::port::system_probe::BYTES_PER_GIB;
use detach_core::port::SystemMetrics;
use detach_core::PlatformFamily;
use detach_infra_system::SystemProbeImpl;

#[tokio::test]
async fn test_report_serializes() {
    let sink = Arc::new(MemorySink::new());
    let check = SetupCheck::new(Arc::new(MockSystemProbe::new()))
        .with_sink(sink)
        .with_platform(PlatformFamily::Unix);

    let report = check.run(true).await;
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["metrics"]["cpu_count"], 8);
    assert_eq!(json["summary"], "(8 CPUs, 16.0 GB RAM, 60.0/100.0 GB disk)");
}

#[tokio::test]
async fn test_real_probe_summary_shape() {
    let sink = Arc::new(MemorySink::new());
    let check = SetupCheck::new(Arc::new(SystemProbeImpl::new()))
        .with_sink(sink.clone())
        .with_platform(PlatformFamily::Unix);

    let report = check.run(true).await;

    assert!(report.summary.starts_with('('));
    assert!(report.summary.contains("CPUs"));
    assert!(report.summary.ends_with("GB disk)"));
    assert_eq!(sink.lines()[0], "Checking setup...");
    assert!(sink.lines()[1].starts_with("Setup complete"));
}

#[test]
fn test_summary_uses_gib_with_one_decimal() {
    let metrics = SystemMetrics {
        cpu_count: 2,
        memory_total_bytes: 3 * BYTES_PER_GIB / 2,
        disk_total_bytes: 50 * BYTES_PER_GIB,
        disk_free_bytes: 50 * BYTES_PER_GIB,
    };
    assert_eq!(format_summary(&metrics), "(2 CPUs, 1.5 GB RAM, 0.0/50.0 GB disk)");
}
