//! Failure-suppressing scope and display-safe formatting

use std::sync::Arc;

use detach_core::application::display::display_safe_for;
use detach_core::application::suppress::suppressed_with;
use detach_core::port::diagnostic_sink::mocks::MemorySink;
use detach_core::{display_safe, PlatformFamily, Suppressor};

fn capturing(prefix: &str) -> (Suppressor, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let suppressor = Suppressor::new(prefix)
        .with_sink(sink.clone())
        .with_platform(PlatformFamily::Unix);
    (suppressor, sink)
}

#[test]
fn test_error_in_scope_does_not_propagate() {
    let (suppressor, sink) = capturing("Context");

    let result: Option<u32> = suppressor.run(|| {
        let n: u32 = "not a number".parse()?;
        Ok::<_, std::num::ParseIntError>(n)
    });

    assert!(result.is_none());
    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("Context: "));
    assert!(lines[0].contains("invalid digit"));
}

#[test]
fn test_panic_in_scope_does_not_propagate() {
    let (suppressor, sink) = capturing("Context");
    let result = suppressor.run_infallible(|| {
        let v: Vec<u8> = Vec::new();
        v[3]
    });

    assert!(result.is_none());
    assert_eq!(sink.lines().len(), 1);
    assert!(sink.lines()[0].contains("Context"));
}

#[test]
fn test_wrapped_callable_keeps_going() {
    let sink = Arc::new(MemorySink::new());
    let suppressor = Suppressor::new("Loading")
        .with_sink(sink.clone())
        .with_platform(PlatformFamily::Unix);
    let load = suppressed_with(suppressor, |raw: &str| serde_json::from_str::<serde_json::Value>(raw));

    let parsed: Vec<_> = ["{\"a\":1}", "{broken", "[1,2]"]
        .into_iter()
        .map(|raw| load(raw))
        .collect();

    assert!(parsed[0].is_some());
    assert!(parsed[1].is_none());
    assert!(parsed[2].is_some());
    assert_eq!(sink.lines().len(), 1);
    assert!(sink.lines()[0].starts_with("Loading: "));
}

#[test]
fn test_display_safe_ascii_identity() {
    let s = "Joining thread detach-7";
    assert_eq!(display_safe(s), s);
    assert_eq!(display_safe_for(s, PlatformFamily::Windows), s);
}

#[test]
fn test_display_safe_done_glyph() {
    assert_eq!(display_safe_for("✅ done", PlatformFamily::Windows), " done");
    assert_eq!(display_safe_for("✅ done", PlatformFamily::Unix), "✅ done");
    let expected = if cfg!(windows) { " done" } else { "✅ done" };
    assert_eq!(display_safe("✅ done"), expected);
}
