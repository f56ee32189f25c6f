// Diagnostic Sink Port
// User-facing diagnostic lines ("Joining thread ...", suppressed errors, setup summary)
// go here instead of straight to stdout so tests can capture them.

/// Destination for user-facing diagnostic lines
pub trait DiagnosticSink: Send + Sync {
    /// Emit one line (no trailing newline)
    fn emit(&self, line: &str);
}

/// Standard output sink (production)
pub struct StdoutSink;

impl DiagnosticSink for StdoutSink {
    fn emit(&self, line: &str) {
        println!("{}", line);
    }
}

/// Standard error sink, for runs whose stdout carries machine-readable output
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn emit(&self, line: &str) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Captures emitted lines in memory
    #[derive(Default)]
    pub struct MemorySink {
        lines: Mutex<Vec<String>>,
    }

    impl MemorySink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl DiagnosticSink for MemorySink {
        fn emit(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }
}
