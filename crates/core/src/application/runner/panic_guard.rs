// Panic isolation for detached tasks and suppressed scopes
use std::any::Any;
use std::panic::{catch_unwind, UnwindSafe};
use tracing::debug;

/// Result of a panic-guarded execution
#[derive(Debug)]
pub enum PanicGuardResult<T> {
    /// Execution completed successfully
    Success(T),
    /// Execution panicked
    Panicked(String),
}

/// Execute a closure with panic isolation
///
/// If the closure panics, the panic is caught and returned as PanicGuardResult::Panicked.
/// This keeps a failing background task from tearing down anything but itself.
///
/// # Example
/// ```text
/// let result = execute_guarded(|| {
///     // This panic will be caught
///     panic!("test panic");
/// });
///
/// match result {
///     PanicGuardResult::Panicked(msg) => {
///         println!("Caught panic: {}", msg);
///     }
///     _ => {}
/// }
/// ```
pub fn execute_guarded<F, T>(f: F) -> PanicGuardResult<T>
where
    F: FnOnce() -> T + UnwindSafe,
{
    match catch_unwind(f) {
        Ok(result) => PanicGuardResult::Success(result),
        Err(payload) => {
            let panic_msg = panic_message(payload.as_ref());
            // Callers report the failure at their own level (task failure, suppressed error)
            debug!(panic_msg = %panic_msg, "Guarded closure panicked");
            PanicGuardResult::Panicked(panic_msg)
        }
    }
}

/// Extract a readable message from a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_value_through() {
        match execute_guarded(|| 21 * 2) {
            PanicGuardResult::Success(v) => assert_eq!(v, 42),
            PanicGuardResult::Panicked(msg) => panic!("unexpected panic: {}", msg),
        }
    }

    #[test]
    fn test_str_panic_is_caught() {
        let result = execute_guarded(|| -> () { panic!("boom") });
        assert!(matches!(result, PanicGuardResult::Panicked(ref m) if m == "boom"));
    }

    #[test]
    fn test_formatted_panic_is_caught() {
        let result = execute_guarded(|| -> () { panic!("bad value: {}", 7) });
        assert!(matches!(result, PanicGuardResult::Panicked(ref m) if m == "bad value: 7"));
    }

    #[test]
    fn test_unknown_payload() {
        let result = execute_guarded(|| -> () { std::panic::panic_any(17_u8) });
        assert!(matches!(result, PanicGuardResult::Panicked(ref m) if m == "Unknown panic"));
    }
}
