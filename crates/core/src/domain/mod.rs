// Domain Layer - Pure entities and state rules

pub mod error;
pub mod task;

// Re-exports
pub use error::DomainError;
pub use task::{TaskId, TaskInfo, TaskOutcome, TaskState};
