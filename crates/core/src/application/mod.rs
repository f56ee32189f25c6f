// Application Layer - Use Cases

pub mod display;
pub mod runner;
pub mod setup_check;
pub mod suppress;

// Re-exports
pub use runner::{DrainOnExit, TaskHandle, TaskRegistry, TaskRunner};
pub use setup_check::{SetupCheck, SetupReport};
pub use suppress::Suppressor;
