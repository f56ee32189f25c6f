// Detach Core - Domain Logic & Ports
// NO infrastructure dependencies (hexagonal layout: adapters live in infra crates)

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use application::display::{display_safe, PlatformFamily};
pub use application::runner::{join_all, launch, launch_labeled, TaskRunner};
pub use application::suppress::{suppressed, with_failure_suppressed, Suppressor};
pub use config::RunnerConfig;
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
