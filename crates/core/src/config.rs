// Runner configuration (defaults + environment overrides)

use crate::application::runner::constants::{
    DEFAULT_THREAD_NAME_PREFIX, MIN_STACK_SIZE_BYTES, MAX_THREAD_NAME_PREFIX_LEN,
};
use crate::error::{AppError, Result};

pub const ENV_THREAD_PREFIX: &str = "DETACH_THREAD_PREFIX";
pub const ENV_STACK_SIZE: &str = "DETACH_STACK_SIZE";
pub const ENV_VERBOSE_JOIN: &str = "DETACH_VERBOSE_JOIN";

/// Configuration for [`TaskRunner`](crate::application::runner::TaskRunner)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Prefix for unlabeled thread names ("{prefix}-{n}")
    pub thread_name_prefix: String,
    /// Stack size for spawned threads; None uses the platform default
    pub stack_size: Option<usize>,
    /// Default verbosity for the drain-on-exit guard
    pub verbose_join: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            stack_size: None,
            verbose_join: false,
        }
    }
}

impl RunnerConfig {
    /// Load from process environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup (testable without touching the environment)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(prefix) = lookup(ENV_THREAD_PREFIX) {
            config.thread_name_prefix = prefix;
        }

        if let Some(raw) = lookup(ENV_STACK_SIZE) {
            let size: usize = raw.trim().parse().map_err(|_| {
                AppError::Config(format!("{} must be a byte count, got '{}'", ENV_STACK_SIZE, raw))
            })?;
            config.stack_size = Some(size);
        }

        if let Some(raw) = lookup(ENV_VERBOSE_JOIN) {
            config.verbose_join = parse_bool(&raw).ok_or_else(|| {
                AppError::Config(format!("{} must be a boolean, got '{}'", ENV_VERBOSE_JOIN, raw))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let prefix = &self.thread_name_prefix;
        if prefix.is_empty() {
            return Err(AppError::Config("thread name prefix cannot be empty".to_string()));
        }
        if prefix.len() > MAX_THREAD_NAME_PREFIX_LEN {
            return Err(AppError::Config(format!(
                "thread name prefix too long (max {} chars)",
                MAX_THREAD_NAME_PREFIX_LEN
            )));
        }
        // Thread names must not contain interior NULs
        if prefix.contains('\0') {
            return Err(AppError::Config("thread name prefix contains NUL".to_string()));
        }
        if let Some(size) = self.stack_size {
            if size < MIN_STACK_SIZE_BYTES {
                return Err(AppError::Config(format!(
                    "stack size {} below minimum {}",
                    size, MIN_STACK_SIZE_BYTES
                )));
            }
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RunnerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.thread_name_prefix, DEFAULT_THREAD_NAME_PREFIX);
    }

    #[test]
    fn test_overrides() {
        let config = RunnerConfig::from_lookup(lookup_from(&[
            (ENV_THREAD_PREFIX, "loader"),
            (ENV_STACK_SIZE, "1048576"),
            (ENV_VERBOSE_JOIN, "yes"),
        ]))
        .unwrap();
        assert_eq!(config.thread_name_prefix, "loader");
        assert_eq!(config.stack_size, Some(1_048_576));
        assert!(config.verbose_join);
    }

    #[test]
    fn test_invalid_stack_size() {
        let result = RunnerConfig::from_lookup(lookup_from(&[(ENV_STACK_SIZE, "big")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_stack_size_below_minimum() {
        let result = RunnerConfig::from_lookup(lookup_from(&[(ENV_STACK_SIZE, "16")]));
        assert!(result.unwrap_err().to_string().contains("below minimum"));
    }

    #[test]
    fn test_invalid_bool() {
        let result = RunnerConfig::from_lookup(lookup_from(&[(ENV_VERBOSE_JOIN, "maybe")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let result = RunnerConfig::from_lookup(lookup_from(&[(ENV_THREAD_PREFIX, "")]));
        assert!(result.unwrap_err().to_string().contains("empty"));
    }
}
