// Runner constants (no magic values)

/// Prefix for unlabeled background threads ("detach-1", "detach-2", ...)
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "detach";

/// Longest accepted thread name prefix
pub const MAX_THREAD_NAME_PREFIX_LEN: usize = 48;

/// Smallest stack size accepted from configuration (64 KiB)
pub const MIN_STACK_SIZE_BYTES: usize = 64 * 1024;

/// Registry size above which finished handles are pruned on registration
pub const REGISTRY_PRUNE_THRESHOLD: usize = 1024;
