// Constants for the Bare Bones interpreter

/// Largest program, in characters, the source loader accepts
pub const MAX_SOURCE_CHARS: usize = 10_000;

/// History memory budget used when the viewer is enabled (1 GB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 1024 * 1024 * 1024;
