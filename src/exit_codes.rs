//! Process exit codes shared by every binary.

/// Graceful quit, game over, or interruption.
pub const OK: u8 = 0;
/// Setup failed: no games, terminal unusable, bad config, spawn failure.
pub const FATAL: u8 = 1;
