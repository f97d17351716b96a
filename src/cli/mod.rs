// Pose Coach 🚀 MIT License

//! Command-line interface for offline replay and recording inspection.
//!
//! This module contains the argument parsing and the `replay` and
//! `inspect` command implementations.

// Modules
/// CLI arguments.
pub mod args;

/// Logging helpers and verbosity control.
pub mod logging;

/// Replay and inspect commands.
pub mod replay;
