//! CLI module - Command-line interface for the demo binary.
//!
//! Provides commands for:
//! - `serve` - Start the demo HTTP server
//! - `check` - Verify connectivity to every configured backend

pub mod args;

pub use args::{Cli, Commands};
