//! Toolkit configuration module
//!
//! Handles environment variables and toolkit-wide constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
