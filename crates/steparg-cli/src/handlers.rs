//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod config;
mod convert;
mod probe;
mod utils;

pub use completions::handle_completions;
pub use config::handle_config;
pub use convert::handle_convert;
pub use probe::handle_probe;
