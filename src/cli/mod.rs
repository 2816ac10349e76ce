//! Command-line interface
//!
//! # Submodules
//!
//! - `args` - Command-line argument definitions using clap
//! - `commands` - Command handler implementations
//! - `progress` - Spinner, console output helpers and the dual log writer

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{Args, Commands};
pub use commands::{apply_cli_overrides, load_config, run_command};
pub use progress::DualWriter;
