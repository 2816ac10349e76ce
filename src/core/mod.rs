//! Core functionality module
//!
//! The export itself and everything it needs: configuration, the error
//! model, title sanitizing, the run report and the first-run wizard.
//!
//! # Submodules
//!
//! - `config` - Configuration loading, saving, and validation
//! - `error` - Export error type and severity policy
//! - `exporter` - Album tree walk and photo transfer
//! - `report` - Per-run counters and failure list
//! - `sanitize` - Album title to directory name mapping
//! - `setup` - Interactive first-run configuration

pub mod config;
pub mod error;
pub mod exporter;
pub mod report;
pub mod sanitize;
pub mod setup;
