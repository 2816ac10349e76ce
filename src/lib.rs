//! Lychee Exporter Library
//!
//! Exports the album tree of a Lychee photo library into nested directories
//! on disk, one directory per album, copying each photo's original file.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`core`] - Configuration, error model, the tree exporter and run report
//! - [`store`] - The album store contract and its SQL implementation
//! - [`transfer`] - File transfer through `rsync` or an in-process copy
//! - [`cli`] - Command-line interface (only used by the binary)
//! - [`testdb`] - In-memory store, recording transferer and sample libraries
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use lychee_exporter::core::config::Config;
//! use lychee_exporter::core::exporter::{ExportOptions, TreeExporter};
//! use lychee_exporter::core::report::RunReport;
//! use lychee_exporter::store::SqlAlbumStore;
//! use lychee_exporter::transfer::RsyncTransferer;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default()?;
//!     let settings = config.validate()?;
//!
//!     let store = SqlAlbumStore::connect(&settings.store_url)?;
//!     let options = ExportOptions::new(&settings.uploads_root, &settings.export_root)
//!         .on_missing_variant(settings.on_missing_variant);
//!
//!     let mut exporter = TreeExporter::new(store, RsyncTransferer::new(), options);
//!     let mut report = RunReport::new();
//!     exporter.run(&mut report)?;
//!     println!("{}", report);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing Without a Database
//!
//! ```rust,no_run
//! use lychee_exporter::testdb::scenarios;
//!
//! for scenario in scenarios::all() {
//!     println!("{}: {}", scenario.name, scenario.description);
//! }
//! ```

pub mod cli;
pub mod core;
pub mod store;
pub mod testdb;
pub mod transfer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
