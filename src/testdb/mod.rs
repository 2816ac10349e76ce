//! Test Database Module
//!
//! In-memory stand-ins for the album store and the file transfer, plus
//! predefined album libraries. They let the whole export pipeline run
//! without a database server or `rsync`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lychee_exporter::core::exporter::{ExportOptions, TreeExporter};
//! use lychee_exporter::core::report::RunReport;
//! use lychee_exporter::testdb::{scenarios, MockTransferer};
//!
//! let scenario = scenarios::trips();
//! let options = ExportOptions::new("/tmp/uploads", "/tmp/export");
//! let mut exporter = TreeExporter::new(&scenario.store, MockTransferer::new(), options);
//! let mut report = RunReport::new();
//! exporter.run(&mut report).unwrap();
//! println!("{}", report);
//! ```
//!
//! # Available Scenarios
//!
//! - `trips` - "Trips" with a nested "Trip/2019" holding one photo
//! - `beach_day` - One photo lacks an original size variant
//! - `summer_collision` - Two sibling "Summer Vacation" albums
//! - `empty` - No albums
//! - `family` - Multi-level tree with one upload file missing

pub mod mock_store;
pub mod scenarios;

pub use mock_store::{MockAlbum, MockAlbumStore, MockPhoto, MockTransferer, TransferCall};
pub use scenarios::Scenario;

/// Print the available scenarios
pub fn print_available_scenarios() {
    println!("Available scenarios:");
    for scenario in scenarios::all() {
        println!("  {:<18} {}", scenario.name, scenario.description);
    }
}
