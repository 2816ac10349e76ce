//! Progress and console output utilities for the CLI
//!
//! The export reports progress through a callback; [`ExportSpinner`] turns
//! those events into a single spinner line and prints failures above it.

use crate::core::exporter::{ExportProgress, ProgressEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

// ============================================================================
// Styles
// ============================================================================

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷")
}

// ============================================================================
// Console output helpers
// ============================================================================

/// Print a header section with a box
pub fn print_header(title: &str) {
    let width = 68;
    let title_padded = format!("{:^width$}", title, width = width - 4);
    println!();
    println!("╔{}╗", "═".repeat(width - 2));
    println!("║ {} ║", title_padded);
    println!("╚{}╝", "═".repeat(width - 2));
    println!();
}

/// Print a success message with checkmark
pub fn print_success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print an info message with bullet
pub fn print_info(msg: &str) {
    println!("  • {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("  ⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    println!("  ✗ {}", msg);
}

// ============================================================================
// Export spinner
// ============================================================================

/// Spinner fed by the exporter's progress callback
///
/// Cloning is cheap; clones drive the same spinner, so one clone can be
/// moved into the callback while the caller keeps another to finish it.
#[derive(Clone)]
pub struct ExportSpinner {
    spinner: ProgressBar,
}

impl ExportSpinner {
    /// Create a spinner drawing to stderr
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner.set_message("Connecting...");
        Self { spinner }
    }

    /// Create a spinner that draws nothing
    pub fn hidden() -> Self {
        Self {
            spinner: ProgressBar::hidden(),
        }
    }

    /// Update the display for one progress event
    pub fn observe(&self, progress: &ExportProgress) {
        match progress.event {
            ProgressEvent::AlbumStarted | ProgressEvent::PhotoTransferred => {
                self.spinner.set_message(format!(
                    "{} | albums: {} | photos: {} | failed: {}",
                    progress.album_title,
                    progress.albums_visited,
                    progress.photos_transferred,
                    progress.photos_failed
                ));
            }
            ProgressEvent::PhotoFailed => {
                self.log_event(&format!(
                    "Photo failed in '{}' ({} failed so far)",
                    progress.album_title, progress.photos_failed
                ));
            }
            ProgressEvent::Finished => {
                self.spinner.set_message("Finishing...");
            }
        }
    }

    /// Print a line above the spinner
    pub fn log_event(&self, msg: &str) {
        self.spinner.suspend(|| {
            println!("  → {}", msg);
        });
    }

    /// Current spinner text
    pub fn message(&self) -> String {
        self.spinner.message()
    }

    /// Stop and remove the spinner
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Default for ExportSpinner {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Formatting helpers
// ============================================================================

/// Format duration to human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

// ============================================================================
// Dual writer for file + console logging
// ============================================================================

/// Log target that writes to stderr and a log file
pub struct DualWriter {
    pub console: std::io::Stderr,
    pub file: std::fs::File,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let _ = self.console.write(buf);
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = self.console.flush();
        self.file.flush()
    }
}
