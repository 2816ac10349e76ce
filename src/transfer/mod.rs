//! Photo file transfer
//!
//! A [`FileTransferer`] copies one file from the uploads root into an album
//! directory. Transfers never fail the caller: every problem comes back as
//! [`TransferOutcome::Failed`] so the export can count it and move on.
//!
//! - `rsync` - Archive-mode copy through the external `rsync` program
//! - `native` - In-process copy using the standard library

pub mod native;
pub mod rsync;

pub use native::NativeCopyTransferer;
pub use rsync::{RsyncTransferer, DEFAULT_RSYNC_ARGS};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Result of a single file transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Succeeded,
    Failed(String),
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Succeeded)
    }
}

/// Copies a file from the content store into a directory
pub trait FileTransferer {
    /// Copy `source_root/relative_path` into `destination_dir`, keeping its file name
    fn transfer(
        &self,
        source_root: &Path,
        relative_path: &str,
        destination_dir: &Path,
    ) -> TransferOutcome;
}

impl<T: FileTransferer + ?Sized> FileTransferer for &T {
    fn transfer(
        &self,
        source_root: &Path,
        relative_path: &str,
        destination_dir: &Path,
    ) -> TransferOutcome {
        (**self).transfer(source_root, relative_path, destination_dir)
    }
}

impl<T: FileTransferer + ?Sized> FileTransferer for Box<T> {
    fn transfer(
        &self,
        source_root: &Path,
        relative_path: &str,
        destination_dir: &Path,
    ) -> TransferOutcome {
        (**self).transfer(source_root, relative_path, destination_dir)
    }
}

/// Which transfer implementation to use
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransferMethod {
    /// External `rsync -a`
    #[default]
    Rsync,
    /// Standard library copy
    Copy,
}

impl fmt::Display for TransferMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferMethod::Rsync => write!(f, "rsync"),
            TransferMethod::Copy => write!(f, "copy"),
        }
    }
}

impl std::str::FromStr for TransferMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rsync" => Ok(TransferMethod::Rsync),
            "copy" | "native" => Ok(TransferMethod::Copy),
            other => Err(format!("unknown transfer method '{}'", other)),
        }
    }
}

/// Resolve the source file, refusing paths that escape the uploads root
pub(crate) fn resolve_source(source_root: &Path, relative_path: &str) -> Result<PathBuf, String> {
    let relative = Path::new(relative_path);

    if relative_path.is_empty() {
        return Err("empty source path".to_string());
    }

    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(format!(
                    "source path '{}' is not relative to the uploads root",
                    relative_path
                ))
            }
        }
    }

    Ok(source_root.join(relative))
}
