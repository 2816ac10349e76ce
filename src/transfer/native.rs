//! In-process file copy

use super::{resolve_source, FileTransferer, TransferOutcome};
use log::debug;
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Copies with `std::fs::copy` and carries the modification time over
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCopyTransferer;

impl NativeCopyTransferer {
    pub fn new() -> Self {
        Self
    }

    fn copy_file(source: &Path, destination_dir: &Path) -> io::Result<u64> {
        let file_name = source.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "source path has no file name")
        })?;

        let metadata = fs::metadata(source)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "source is not a regular file",
            ));
        }

        let destination = destination_dir.join(file_name);
        let bytes = fs::copy(source, &destination)?;

        if let Ok(modified) = metadata.modified() {
            File::options()
                .write(true)
                .open(&destination)?
                .set_modified(modified)?;
        }

        Ok(bytes)
    }
}

impl FileTransferer for NativeCopyTransferer {
    fn transfer(
        &self,
        source_root: &Path,
        relative_path: &str,
        destination_dir: &Path,
    ) -> TransferOutcome {
        let source = match resolve_source(source_root, relative_path) {
            Ok(source) => source,
            Err(reason) => return TransferOutcome::Failed(reason),
        };

        match Self::copy_file(&source, destination_dir) {
            Ok(bytes) => {
                debug!("Copied {} ({} bytes)", source.display(), bytes);
                TransferOutcome::Succeeded
            }
            Err(e) => TransferOutcome::Failed(format!(
                "copy of '{}' failed: {}",
                source.display(),
                e
            )),
        }
    }
}
