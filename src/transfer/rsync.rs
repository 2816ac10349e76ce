//! Transfer through the external `rsync` program

use super::{resolve_source, FileTransferer, TransferOutcome};
use log::{debug, trace};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default arguments: archive mode, preserving times and permissions
pub const DEFAULT_RSYNC_ARGS: &[&str] = &["-a"];

/// Runs `rsync <args> <source> <destination_dir>` for each photo
#[derive(Debug, Clone)]
pub struct RsyncTransferer {
    program: PathBuf,
    args: Vec<String>,
}

impl Default for RsyncTransferer {
    fn default() -> Self {
        Self {
            program: PathBuf::from("rsync"),
            args: DEFAULT_RSYNC_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RsyncTransferer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable (a full path, or a name looked up on PATH)
    pub fn with_program<P: Into<PathBuf>>(mut self, program: P) -> Self {
        self.program = program.into();
        self
    }

    /// Replace the argument list placed before source and destination
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl FileTransferer for RsyncTransferer {
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

        trace!(
            "{} {:?} {} {}",
            self.program.display(),
            self.args,
            source.display(),
            destination_dir.display()
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&source)
            .arg(destination_dir)
            .output();

        match output {
            Ok(output) if output.status.success() => TransferOutcome::Succeeded,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let stderr = stderr.trim();
                debug!("rsync failed for {}: {}", source.display(), stderr);
                if stderr.is_empty() {
                    TransferOutcome::Failed(format!("rsync exited with {}", output.status))
                } else {
                    TransferOutcome::Failed(format!(
                        "rsync exited with {}: {}",
                        output.status, stderr
                    ))
                }
            }
            Err(e) => TransferOutcome::Failed(format!(
                "failed to run '{}': {}",
                self.program.display(),
                e
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let rsync = RsyncTransferer::new();
        assert_eq!(rsync.program(), Path::new("rsync"));
        assert_eq!(rsync.args, vec!["-a".to_string()]);
    }

    #[test]
    fn test_missing_program_is_failure() {
        let temp = TempDir::new().unwrap();
        let rsync = RsyncTransferer::new().with_program("/nonexistent/bin/rsync-not-here");
        let outcome = rsync.transfer(temp.path(), "a.jpg", temp.path());
        match outcome {
            TransferOutcome::Failed(reason) => assert!(reason.contains("failed to run")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_escaping_path_never_spawns() {
        let temp = TempDir::new().unwrap();
        let rsync = RsyncTransferer::new().with_program("/nonexistent/bin/rsync-not-here");
        let outcome = rsync.transfer(temp.path(), "../x.jpg", temp.path());
        match outcome {
            TransferOutcome::Failed(reason) => assert!(reason.contains("not relative")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_decides_outcome() {
        let temp = TempDir::new().unwrap();

        let ok = RsyncTransferer::new().with_program("true").with_args(Vec::<String>::new());
        assert!(ok.transfer(temp.path(), "a.jpg", temp.path()).is_success());

        let failing = RsyncTransferer::new().with_program("false");
        assert!(!failing.transfer(temp.path(), "a.jpg", temp.path()).is_success());
    }
}
