//! Album tree export
//!
//! Walks the album forest from the store and mirrors it on disk: one
//! directory per album, named from its sanitized title and nested under its
//! parent's directory, holding a copy of each photo's original file.
//!
//! The walk uses an explicit stack of `(album, destination)` pairs rather
//! than recursion, so tree depth is bounded by memory, not the call stack.
//! Depth-first order is kept: an album's directory always exists before any
//! of its children are visited.
//!
//! # Example
//!
//! ```rust,no_run
//! use lychee_exporter::core::exporter::{ExportOptions, TreeExporter};
//! use lychee_exporter::core::report::RunReport;
//! use lychee_exporter::testdb::{MockAlbumStore, MockTransferer};
//!
//! let store = MockAlbumStore::new()
//!     .with_album("1", None, Some("Trips"))
//!     .with_photo("p1", "1", Some("original/p1.jpg"));
//!
//! let options = ExportOptions::new("/srv/lychee/uploads", "/tmp/export");
//! let mut exporter = TreeExporter::new(&store, MockTransferer::new(), options);
//! let mut report = RunReport::new();
//! exporter.run(&mut report).unwrap();
//! ```

use crate::core::config::MissingVariantPolicy;
use crate::core::error::{ExportError, Result, Severity};
use crate::core::report::RunReport;
use crate::core::sanitize::{is_usable_segment, sanitize};
use crate::store::{Album, AlbumId, AlbumStore, PhotoId, StoreError};
use crate::transfer::{FileTransferer, TransferOutcome};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

// =============================================================================
// Options
// =============================================================================

/// Settings for one export run
pub struct ExportOptions {
    /// Root the store's relative file paths are resolved against
    pub uploads_root: PathBuf,
    /// Directory receiving the root albums
    pub export_root: PathBuf,
    /// What to do with a photo that has no original file variant
    pub on_missing_variant: MissingVariantPolicy,
    /// Callback for progress updates
    pub progress_callback: Option<Arc<dyn Fn(ExportProgress) + Send + Sync>>,
}

impl std::fmt::Debug for ExportOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportOptions")
            .field("uploads_root", &self.uploads_root)
            .field("export_root", &self.export_root)
            .field("on_missing_variant", &self.on_missing_variant)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Clone for ExportOptions {
    fn clone(&self) -> Self {
        Self {
            uploads_root: self.uploads_root.clone(),
            export_root: self.export_root.clone(),
            on_missing_variant: self.on_missing_variant,
            progress_callback: self.progress_callback.clone(),
        }
    }
}

impl ExportOptions {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(uploads_root: P, export_root: Q) -> Self {
        Self {
            uploads_root: uploads_root.as_ref().to_path_buf(),
            export_root: export_root.as_ref().to_path_buf(),
            on_missing_variant: MissingVariantPolicy::default(),
            progress_callback: None,
        }
    }

    /// Set the missing-variant policy
    pub fn on_missing_variant(mut self, policy: MissingVariantPolicy) -> Self {
        self.on_missing_variant = policy;
        self
    }

    /// Set progress callback
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ExportProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }
}

// =============================================================================
// Progress
// =============================================================================

/// What just happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    AlbumStarted,
    PhotoTransferred,
    PhotoFailed,
    Finished,
}

/// Progress update information
#[derive(Debug, Clone)]
pub struct ExportProgress {
    pub event: ProgressEvent,
    /// Title of the album being exported
    pub album_title: String,
    pub albums_visited: usize,
    pub photos_transferred: usize,
    pub photos_failed: usize,
}

// =============================================================================
// Exporter
// =============================================================================

/// Exports the album tree of an [`AlbumStore`] to the filesystem
pub struct TreeExporter<S, T> {
    store: S,
    transferer: T,
    options: ExportOptions,
    /// Directories created by this run and the album that owns each
    created_dirs: HashMap<PathBuf, AlbumId>,
}

impl<S: AlbumStore, T: FileTransferer> TreeExporter<S, T> {
    pub fn new(store: S, transferer: T, options: ExportOptions) -> Self {
        Self {
            store,
            transferer,
            options,
            created_dirs: HashMap::new(),
        }
    }

    /// Export every root album (and everything below it) into the export root
    ///
    /// Counts go into `report` as work completes, so after a fatal error the
    /// report reflects exactly what was done before the abort and carries
    /// the cause.
    pub fn run(&mut self, report: &mut RunReport) -> Result<()> {
        let start = Instant::now();
        let result = self.export_forest(report);
        report.finalize(start.elapsed());

        match result {
            Ok(()) => {
                report.mark_completed();
                self.report_progress(ProgressEvent::Finished, "", report);
                Ok(())
            }
            Err(err) => {
                report.mark_aborted(err.to_string());
                Err(err)
            }
        }
    }

    fn export_forest(&mut self, report: &mut RunReport) -> Result<()> {
        let roots = self.store.root_albums().map_err(ExportError::RootAlbums)?;
        info!("Found {} root album(s)", roots.len());

        let export_root = self.options.export_root.clone();
        self.export_albums(roots, &export_root, report)
    }

    /// Export the subtree rooted at `album_id` into `destination`
    pub fn export_subtree(
        &mut self,
        album_id: &AlbumId,
        destination: &Path,
        report: &mut RunReport,
    ) -> Result<()> {
        let album = Album {
            id: album_id.clone(),
            parent_id: None,
        };
        self.export_albums(vec![album], destination, report)
    }

    fn export_albums(
        &mut self,
        albums: Vec<Album>,
        destination: &Path,
        report: &mut RunReport,
    ) -> Result<()> {
        // Reversed so the first album of each listing is popped first.
        let mut pending: Vec<(AlbumId, PathBuf)> = albums
            .into_iter()
            .rev()
            .map(|album| (album.id, destination.to_path_buf()))
            .collect();

        while let Some((album_id, parent_dir)) = pending.pop() {
            let (album_dir, children) = self.export_album(&album_id, &parent_dir, report)?;
            pending.extend(
                children
                    .into_iter()
                    .rev()
                    .map(|child| (child.id, album_dir.clone())),
            );
        }

        Ok(())
    }

    /// Materialize one album and its photos; returns its directory and children
    fn export_album(
        &mut self,
        album_id: &AlbumId,
        parent_dir: &Path,
        report: &mut RunReport,
    ) -> Result<(PathBuf, Vec<Album>)> {
        report.record_album();

        let title = self
            .store
            .album_title(album_id)
            .map_err(|source| store_error(album_id, source))?;

        let segment = sanitize(&title);
        if !is_usable_segment(&segment) {
            return Err(ExportError::InvalidDirectoryName {
                album_id: album_id.clone(),
                title,
            });
        }

        let album_dir = parent_dir.join(&segment);
        info!("Exporting album '{}' -> {}", title, album_dir.display());
        self.create_album_dir(album_id, &album_dir)?;
        self.report_progress(ProgressEvent::AlbumStarted, &title, report);

        let photos = self
            .store
            .photos_of(album_id)
            .map_err(|source| store_error(album_id, source))?;
        debug!("Album '{}' has {} photo(s)", album_id, photos.len());

        for photo_id in photos {
            match self.export_photo(album_id, &photo_id, &album_dir) {
                Ok(()) => {
                    report.record_transferred();
                    self.report_progress(ProgressEvent::PhotoTransferred, &title, report);
                }
                Err(err) => match self.severity_of(&err) {
                    Severity::Fatal => return Err(err),
                    Severity::Recoverable => {
                        warn!("{}", err);
                        report.record_failed(photo_id, album_id.clone(), err.to_string());
                        self.report_progress(ProgressEvent::PhotoFailed, &title, report);
                    }
                },
            }
        }

        let children = self
            .store
            .child_albums(album_id)
            .map_err(|source| store_error(album_id, source))?;

        Ok((album_dir, children))
    }

    fn export_photo(&self, album_id: &AlbumId, photo_id: &PhotoId, album_dir: &Path) -> Result<()> {
        let relative_path = self
            .store
            .canonical_file_path(photo_id)
            .map_err(|source| match source {
                StoreError::MissingVariant(_) => ExportError::MissingVariant {
                    album_id: album_id.clone(),
                    photo_id: photo_id.clone(),
                    source,
                },
                other => store_error(album_id, other),
            })?;

        debug!(
            "Photo path: {}",
            self.options.uploads_root.join(&relative_path).display()
        );

        match self
            .transferer
            .transfer(&self.options.uploads_root, &relative_path, album_dir)
        {
            TransferOutcome::Succeeded => Ok(()),
            TransferOutcome::Failed(reason) => Err(ExportError::Transfer {
                photo_id: photo_id.clone(),
                destination: album_dir.to_path_buf(),
                reason,
            }),
        }
    }

    fn create_album_dir(&mut self, album_id: &AlbumId, path: &Path) -> Result<()> {
        if let Some(existing) = self.created_dirs.get(path) {
            return Err(ExportError::DirectoryCollision {
                path: path.to_path_buf(),
                album_id: album_id.clone(),
                existing: existing.clone(),
            });
        }

        if let Err(source) = fs::create_dir(path) {
            // Case-insensitive filesystems report a sibling that differs only
            // in case as an existing entry.
            if source.kind() == io::ErrorKind::AlreadyExists {
                if let Some(existing) = self.sibling_differing_in_case(path) {
                    return Err(ExportError::DirectoryCollision {
                        path: path.to_path_buf(),
                        album_id: album_id.clone(),
                        existing: existing.clone(),
                    });
                }
            }
            return Err(ExportError::CreateDirectory {
                path: path.to_path_buf(),
                album_id: album_id.clone(),
                source,
            });
        }

        self.created_dirs.insert(path.to_path_buf(), album_id.clone());
        Ok(())
    }

    /// Album owning a directory created this run next to `path` whose name
    /// matches ignoring case
    fn sibling_differing_in_case(&self, path: &Path) -> Option<&AlbumId> {
        let parent = path.parent()?;
        let name = path.file_name()?.to_string_lossy().to_lowercase();

        self.created_dirs.iter().find_map(|(created, owner)| {
            let same_parent = created.parent() == Some(parent);
            let same_name = created
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase() == name)
                .unwrap_or(false);
            (same_parent && same_name).then_some(owner)
        })
    }

    /// The run's policy for an error, with configured downgrades applied
    fn severity_of(&self, err: &ExportError) -> Severity {
        match (err, self.options.on_missing_variant) {
            (ExportError::MissingVariant { .. }, MissingVariantPolicy::Skip) => {
                Severity::Recoverable
            }
            _ => err.severity(),
        }
    }

    fn report_progress(&self, event: ProgressEvent, album_title: &str, report: &RunReport) {
        if let Some(ref callback) = self.options.progress_callback {
            callback(ExportProgress {
                event,
                album_title: album_title.to_string(),
                albums_visited: report.albums_visited,
                photos_transferred: report.photos_transferred,
                photos_failed: report.photos_failed,
            });
        }
    }
}

fn store_error(album_id: &AlbumId, source: StoreError) -> ExportError {
    ExportError::Store {
        album_id: album_id.clone(),
        source,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdb::{scenarios, MockAlbumStore, MockTransferer};
    use crate::transfer::NativeCopyTransferer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use walkdir::WalkDir;

    fn options(export: &TempDir) -> ExportOptions {
        ExportOptions::new("/uploads", export.path())
    }

    fn relative_dirs(root: &Path) -> Vec<String> {
        let mut dirs: Vec<String> = WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .map(|e| {
                e.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        dirs.sort();
        dirs
    }

    #[test]
    fn test_trips_scenario_with_native_copy() {
        let uploads = TempDir::new().unwrap();
        let export = TempDir::new().unwrap();
        let scenario = scenarios::trips();
        scenario.write_uploads(uploads.path()).unwrap();

        let opts = ExportOptions::new(uploads.path(), export.path());
        let mut exporter = TreeExporter::new(&scenario.store, NativeCopyTransferer::new(), opts);
        let mut report = RunReport::new();
        exporter.run(&mut report).unwrap();

        assert_eq!(relative_dirs(export.path()), vec!["Trips", "Trips/Trip-2019"]);
        assert!(export.path().join("Trips/Trip-2019/beach.jpg").is_file());
        assert_eq!(report.albums_visited, 2);
        assert_eq!(report.photos_transferred, 1);
        assert_eq!(report.photos_failed, 0);
    }

    #[test]
    fn test_empty_store() {
        let export = TempDir::new().unwrap();
        let store = MockAlbumStore::new();
        let mut exporter = TreeExporter::new(&store, MockTransferer::new(), options(&export));
        let mut report = RunReport::new();

        exporter.run(&mut report).unwrap();

        assert_eq!(report.albums_visited, 0);
        assert_eq!(report.photos_transferred, 0);
        assert_eq!(report.photos_failed, 0);
        assert!(report.completed);
        assert!(report.aborted_by.is_none());
        assert!(relative_dirs(export.path()).is_empty());
    }

    #[test]
    fn test_counts_all_albums_and_photos() {
        let export = TempDir::new().unwrap();
        let store = MockAlbumStore::new()
            .with_album("r1", None, Some("Family"))
            .with_album("r2", None, Some("Work"))
            .with_album("c1", Some("r1"), Some("2019"))
            .with_album("c2", Some("r1"), Some("2020"))
            .with_album("g1", Some("c2"), Some("Christmas"))
            .with_photo("p1", "r1", Some("original/p1.jpg"))
            .with_photo("p2", "c1", Some("original/p2.jpg"))
            .with_photo("p3", "c2", Some("original/p3.jpg"))
            .with_photo("p4", "g1", Some("original/p4.jpg"))
            .with_photo("p5", "g1", Some("original/p5.jpg"))
            .with_photo("p6", "r2", Some("original/p6.jpg"));

        let transferer = MockTransferer::new();
        let mut exporter = TreeExporter::new(&store, &transferer, options(&export));
        let mut report = RunReport::new();
        exporter.run(&mut report).unwrap();

        assert_eq!(report.albums_visited, 5);
        assert_eq!(report.photos_transferred, 6);
        assert_eq!(report.photos_failed, 0);
        assert_eq!(transferer.call_count(), 6);
    }

    #[test]
    fn test_directory_tree_mirrors_album_parents() {
        let export = TempDir::new().unwrap();
        let store = MockAlbumStore::new()
            .with_album("r1", None, Some("Family"))
            .with_album("c1", Some("r1"), Some("Kids / School"))
            .with_album("g1", Some("c1"), Some("Grade 1"))
            .with_album("r2", None, Some("Work"));

        let mut exporter = TreeExporter::new(&store, MockTransferer::new(), options(&export));
        exporter.run(&mut RunReport::new()).unwrap();

        assert_eq!(
            relative_dirs(export.path()),
            vec![
                "Family",
                "Family/Kids_-_School",
                "Family/Kids_-_School/Grade_1",
                "Work"
            ]
        );
    }

    #[test]
    fn test_photos_land_in_their_album_directory() {
        let export = TempDir::new().unwrap();
        let store = MockAlbumStore::new()
            .with_album("r1", None, Some("Root"))
            .with_album("c1", Some("r1"), Some("Child"))
            .with_photo("p1", "r1", Some("original/a.jpg"))
            .with_photo("p2", "c1", Some("original/b.jpg"));

        let transferer = MockTransferer::new();
        let mut exporter = TreeExporter::new(&store, &transferer, options(&export));
        exporter.run(&mut RunReport::new()).unwrap();

        let calls = transferer.calls();
        let a = calls.iter().find(|c| c.relative_path == "original/a.jpg").unwrap();
        let b = calls.iter().find(|c| c.relative_path == "original/b.jpg").unwrap();
        assert_eq!(a.destination_dir, export.path().join("Root"));
        assert_eq!(b.destination_dir, export.path().join("Root").join("Child"));
        assert_eq!(a.source_root, PathBuf::from("/uploads"));
    }

    #[test]
    fn test_failed_transfer_does_not_stop_the_run() {
        let export = TempDir::new().unwrap();
        let store = MockAlbumStore::new()
            .with_album("r1", None, Some("One"))
            .with_album("r2", None, Some("Two"))
            .with_photo("p1", "r1", Some("original/ok1.jpg"))
            .with_photo("p2", "r1", Some("original/broken.jpg"))
            .with_photo("p3", "r1", Some("original/ok2.jpg"))
            .with_photo("p4", "r2", Some("original/ok3.jpg"));

        let transferer = MockTransferer::new().failing_on("original/broken.jpg");
        let mut exporter = TreeExporter::new(&store, &transferer, options(&export));
        let mut report = RunReport::new();
        exporter.run(&mut report).unwrap();

        assert_eq!(report.albums_visited, 2);
        assert_eq!(report.photos_transferred, 3);
        assert_eq!(report.photos_failed, 1);
        assert_eq!(report.failures[0].photo_id, PhotoId::new("p2"));
        assert_eq!(report.failures[0].album_id, AlbumId::new("r1"));
        assert_eq!(transferer.call_count(), 4);
    }

    #[test]
    fn test_missing_variant_aborts_by_default() {
        let export = TempDir::new().unwrap();
        let scenario = scenarios::beach_day();
        let mut exporter =
            TreeExporter::new(&scenario.store, MockTransferer::new(), options(&export));
        let mut report = RunReport::new();

        let err = exporter.run(&mut report).unwrap_err();

        match err {
            ExportError::MissingVariant { photo_id, .. } => {
                assert_eq!(photo_id.as_str(), "p-missing")
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(report.albums_visited, 1);
        assert!(!report.completed);
        let cause = report.aborted_by.as_deref().unwrap();
        assert!(cause.contains("p-missing"));
        assert!(report.to_string().starts_with("Export ABORTED:"));
    }

    #[test]
    fn test_missing_variant_skipped_when_configured() {
        let export = TempDir::new().unwrap();
        let scenario = scenarios::beach_day();
        let opts = options(&export).on_missing_variant(MissingVariantPolicy::Skip);
        let mut exporter = TreeExporter::new(&scenario.store, MockTransferer::new(), opts);
        let mut report = RunReport::new();

        exporter.run(&mut report).unwrap();

        assert_eq!(report.albums_visited, 1);
        assert_eq!(report.photos_transferred, 1);
        assert_eq!(report.photos_failed, 1);
        assert_eq!(report.failures[0].photo_id.as_str(), "p-missing");
        assert!(export.path().join("Beach_Day").is_dir());
    }

    #[test]
    fn test_sibling_collision_aborts_naming_both_albums() {
        let export = TempDir::new().unwrap();
        let scenario = scenarios::summer_collision();
        let mut exporter =
            TreeExporter::new(&scenario.store, MockTransferer::new(), options(&export));

        let err = exporter.run(&mut RunReport::new()).unwrap_err();

        match err {
            ExportError::DirectoryCollision {
                album_id, existing, ..
            } => {
                let mut ids = vec![album_id.0, existing.0];
                ids.sort();
                assert_eq!(ids, vec!["s1", "s2"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_siblings_differing_in_case_never_report_a_plain_create_error() {
        let export = TempDir::new().unwrap();
        let store = MockAlbumStore::new()
            .with_album("s1", None, Some("Summer"))
            .with_album("s2", None, Some("summer"));
        let mut exporter = TreeExporter::new(&store, MockTransferer::new(), options(&export));

        // Case-sensitive filesystems create both; others must name both albums.
        match exporter.run(&mut RunReport::new()) {
            Ok(()) => assert_eq!(relative_dirs(export.path()), vec!["Summer", "summer"]),
            Err(ExportError::DirectoryCollision {
                album_id, existing, ..
            }) => {
                assert_eq!(album_id.as_str(), "s2");
                assert_eq!(existing.as_str(), "s1");
            }
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_sibling_lookup_ignores_case() {
        let export = TempDir::new().unwrap();
        let store = MockAlbumStore::new();
        let mut exporter = TreeExporter::new(&store, MockTransferer::new(), options(&export));

        exporter
            .create_album_dir(&AlbumId::new("s1"), &export.path().join("Summer"))
            .unwrap();

        let owner = exporter.sibling_differing_in_case(&export.path().join("SUMMER"));
        assert_eq!(owner, Some(&AlbumId::new("s1")));
        assert!(exporter
            .sibling_differing_in_case(&export.path().join("Winter"))
            .is_none());
        assert!(exporter
            .sibling_differing_in_case(&export.path().join("Other/summer"))
            .is_none());
    }

    #[test]
    fn test_preexisting_directory_is_fatal() {
        let export = TempDir::new().unwrap();
        fs::create_dir(export.path().join("Trips")).unwrap();
        let store = MockAlbumStore::new().with_album("a1", None, Some("Trips"));

        let mut exporter = TreeExporter::new(&store, MockTransferer::new(), options(&export));
        let err = exporter.run(&mut RunReport::new()).unwrap_err();

        assert!(matches!(err, ExportError::CreateDirectory { .. }));
    }

    #[test]
    fn test_missing_title_aborts() {
        let export = TempDir::new().unwrap();
        let store = MockAlbumStore::new()
            .with_album("a1", None, Some("Fine"))
            .with_album("a2", Some("a1"), None);

        let mut exporter = TreeExporter::new(&store, MockTransferer::new(), options(&export));
        let mut report = RunReport::new();
        let err = exporter.run(&mut report).unwrap_err();

        match err {
            ExportError::Store { album_id, source } => {
                assert_eq!(album_id.as_str(), "a2");
                assert!(matches!(source, StoreError::MissingTitle(_)));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(report.albums_visited, 2);
    }

    #[test]
    fn test_unknown_album_aborts() {
        let export = TempDir::new().unwrap();
        let store = MockAlbumStore::new();
        let mut exporter = TreeExporter::new(&store, MockTransferer::new(), options(&export));

        let err = exporter
            .export_subtree(&AlbumId::new("ghost"), export.path(), &mut RunReport::new())
            .unwrap_err();

        assert!(matches!(
            err,
            ExportError::Store {
                source: StoreError::AlbumNotFound(_),
                ..
            }
        ));
    }

    #[test]
    fn test_dot_title_is_rejected() {
        let export = TempDir::new().unwrap();
        let store = MockAlbumStore::new().with_album("a1", None, Some(".."));
        let mut exporter = TreeExporter::new(&store, MockTransferer::new(), options(&export));

        let err = exporter.run(&mut RunReport::new()).unwrap_err();
        assert!(matches!(err, ExportError::InvalidDirectoryName { .. }));
    }

    #[test]
    fn test_query_failure_aborts() {
        let export = TempDir::new().unwrap();
        let store = MockAlbumStore::new()
            .with_album("a1", None, Some("Broken"))
            .failing_photos_of("a1");
        let mut exporter = TreeExporter::new(&store, MockTransferer::new(), options(&export));

        let err = exporter.run(&mut RunReport::new()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Store {
                source: StoreError::Query { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_export_subtree_only_touches_that_subtree() {
        let export = TempDir::new().unwrap();
        let store = MockAlbumStore::new()
            .with_album("r1", None, Some("Keep"))
            .with_album("c1", Some("r1"), Some("Inner"))
            .with_album("r2", None, Some("Other"))
            .with_photo("p1", "c1", Some("original/p1.jpg"))
            .with_photo("p2", "r2", Some("original/p2.jpg"));

        let mut exporter = TreeExporter::new(&store, MockTransferer::new(), options(&export));
        let mut report = RunReport::new();
        exporter
            .export_subtree(&AlbumId::new("r1"), export.path(), &mut report)
            .unwrap();

        assert_eq!(report.albums_visited, 2);
        assert_eq!(report.photos_transferred, 1);
        assert_eq!(relative_dirs(export.path()), vec!["Keep", "Keep/Inner"]);
    }

    #[test]
    fn test_deep_tree_does_not_recurse() {
        let export = TempDir::new().unwrap();
        let mut store = MockAlbumStore::new().with_album("0", None, Some("d"));
        for depth in 1..200 {
            store = store.with_album(
                &depth.to_string(),
                Some(&(depth - 1).to_string()),
                Some("d"),
            );
        }

        let mut exporter = TreeExporter::new(&store, MockTransferer::new(), options(&export));
        let mut report = RunReport::new();
        exporter.run(&mut report).unwrap();

        assert_eq!(report.albums_visited, 200);
    }

    #[test]
    fn test_progress_callback() {
        let export = TempDir::new().unwrap();
        let scenario = scenarios::trips();

        let events = Arc::new(AtomicUsize::new(0));
        let events_clone = events.clone();
        let opts = options(&export).with_progress(move |_| {
            events_clone.fetch_add(1, Ordering::SeqCst);
        });

        let mut exporter = TreeExporter::new(&scenario.store, MockTransferer::new(), opts);
        exporter.run(&mut RunReport::new()).unwrap();

        // two albums started, one photo, one finish
        assert_eq!(events.load(Ordering::SeqCst), 4);
    }
}
