//! In-memory album store and transfer doubles
//!
//! `MockAlbumStore` answers the store contract from plain vectors, and
//! `MockTransferer` records every transfer request instead of copying.

use crate::store::{Album, AlbumId, AlbumStore, PhotoId, StoreError, StoreResult};
use crate::transfer::{FileTransferer, TransferOutcome};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// An album row
#[derive(Debug, Clone)]
pub struct MockAlbum {
    pub id: AlbumId,
    pub parent_id: Option<AlbumId>,
    /// `None` simulates a null title column
    pub title: Option<String>,
}

/// A photo row with its original variant path
#[derive(Debug, Clone)]
pub struct MockPhoto {
    pub id: PhotoId,
    pub album_id: AlbumId,
    /// `None` simulates a missing original size variant
    pub original_path: Option<String>,
}

/// Album store backed by vectors
///
/// Listings come back in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MockAlbumStore {
    albums: Vec<MockAlbum>,
    photos: Vec<MockPhoto>,
    /// Albums whose photo listing fails with a query error
    failing_photo_queries: HashSet<AlbumId>,
}

impl MockAlbumStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an album
    pub fn with_album(mut self, id: &str, parent: Option<&str>, title: Option<&str>) -> Self {
        self.albums.push(MockAlbum {
            id: AlbumId::new(id),
            parent_id: parent.map(AlbumId::new),
            title: title.map(String::from),
        });
        self
    }

    /// Add a photo to an album
    pub fn with_photo(mut self, id: &str, album: &str, original_path: Option<&str>) -> Self {
        self.photos.push(MockPhoto {
            id: PhotoId::new(id),
            album_id: AlbumId::new(album),
            original_path: original_path.map(String::from),
        });
        self
    }

    /// Make `photos_of(album)` fail
    pub fn failing_photos_of(mut self, album: &str) -> Self {
        self.failing_photo_queries.insert(AlbumId::new(album));
        self
    }

    fn to_album(album: &MockAlbum) -> Album {
        Album {
            id: album.id.clone(),
            parent_id: album.parent_id.clone(),
        }
    }
}

impl AlbumStore for MockAlbumStore {
    fn root_albums(&self) -> StoreResult<Vec<Album>> {
        Ok(self
            .albums
            .iter()
            .filter(|a| a.parent_id.is_none())
            .map(Self::to_album)
            .collect())
    }

    fn child_albums(&self, album_id: &AlbumId) -> StoreResult<Vec<Album>> {
        Ok(self
            .albums
            .iter()
            .filter(|a| a.parent_id.as_ref() == Some(album_id))
            .map(Self::to_album)
            .collect())
    }

    fn album_title(&self, album_id: &AlbumId) -> StoreResult<String> {
        let album = self
            .albums
            .iter()
            .find(|a| &a.id == album_id)
            .ok_or_else(|| StoreError::AlbumNotFound(album_id.clone()))?;

        album
            .title
            .clone()
            .ok_or_else(|| StoreError::MissingTitle(album_id.clone()))
    }

    fn photos_of(&self, album_id: &AlbumId) -> StoreResult<Vec<PhotoId>> {
        if self.failing_photo_queries.contains(album_id) {
            return Err(StoreError::query(
                format!("photos of album {}", album_id),
                "simulated query failure",
            ));
        }

        Ok(self
            .photos
            .iter()
            .filter(|p| &p.album_id == album_id)
            .map(|p| p.id.clone())
            .collect())
    }

    fn canonical_file_path(&self, photo_id: &PhotoId) -> StoreResult<String> {
        self.photos
            .iter()
            .find(|p| &p.id == photo_id)
            .and_then(|p| p.original_path.clone())
            .ok_or_else(|| StoreError::MissingVariant(photo_id.clone()))
    }
}

/// One recorded transfer request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCall {
    pub source_root: PathBuf,
    pub relative_path: String,
    pub destination_dir: PathBuf,
}

/// Transfer double that records requests
///
/// Succeeds unless the relative path was registered with `failing_on`.
#[derive(Debug, Default)]
pub struct MockTransferer {
    failing_paths: HashSet<String>,
    calls: RefCell<Vec<TransferCall>>,
}

impl MockTransferer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every transfer of `relative_path`
    pub fn failing_on(mut self, relative_path: &str) -> Self {
        self.failing_paths.insert(relative_path.to_string());
        self
    }

    pub fn calls(&self) -> Vec<TransferCall> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl FileTransferer for MockTransferer {
    fn transfer(
        &self,
        source_root: &Path,
        relative_path: &str,
        destination_dir: &Path,
    ) -> TransferOutcome {
        self.calls.borrow_mut().push(TransferCall {
            source_root: source_root.to_path_buf(),
            relative_path: relative_path.to_string(),
            destination_dir: destination_dir.to_path_buf(),
        });

        if self.failing_paths.contains(relative_path) {
            return TransferOutcome::Failed(format!("simulated failure for {}", relative_path));
        }

        TransferOutcome::Succeeded
    }
}
