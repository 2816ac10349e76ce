//! Album store abstraction
//!
//! This module defines the read-only query contract the exporter consumes.
//! The SQL-backed adapter and the in-memory mock store both implement
//! [`AlbumStore`], so the export pipeline can be exercised without a live
//! database.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use lychee_exporter::store::traits::AlbumStore;
//!
//! fn print_roots<S: AlbumStore>(store: &S) -> Result<(), String> {
//!     for album in store.root_albums().map_err(|e| e.to_string())? {
//!         let title = store.album_title(&album.id).map_err(|e| e.to_string())?;
//!         println!("{} ({})", title, album.id);
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use thiserror::Error;

/// Opaque album identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumId(pub String);

/// Opaque photo identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub String);

impl AlbumId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PhotoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An album node as seen by the exporter
///
/// `parent_id` is `None` for root albums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: AlbumId,
    pub parent_id: Option<AlbumId>,
}

impl Album {
    pub fn root(id: impl Into<String>) -> Self {
        Self {
            id: AlbumId::new(id),
            parent_id: None,
        }
    }

    pub fn child(id: impl Into<String>, parent: &AlbumId) -> Self {
        Self {
            id: AlbumId::new(id),
            parent_id: Some(parent.clone()),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Errors raised by an album store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached
    #[error("Store connection failed: {0}")]
    Connection(String),

    /// A query failed to execute or a row could not be decoded
    #[error("Query failed ({context}): {message}")]
    Query { context: String, message: String },

    /// No album row exists for the identifier
    #[error("Album '{0}' not found")]
    AlbumNotFound(AlbumId),

    /// The album row exists but has no title
    #[error("Album '{0}' has no title")]
    MissingTitle(AlbumId),

    /// No canonical (original) size variant, or its path is null
    #[error("Photo '{0}' has no original size variant")]
    MissingVariant(PhotoId),
}

impl StoreError {
    pub fn query(context: impl Into<String>, message: impl Display) -> Self {
        StoreError::Query {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read-only query contract over the album/photo store
///
/// Lookups are by exact identifier equality. Ordering of returned sequences
/// is not part of the contract.
pub trait AlbumStore {
    /// Albums without a parent
    fn root_albums(&self) -> StoreResult<Vec<Album>>;

    /// Albums whose parent is `album_id`
    fn child_albums(&self, album_id: &AlbumId) -> StoreResult<Vec<Album>>;

    /// Title of an album
    ///
    /// Fails with [`StoreError::AlbumNotFound`] or [`StoreError::MissingTitle`].
    fn album_title(&self, album_id: &AlbumId) -> StoreResult<String>;

    /// Photos belonging directly to `album_id`
    fn photos_of(&self, album_id: &AlbumId) -> StoreResult<Vec<PhotoId>>;

    /// Path of the photo's original file, relative to the uploads root
    ///
    /// Fails with [`StoreError::MissingVariant`].
    fn canonical_file_path(&self, photo_id: &PhotoId) -> StoreResult<String>;
}

impl<S: AlbumStore + ?Sized> AlbumStore for &S {
    fn root_albums(&self) -> StoreResult<Vec<Album>> {
        (**self).root_albums()
    }

    fn child_albums(&self, album_id: &AlbumId) -> StoreResult<Vec<Album>> {
        (**self).child_albums(album_id)
    }

    fn album_title(&self, album_id: &AlbumId) -> StoreResult<String> {
        (**self).album_title(album_id)
    }

    fn photos_of(&self, album_id: &AlbumId) -> StoreResult<Vec<PhotoId>> {
        (**self).photos_of(album_id)
    }

    fn canonical_file_path(&self, photo_id: &PhotoId) -> StoreResult<String> {
        (**self).canonical_file_path(photo_id)
    }
}
