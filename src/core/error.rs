//! Error types for the album exporter
//!
//! Every error the exporter can meet carries a [`Severity`]. Fatal errors end
//! the run; recoverable ones are counted against the photo that caused them
//! and the run continues.

use crate::store::{AlbumId, PhotoId, StoreError};
use std::path::PathBuf;
use thiserror::Error;

/// How the exporter reacts to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Abort the whole run
    Fatal,
    /// Record against the current photo and keep going
    Recoverable,
}

/// Main error type for an export run
#[derive(Error, Debug)]
pub enum ExportError {
    /// Store failure while reading album `album_id`
    #[error("Store error while exporting album '{album_id}': {source}")]
    Store {
        album_id: AlbumId,
        #[source]
        source: StoreError,
    },

    /// Store failure before any album was visited
    #[error("Store error while listing root albums: {0}")]
    RootAlbums(#[source] StoreError),

    /// No canonical variant for a photo
    #[error("Photo '{photo_id}' in album '{album_id}' has no original file: {source}")]
    MissingVariant {
        album_id: AlbumId,
        photo_id: PhotoId,
        #[source]
        source: StoreError,
    },

    /// The sanitized title cannot be used as a directory name
    #[error("Album '{album_id}' title {title:?} does not produce a usable directory name")]
    InvalidDirectoryName { album_id: AlbumId, title: String },

    /// Two sibling albums sanitize to the same directory
    #[error(
        "Directory '{}' for album '{album_id}' collides with the one created for album '{existing}'",
        path.display()
    )]
    DirectoryCollision {
        path: PathBuf,
        album_id: AlbumId,
        existing: AlbumId,
    },

    /// Creating an album directory failed
    #[error("Failed to create directory '{}' for album '{album_id}': {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        album_id: AlbumId,
        #[source]
        source: std::io::Error,
    },

    /// Copying a photo's file failed
    #[error("Transfer of photo '{photo_id}' into '{}' failed: {reason}", destination.display())]
    Transfer {
        photo_id: PhotoId,
        destination: PathBuf,
        reason: String,
    },
}

impl ExportError {
    /// Classification under the default policy
    ///
    /// Only transfer failures are recoverable; the exporter may downgrade a
    /// missing variant when configured to skip such photos.
    pub fn severity(&self) -> Severity {
        match self {
            ExportError::Transfer { .. } => Severity::Recoverable,
            _ => Severity::Fatal,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity() {
        let transfer = ExportError::Transfer {
            photo_id: PhotoId::new("p1"),
            destination: PathBuf::from("/export/a"),
            reason: "rsync exited with 23".to_string(),
        };
        assert_eq!(transfer.severity(), Severity::Recoverable);

        let missing = ExportError::MissingVariant {
            album_id: AlbumId::new("a1"),
            photo_id: PhotoId::new("p1"),
            source: StoreError::MissingVariant(PhotoId::new("p1")),
        };
        assert_eq!(missing.severity(), Severity::Fatal);
    }

    #[test]
    fn test_collision_message_names_both_albums() {
        let err = ExportError::DirectoryCollision {
            path: PathBuf::from("/export/Summer_Vacation"),
            album_id: AlbumId::new("a2"),
            existing: AlbumId::new("a1"),
        };
        let msg = err.to_string();
        assert!(msg.contains("a1"));
        assert!(msg.contains("a2"));
        assert!(msg.contains("Summer_Vacation"));
    }
}
