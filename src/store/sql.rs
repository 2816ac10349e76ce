//! SQL-backed album store
//!
//! Reads the Lychee schema (`albums`, `base_albums`, `photos`,
//! `size_variants`) through sqlx's `Any` driver, so the same adapter serves a
//! MySQL/MariaDB server and a local SQLite file. The driver is asynchronous;
//! this adapter owns a single-threaded tokio runtime and exposes blocking
//! calls only.

use crate::store::traits::{Album, AlbumId, AlbumStore, PhotoId, StoreError, StoreResult};
use log::{debug, trace};
use sqlx::any::{install_default_drivers, AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};
use std::future::Future;
use tokio::runtime::{Builder, Runtime};

/// `size_variants.type` value of the original upload
pub const ORIGINAL_VARIANT_TYPE: i32 = 0;

const ROOT_ALBUMS_SQL: &str = "SELECT id FROM albums WHERE parent_id IS NULL";
const CHILD_ALBUMS_SQL: &str = "SELECT id FROM albums WHERE parent_id = ?";
const ALBUM_TITLE_SQL: &str = "SELECT id, title FROM base_albums WHERE id = ?";
const PHOTOS_SQL: &str = "SELECT id FROM photos WHERE album_id = ?";
const CANONICAL_PATH_SQL: &str =
    "SELECT short_path FROM size_variants WHERE type = ? AND photo_id = ?";

/// Album store reading a Lychee database
pub struct SqlAlbumStore {
    runtime: Runtime,
    pool: AnyPool,
}

impl std::fmt::Debug for SqlAlbumStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlAlbumStore")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

impl SqlAlbumStore {
    /// Connect to the store at `url` (`mysql://...` or `sqlite:...`)
    ///
    /// Establishes one connection up front so connectivity problems surface
    /// before the export starts.
    pub fn connect(url: &str) -> StoreResult<Self> {
        install_default_drivers();

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Connection(format!("failed to start runtime: {}", e)))?;

        // A single long-lived connection: the export is sequential, and an
        // in-memory SQLite database only lives as long as its connection.
        let pool = runtime
            .block_on(
                AnyPoolOptions::new()
                    .max_connections(1)
                    .min_connections(0)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect(url),
            )
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        debug!("Connected to album store");

        Ok(Self { runtime, pool })
    }

    /// Round-trip a trivial query
    pub fn ping(&self) -> StoreResult<()> {
        self.block_on(sqlx::query("SELECT 1").execute(&self.pool))
            .map(|_| ())
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Run a query returning one id column per row
    fn fetch_ids(
        &self,
        sql: &str,
        param: Option<&str>,
        context: &str,
    ) -> StoreResult<Vec<String>> {
        trace!("{} [{:?}]", sql, param);

        let mut query = sqlx::query(sql);
        if let Some(param) = param {
            query = query.bind(param.to_owned());
        }

        let rows = self
            .block_on(query.fetch_all(&self.pool))
            .map_err(|e| StoreError::query(context, e))?;

        rows.iter()
            .map(|row| decode_id(row, 0).map_err(|e| StoreError::query(context, e)))
            .collect()
    }

    /// Execute a `;`-separated script, one statement at a time
    #[cfg(test)]
    pub(crate) fn execute_script(&self, script: &str) -> StoreResult<()> {
        for statement in script.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            self.block_on(sqlx::query(statement).execute(&self.pool))
                .map_err(|e| StoreError::query("script", e))?;
        }
        Ok(())
    }
}

/// Decode an identifier column, accepting text or integer keys
fn decode_id(row: &AnyRow, column: usize) -> Result<String, sqlx::Error> {
    match row.try_get::<String, _>(column) {
        Ok(id) => Ok(id),
        Err(_) => row.try_get::<i64, _>(column).map(|id| id.to_string()),
    }
}

impl AlbumStore for SqlAlbumStore {
    fn root_albums(&self) -> StoreResult<Vec<Album>> {
        let ids = self.fetch_ids(ROOT_ALBUMS_SQL, None, "root albums")?;
        Ok(ids.into_iter().map(Album::root).collect())
    }

    fn child_albums(&self, album_id: &AlbumId) -> StoreResult<Vec<Album>> {
        let context = format!("child albums of {}", album_id);
        let ids = self.fetch_ids(CHILD_ALBUMS_SQL, Some(album_id.as_str()), &context)?;
        Ok(ids
            .into_iter()
            .map(|id| Album::child(id, album_id))
            .collect())
    }

    fn album_title(&self, album_id: &AlbumId) -> StoreResult<String> {
        let context = format!("title of album {}", album_id);
        let row = self
            .block_on(
                sqlx::query(ALBUM_TITLE_SQL)
                    .bind(album_id.as_str().to_owned())
                    .fetch_optional(&self.pool),
            )
            .map_err(|e| StoreError::query(&context, e))?
            .ok_or_else(|| StoreError::AlbumNotFound(album_id.clone()))?;

        let title: Option<String> = row
            .try_get(1)
            .map_err(|e| StoreError::query(&context, e))?;

        title.ok_or_else(|| StoreError::MissingTitle(album_id.clone()))
    }

    fn photos_of(&self, album_id: &AlbumId) -> StoreResult<Vec<PhotoId>> {
        let context = format!("photos of album {}", album_id);
        let ids = self.fetch_ids(PHOTOS_SQL, Some(album_id.as_str()), &context)?;
        Ok(ids.into_iter().map(PhotoId).collect())
    }

    fn canonical_file_path(&self, photo_id: &PhotoId) -> StoreResult<String> {
        let context = format!("size variants of photo {}", photo_id);
        let row = self
            .block_on(
                sqlx::query(CANONICAL_PATH_SQL)
                    .bind(ORIGINAL_VARIANT_TYPE)
                    .bind(photo_id.as_str().to_owned())
                    .fetch_optional(&self.pool),
            )
            .map_err(|e| StoreError::query(&context, e))?
            .ok_or_else(|| StoreError::MissingVariant(photo_id.clone()))?;

        let short_path: Option<String> = row
            .try_get(0)
            .map_err(|e| StoreError::query(&context, e))?;

        short_path.ok_or_else(|| StoreError::MissingVariant(photo_id.clone()))
    }
}
