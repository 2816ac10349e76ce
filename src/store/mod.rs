//! Album store access
//!
//! - `traits` - The read-only query contract and identifier types
//! - `sql` - sqlx-backed implementation over the Lychee schema

pub mod sql;
pub mod traits;

pub use sql::SqlAlbumStore;
pub use traits::{Album, AlbumId, AlbumStore, PhotoId, StoreError, StoreResult};
