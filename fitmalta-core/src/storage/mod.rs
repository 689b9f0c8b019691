//! Persistence for the favorites collection.
//!
//! The store talks to storage only through [`FavoritesRepository`], which
//! reads and writes the whole collection at once. Both implementations go
//! through the same [`snapshot`] codec, so the memory double exercises the
//! real on-disk format.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.local/share/fitmalta/
//! ├── fitmalta-favorites.json    # snapshot (JSON array of saved items)
//! └── session.json               # signed-in user and pending return path
//! ```

mod json_file;
mod memory;
pub mod snapshot;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::SavedItem;

pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;

/// Fixed namespace under which the snapshot is stored.
pub const STORAGE_KEY: &str = "fitmalta-favorites";

/// Errors that can occur while loading or saving a snapshot.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Malformed snapshot: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Simulated write error")]
    Simulated,
}

/// Load/save access to the persisted favorites snapshot.
pub trait FavoritesRepository {
    /// Reads the snapshot.
    ///
    /// Returns `Ok(None)` if nothing has been persisted yet and
    /// `Err(StorageError::Parse)` if the snapshot is not well-formed.
    fn load(&self) -> Result<Option<Vec<SavedItem>>, StorageError>;

    /// Replaces the snapshot with `items`.
    fn save(&self, items: &[SavedItem]) -> Result<(), StorageError>;
}
