//! File-backed favorites repository.

use std::fs;
use std::io;
use std::path::PathBuf;

use super::{snapshot, FavoritesRepository, StorageError, STORAGE_KEY};
use crate::models::SavedItem;

/// Stores the snapshot as `<data_dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    data_dir: PathBuf,
    key: String,
}

impl JsonFileRepository {
    /// Creates a repository under the default storage key.
    pub fn new(data_dir: PathBuf) -> Self {
        Self::with_key(data_dir, STORAGE_KEY)
    }

    /// Creates a repository under a custom storage key.
    pub fn with_key(data_dir: PathBuf, key: impl Into<String>) -> Self {
        Self {
            data_dir,
            key: key.into(),
        }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Returns the full path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.key))
    }

    /// Checks if a snapshot exists on disk.
    pub fn exists(&self) -> bool {
        self.path().exists()
    }
}

impl FavoritesRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<Vec<SavedItem>>, StorageError> {
        let path = self.path();

        match fs::read_to_string(&path) {
            Ok(text) => snapshot::decode(&text).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }

    /// Writes to a temporary file and renames it over the snapshot.
    fn save(&self, items: &[SavedItem]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::Io(self.data_dir.clone(), e))?;

        let text = snapshot::encode(items)?;
        let path = self.path();
        let tmp_path = self.data_dir.join(format!("{}.json.tmp", self.key));

        fs::write(&tmp_path, text).map_err(|e| StorageError::Io(tmp_path.clone(), e))?;
        fs::rename(&tmp_path, &path).map_err(|e| StorageError::Io(path, e))?;

        Ok(())
    }
}
