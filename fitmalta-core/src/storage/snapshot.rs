//! Text encoding of the persisted collection.

use super::StorageError;
use crate::models::SavedItem;

/// Serializes the full collection as a JSON array.
pub fn encode(items: &[SavedItem]) -> Result<String, StorageError> {
    serde_json::to_string(items).map_err(StorageError::Encode)
}

/// Parses a snapshot. Any malformed record fails the whole snapshot.
pub fn decode(text: &str) -> Result<Vec<SavedItem>, StorageError> {
    serde_json::from_str(text).map_err(StorageError::Parse)
}
