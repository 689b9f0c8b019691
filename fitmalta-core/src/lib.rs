//! FitMalta Core Library
//!
//! Saved meal plans and workouts ("favorites") for FitMalta applications.

pub mod account;
pub mod catalog;
pub mod favorites;
pub mod models;
pub mod storage;
pub mod toggle;

pub use account::{AuthProvider, Session, SIGN_IN_PATH};
pub use catalog::{Catalog, CatalogError};
pub use favorites::{Clock, FavoritesStore};
pub use models::{CurrentUser, ItemDescriptor, ItemKind, ItemType, SavedItem, UserType};
pub use storage::{
    FavoritesRepository, JsonFileRepository, MemoryRepository, StorageError, STORAGE_KEY,
};
pub use toggle::{toggle_favorite, ToggleOutcome};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
