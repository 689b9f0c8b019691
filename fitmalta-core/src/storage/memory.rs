use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{snapshot, FavoritesRepository, StorageError};
use crate::models::SavedItem;

/// In-memory favorites repository for testing.
///
/// Holds the encoded snapshot text rather than the items, so loads go
/// through the same codec as the file repository. Clones share state: keep
/// one handle in the test and hand another to the store.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    snapshot: Rc<RefCell<Option<String>>>,
    simulate_write_error: Rc<Cell<bool>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository that already holds `text` as its snapshot.
    pub fn with_snapshot(text: impl Into<String>) -> Self {
        let repo = Self::default();
        *repo.snapshot.borrow_mut() = Some(text.into());
        repo
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Current snapshot text, if anything was written.
    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.borrow().clone()
    }

    /// Number of successful saves.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl FavoritesRepository for MemoryRepository {
    fn load(&self) -> Result<Option<Vec<SavedItem>>, StorageError> {
        match self.snapshot.borrow().as_deref() {
            Some(text) => snapshot::decode(text).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, items: &[SavedItem]) -> Result<(), StorageError> {
        if self.simulate_write_error.get() {
            return Err(StorageError::Simulated);
        }
        let text = snapshot::encode(items)?;
        *self.snapshot.borrow_mut() = Some(text);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
