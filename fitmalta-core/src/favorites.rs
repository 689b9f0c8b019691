//! The favorites store: the user's saved meal plans and workouts.
//!
//! A [`FavoritesStore`] is an explicitly constructed object that owns its
//! repository. Opening it loads the persisted snapshot synchronously, so a
//! store never exists in a "not yet loaded" state. Each mutation that changes
//! the collection rewrites the whole snapshot. Persistence failures are
//! logged and otherwise ignored: the in-memory collection stays
//! authoritative for the rest of the session.
//!
//! # Usage
//!
//! ```
//! use fitmalta_core::{FavoritesStore, ItemDescriptor, ItemType, MemoryRepository};
//!
//! let mut store = FavoritesStore::open(MemoryRepository::new());
//! store.add(ItemDescriptor::workout("w1", "Push Day"));
//!
//! assert!(store.is_favorite("w1", ItemType::Workout));
//! assert_eq!(store.saved_workouts().len(), 1);
//! ```

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::{ItemDescriptor, ItemType, SavedItem};
use crate::storage::FavoritesRepository;

/// Source of `savedAt` timestamps.
pub type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// In-memory favorites collection backed by a [`FavoritesRepository`].
pub struct FavoritesStore<R: FavoritesRepository> {
    repository: R,
    items: Vec<SavedItem>,
    clock: Clock,
}

impl<R: FavoritesRepository> FavoritesStore<R> {
    /// Opens the store, loading whatever the repository holds.
    ///
    /// A missing snapshot yields an empty store. A malformed one is
    /// discarded entirely (with a warning) and the store starts empty.
    pub fn open(repository: R) -> Self {
        Self::with_clock(repository, Box::new(Utc::now))
    }

    /// Opens the store with a custom timestamp source.
    pub fn with_clock(repository: R, clock: Clock) -> Self {
        let items = load_items(&repository);
        Self {
            repository,
            items,
            clock,
        }
    }

    /// Saves an item. Does nothing if `(id, type)` is already saved.
    ///
    /// Any timestamp carried by the input is replaced with the current time.
    /// Returns true if the item was inserted.
    pub fn add(&mut self, item: impl Into<ItemDescriptor>) -> bool {
        let item = item.into();
        if self.is_favorite(&item.id, item.item_type()) {
            return false;
        }

        tracing::debug!("Saving {} '{}'", item.item_type(), item.id);
        let saved_at = (self.clock)();
        self.items.push(SavedItem::new(item, saved_at));
        self.persist();
        true
    }

    /// Removes the item keyed by `(id, item_type)`. Does nothing if absent.
    ///
    /// Returns true if an item was removed.
    pub fn remove(&mut self, id: &str, item_type: ItemType) -> bool {
        let len_before = self.items.len();
        self.items.retain(|item| !item.matches(id, item_type));
        if self.items.len() == len_before {
            return false;
        }

        tracing::debug!("Removed {} '{}'", item_type, id);
        self.persist();
        true
    }

    pub fn is_favorite(&self, id: &str, item_type: ItemType) -> bool {
        self.get(id, item_type).is_some()
    }

    pub fn get(&self, id: &str, item_type: ItemType) -> Option<&SavedItem> {
        self.items.iter().find(|item| item.matches(id, item_type))
    }

    /// Saved meal plans, most recently saved first.
    pub fn saved_meal_plans(&self) -> Vec<SavedItem> {
        self.saved(ItemType::MealPlan)
    }

    /// Saved workouts, most recently saved first.
    pub fn saved_workouts(&self) -> Vec<SavedItem> {
        self.saved(ItemType::Workout)
    }

    /// Saved items of one type ordered by `saved_at` descending.
    ///
    /// Items saved at the same instant are ordered by insertion, latest
    /// first.
    pub fn saved(&self, item_type: ItemType) -> Vec<SavedItem> {
        let mut items: Vec<SavedItem> = self
            .items
            .iter()
            .rev()
            .filter(|item| item.item_type() == item_type)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        items
    }

    /// All saved items in insertion order.
    pub fn items(&self) -> &[SavedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn persist(&self) {
        if let Err(e) = self.repository.save(&self.items) {
            tracing::warn!("Failed to persist favorites: {}", e);
        }
    }
}

fn load_items<R: FavoritesRepository>(repository: &R) -> Vec<SavedItem> {
    match repository.load() {
        Ok(Some(items)) => {
            let items = dedup_by_key(items);
            tracing::debug!("Loaded {} favorite(s)", items.len());
            items
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!("Discarding favorites snapshot: {}", e);
            Vec::new()
        }
    }
}

/// Drops repeated `(id, type)` keys, keeping the first occurrence.
fn dedup_by_key(items: Vec<SavedItem>) -> Vec<SavedItem> {
    let mut seen = HashSet::new();
    let total = items.len();
    let unique: Vec<SavedItem> = items
        .into_iter()
        .filter(|item| seen.insert((item.id().to_string(), item.item_type())))
        .collect();

    if unique.len() != total {
        tracing::warn!(
            "Dropped {} duplicate favorite(s) from snapshot",
            total - unique.len()
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;
    use crate::storage::{JsonFileRepository, MemoryRepository};
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;
    use tempfile::TempDir;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
    }

    /// Clock that advances one minute per call.
    fn stepping_clock() -> Clock {
        let ticks = Cell::new(0);
        Box::new(move || {
            let n = ticks.get();
            ticks.set(n + 1);
            start() + Duration::minutes(n)
        })
    }

    fn frozen_clock() -> Clock {
        Box::new(start)
    }

    fn test_store() -> (FavoritesStore<MemoryRepository>, MemoryRepository) {
        let repo = MemoryRepository::new();
        let store = FavoritesStore::with_clock(repo.clone(), stepping_clock());
        (store, repo)
    }

    fn push_day() -> ItemDescriptor {
        ItemDescriptor::workout("w1", "Push Day")
    }

    fn bulk_plan() -> ItemDescriptor {
        ItemDescriptor::meal_plan("m1", "Bulk Plan")
    }

    #[test]
    fn test_open_empty_repository() {
        let (store, repo) = test_store();
        assert!(store.is_empty());
        assert_eq!(repo.write_count(), 0);
    }

    #[test]
    fn test_add_and_remove_scenario() {
        let (mut store, _repo) = test_store();

        store.add(push_day());
        store.add(bulk_plan());

        assert!(store.is_favorite("w1", ItemType::Workout));
        assert!(!store.is_favorite("m1", ItemType::Workout));
        assert_eq!(store.saved_workouts().len(), 1);
        assert_eq!(store.saved_meal_plans().len(), 1);

        store.remove("w1", ItemType::Workout);
        assert!(store.saved_workouts().is_empty());
        assert_eq!(store.saved_meal_plans().len(), 1);
    }

    #[test]
    fn test_add_is_idempotent() {
        let (mut store, repo) = test_store();
        store.add(bulk_plan());
        let first_saved_at = store.get("m1", ItemType::MealPlan).unwrap().saved_at;

        assert!(store.add(push_day()));
        assert!(!store.add(push_day()));

        assert_eq!(store.len(), 2);
        assert_eq!(repo.write_count(), 2);
        assert_eq!(
            store.get("m1", ItemType::MealPlan).unwrap().saved_at,
            first_saved_at
        );
    }

    #[test]
    fn test_duplicate_add_keeps_first_timestamp() {
        let (mut store, _repo) = test_store();
        store.add(push_day());
        let first = store.get("w1", ItemType::Workout).unwrap().saved_at;

        store.add(push_day().with_description("changed"));

        let saved = store.get("w1", ItemType::Workout).unwrap();
        assert_eq!(saved.saved_at, first);
        assert!(saved.item.description.is_empty());
    }

    #[test]
    fn test_same_id_different_type_are_distinct() {
        let (mut store, _repo) = test_store();
        store.add(ItemDescriptor::workout("x", "Workout X"));
        store.add(ItemDescriptor::meal_plan("x", "Plan X"));

        assert_eq!(store.len(), 2);
        store.remove("x", ItemType::Workout);
        assert!(store.is_favorite("x", ItemType::MealPlan));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (mut store, repo) = test_store();
        store.add(push_day());

        assert!(!store.remove("w2", ItemType::Workout));
        assert!(!store.remove("w1", ItemType::MealPlan));

        assert_eq!(store.len(), 1);
        assert_eq!(repo.write_count(), 1);
    }

    #[test]
    fn test_stale_timestamp_is_overwritten() {
        let (mut store, _repo) = test_store();
        let stale_at = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        let stale = SavedItem::new(push_day(), stale_at);

        store.add(stale);

        assert_eq!(store.get("w1", ItemType::Workout).unwrap().saved_at, start());
    }

    #[test]
    fn test_workouts_most_recent_first() {
        let (mut store, _repo) = test_store();
        store.add(ItemDescriptor::workout("t1", "First"));
        store.add(bulk_plan());
        store.add(ItemDescriptor::workout("t2", "Second"));
        store.add(ItemDescriptor::workout("t3", "Third"));

        let ids: Vec<String> = store
            .saved_workouts()
            .iter()
            .map(|item| item.id().to_string())
            .collect();
        assert_eq!(ids, vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn test_ties_order_latest_insert_first() {
        let repo = MemoryRepository::new();
        let mut store = FavoritesStore::with_clock(repo, frozen_clock());
        store.add(ItemDescriptor::meal_plan("a", "A"));
        store.add(ItemDescriptor::meal_plan("b", "B"));

        let plans = store.saved_meal_plans();
        assert_eq!(plans[0].id(), "b");
        assert_eq!(plans[1].id(), "a");
    }

    #[test]
    fn test_type_isolation() {
        let (mut store, _repo) = test_store();
        for i in 0..3 {
            store.add(ItemDescriptor::workout(format!("w{}", i), "W"));
            store.add(ItemDescriptor::meal_plan(format!("m{}", i), "M"));
        }

        assert!(store
            .saved_meal_plans()
            .iter()
            .all(|item| item.item_type() == ItemType::MealPlan));
        assert!(store
            .saved_workouts()
            .iter()
            .all(|item| item.item_type() == ItemType::Workout));
        assert_eq!(store.saved_meal_plans().len(), 3);
    }

    #[test]
    fn test_queries_do_not_mutate() {
        let (mut store, repo) = test_store();
        store.add(push_day());

        let mut listed = store.saved_workouts();
        listed.clear();

        assert_eq!(store.saved_workouts().len(), 1);
        assert_eq!(repo.write_count(), 1);
    }

    #[test]
    fn test_reload_from_repository() {
        let (mut store, repo) = test_store();
        store.add(push_day().with_kind(ItemKind::Workout {
            duration: Some("45 min".to_string()),
            difficulty: None,
            rating: Some(4.0),
        }));
        store.add(bulk_plan());
        let before: Vec<SavedItem> = store.items().to_vec();
        drop(store);

        let reloaded = FavoritesStore::open(repo);
        assert_eq!(reloaded.items(), before.as_slice());
    }

    #[test]
    fn test_reload_from_file_preserves_seconds() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(temp_dir.path().to_path_buf());

        let mut store = FavoritesStore::open(repo.clone());
        store.add(push_day());
        let saved_at = store.get("w1", ItemType::Workout).unwrap().saved_at;
        drop(store);

        let reloaded = FavoritesStore::open(repo);
        let loaded_at = reloaded.get("w1", ItemType::Workout).unwrap().saved_at;
        assert_eq!(loaded_at.timestamp(), saved_at.timestamp());
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let repo = MemoryRepository::with_snapshot("this is not json");
        let store = FavoritesStore::open(repo);
        assert!(store.is_empty());
    }

    #[test]
    fn test_partially_valid_snapshot_is_discarded() {
        let repo = MemoryRepository::with_snapshot(
            r#"[{"id":"w1","type":"workout","category":"","title":"Push Day","description":"","image":"","savedAt":"2025-01-01T00:00:00Z"},{"id":"w2"}]"#,
        );
        let store = FavoritesStore::open(repo);
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_with_epoch_millis_loads() {
        let repo = MemoryRepository::with_snapshot(
            r#"[{"id":"w1","type":"workout","category":"","title":"Push Day","description":"","image":"","savedAt":1700000000000}]"#,
        );
        let store = FavoritesStore::open(repo);

        assert_eq!(store.len(), 1);
        let saved = store.get("w1", ItemType::Workout).unwrap();
        assert_eq!(saved.saved_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_duplicate_keys_in_snapshot_collapse() {
        let record = r#"{"id":"w1","type":"workout","category":"","title":"Push Day","description":"","image":"","savedAt":"2025-01-01T00:00:00Z"}"#;
        let repo = MemoryRepository::with_snapshot(format!("[{},{}]", record, record));

        let store = FavoritesStore::open(repo);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let (mut store, repo) = test_store();
        repo.set_simulate_write_error(true);

        assert!(store.add(push_day()));
        assert!(store.is_favorite("w1", ItemType::Workout));
        assert!(repo.snapshot().is_none());

        repo.set_simulate_write_error(false);
        store.add(bulk_plan());
        let persisted = FavoritesStore::open(repo);
        assert_eq!(persisted.len(), 2);
    }

    #[test]
    fn test_every_mutation_rewrites_snapshot() {
        let (mut store, repo) = test_store();
        store.add(push_day());
        store.add(bulk_plan());
        store.remove("w1", ItemType::Workout);

        assert_eq!(repo.write_count(), 3);
        let reloaded = FavoritesStore::open(repo);
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.is_favorite("m1", ItemType::MealPlan));
    }
}
