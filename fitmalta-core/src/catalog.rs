//! Meal plans and workouts offered by the platform.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{ItemDescriptor, ItemType};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate catalog entry: {0} '{1}'")]
    DuplicateEntry(ItemType, String),
}

/// A read-only list of item descriptors, unique per `(id, type)`.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<ItemDescriptor>,
}

impl Catalog {
    /// The catalog bundled with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let items: Vec<ItemDescriptor> = serde_json::from_str(text)?;
        Self::from_items(items)
    }

    pub fn from_items(items: Vec<ItemDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert((item.id.as_str(), item.item_type())) {
                return Err(CatalogError::DuplicateEntry(
                    item.item_type(),
                    item.id.clone(),
                ));
            }
        }
        Ok(Self { items })
    }

    pub fn find(&self, id: &str, item_type: ItemType) -> Option<&ItemDescriptor> {
        self.items.iter().find(|item| item.matches(id, item_type))
    }

    pub fn items_of(&self, item_type: ItemType) -> impl Iterator<Item = &ItemDescriptor> {
        self.items
            .iter()
            .filter(move |item| item.item_type() == item_type)
    }

    pub fn all(&self) -> &[ItemDescriptor] {
        &self.items
    }
}
