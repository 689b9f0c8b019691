use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::item_type::ItemType;

/// Type-specific attributes of an item.
///
/// Serialized flat next to the common fields, with the variant written to
/// the `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ItemKind {
    MealPlan {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        calories: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        protein: Option<String>,
    },
    Workout {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        difficulty: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rating: Option<f32>,
    },
}

impl ItemKind {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemKind::MealPlan { .. } => ItemType::MealPlan,
            ItemKind::Workout { .. } => ItemType::Workout,
        }
    }
}

/// A meal plan or workout as offered by the platform, before it is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    pub id: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl ItemDescriptor {
    /// Creates a meal plan descriptor with empty display metadata.
    pub fn meal_plan(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(
            id,
            title,
            ItemKind::MealPlan {
                calories: None,
                protein: None,
            },
        )
    }

    /// Creates a workout descriptor with empty display metadata.
    pub fn workout(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(
            id,
            title,
            ItemKind::Workout {
                duration: None,
                difficulty: None,
                rating: None,
            },
        )
    }

    fn new(id: impl Into<String>, title: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            category: String::new(),
            title: title.into(),
            description: String::new(),
            image: String::new(),
            kind,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }

    /// Returns true if this descriptor is identified by `(id, item_type)`.
    pub fn matches(&self, id: &str, item_type: ItemType) -> bool {
        self.id == id && self.item_type() == item_type
    }
}

impl From<SavedItem> for ItemDescriptor {
    /// Drops the timestamp; the store assigns its own on insertion.
    fn from(saved: SavedItem) -> Self {
        saved.item
    }
}

impl fmt::Display for ItemDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.len()))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Type: {}", self.item_type())?;
        if !self.category.is_empty() {
            writeln!(f, "Category: {}", self.category)?;
        }

        match &self.kind {
            ItemKind::MealPlan { calories, protein } => {
                if let Some(calories) = calories {
                    writeln!(f, "Calories: {} kcal", calories)?;
                }
                if let Some(protein) = protein {
                    writeln!(f, "Protein: {}", protein)?;
                }
            }
            ItemKind::Workout {
                duration,
                difficulty,
                rating,
            } => {
                if let Some(duration) = duration {
                    writeln!(f, "Duration: {}", duration)?;
                }
                if let Some(difficulty) = difficulty {
                    writeln!(f, "Difficulty: {}", difficulty)?;
                }
                if let Some(rating) = rating {
                    writeln!(f, "Rating: {:.1}", rating)?;
                }
            }
        }

        if !self.description.is_empty() {
            writeln!(f, "\n{}", self.description)?;
        }

        Ok(())
    }
}

/// A favorite: an item descriptor stamped with the time it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    #[serde(flatten)]
    pub item: ItemDescriptor,
    /// Written as RFC 3339. Epoch milliseconds are accepted on read.
    #[serde(deserialize_with = "deserialize_saved_at")]
    pub saved_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SavedAtRepr {
    Text(DateTime<Utc>),
    Millis(i64),
}

fn deserialize_saved_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match SavedAtRepr::deserialize(deserializer)? {
        SavedAtRepr::Text(at) => Ok(at),
        SavedAtRepr::Millis(ms) => DateTime::from_timestamp_millis(ms).ok_or_else(|| {
            serde::de::Error::custom(format!("savedAt out of range: {}", ms))
        }),
    }
}

impl SavedItem {
    pub fn new(item: ItemDescriptor, saved_at: DateTime<Utc>) -> Self {
        Self { item, saved_at }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn item_type(&self) -> ItemType {
        self.item.item_type()
    }

    pub fn matches(&self, id: &str, item_type: ItemType) -> bool {
        self.item.matches(id, item_type)
    }
}
