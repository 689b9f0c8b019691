use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discriminant of a saved item. Together with the item id it forms the
/// key of a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    MealPlan,
    Workout,
}

impl ItemType {
    /// Route of the listing page for this type of item.
    pub fn collection_path(&self) -> &'static str {
        match self {
            ItemType::MealPlan => "/meal-plans",
            ItemType::Workout => "/workouts",
        }
    }

    /// Location of a single item, used as the return target after sign-in.
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.collection_path(), id)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::MealPlan => write!(f, "meal-plan"),
            ItemType::Workout => write!(f, "workout"),
        }
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "meal-plan" | "mealplan" | "meal_plan" => Ok(ItemType::MealPlan),
            "workout" => Ok(ItemType::Workout),
            _ => Err(format!(
                "Invalid item type '{}'. Valid options: meal-plan, workout",
                s
            )),
        }
    }
}
