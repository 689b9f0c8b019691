mod item_type;
mod saved_item;
mod user;

pub use item_type::ItemType;
pub use saved_item::{ItemDescriptor, ItemKind, SavedItem};
pub use user::{CurrentUser, UserType};
