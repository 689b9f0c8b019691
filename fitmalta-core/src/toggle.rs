//! The save/unsave action behind every favorite button.

use crate::account::{AuthProvider, SIGN_IN_PATH};
use crate::favorites::FavoritesStore;
use crate::models::ItemDescriptor;
use crate::storage::FavoritesRepository;

/// Result of pressing a favorite button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Nobody is signed in. The caller should navigate to `redirect_to`;
    /// the current location has been recorded with the auth provider.
    SignInRequired { redirect_to: String },
}

impl ToggleOutcome {
    /// Whether the item is saved after the toggle.
    pub fn is_saved(&self) -> Option<bool> {
        match self {
            ToggleOutcome::Added => Some(true),
            ToggleOutcome::Removed => Some(false),
            ToggleOutcome::SignInRequired { .. } => None,
        }
    }
}

/// Saves `item` if it is not saved yet, unsaves it otherwise.
///
/// Signed-out users are sent to sign in, with `current_location` kept as
/// the place to come back to. The store is not touched in that case.
pub fn toggle_favorite<A, R>(
    auth: &mut A,
    store: &mut FavoritesStore<R>,
    item: &ItemDescriptor,
    current_location: &str,
) -> ToggleOutcome
where
    A: AuthProvider,
    R: FavoritesRepository,
{
    if auth.current_user().is_none() {
        auth.set_return_to(current_location);
        return ToggleOutcome::SignInRequired {
            redirect_to: SIGN_IN_PATH.to_string(),
        };
    }

    if store.is_favorite(&item.id, item.item_type()) {
        store.remove(&item.id, item.item_type());
        ToggleOutcome::Removed
    } else {
        store.add(item.clone());
        ToggleOutcome::Added
    }
}
