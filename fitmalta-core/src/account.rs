//! Authentication collaborator.
//!
//! The favorites feature only needs to know whether someone is signed in,
//! and a way to remember where to send them back after they sign in.

use serde::{Deserialize, Serialize};

use crate::models::CurrentUser;

/// Route of the account / sign-in entry point.
pub const SIGN_IN_PATH: &str = "/account";

/// What callers of the favorites feature need from authentication.
pub trait AuthProvider {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<&CurrentUser>;

    /// Records a location to resume once the user has signed in.
    fn set_return_to(&mut self, path: &str);
}

/// A local sign-in session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub user: Option<CurrentUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_to: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Signs `user` in and hands back the pending return location, if one
    /// was recorded. The pending location is cleared.
    pub fn sign_in(&mut self, user: CurrentUser) -> Option<String> {
        self.user = Some(user);
        self.return_to.take()
    }

    /// Signs out. Returns the user that was signed in.
    pub fn sign_out(&mut self) -> Option<CurrentUser> {
        self.user.take()
    }
}

impl AuthProvider for Session {
    fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    fn set_return_to(&mut self, path: &str) {
        self.return_to = Some(path.to_string());
    }
}
