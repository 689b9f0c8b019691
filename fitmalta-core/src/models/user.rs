use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a signed-in account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    Member,
    Trainer,
    Gym,
    Admin,
    SuperAdmin,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Member => write!(f, "member"),
            UserType::Trainer => write!(f, "trainer"),
            UserType::Gym => write!(f, "gym"),
            UserType::Admin => write!(f, "admin"),
            UserType::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(UserType::Member),
            "trainer" => Ok(UserType::Trainer),
            "gym" => Ok(UserType::Gym),
            "admin" => Ok(UserType::Admin),
            "super_admin" | "super-admin" => Ok(UserType::SuperAdmin),
            _ => Err(format!(
                "Invalid user type '{}'. Valid options: member, trainer, gym, admin, super_admin",
                s
            )),
        }
    }
}

/// The identity exposed by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub name: String,
    pub user_type: UserType,
}

impl CurrentUser {
    pub fn new(name: impl Into<String>, user_type: UserType) -> Self {
        Self {
            name: name.into(),
            user_type,
        }
    }
}
