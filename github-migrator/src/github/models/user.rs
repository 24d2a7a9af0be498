//! Users and organisation members.

use serde::{Deserialize, Deserializer, Serialize};

/// Login GitHub substitutes for deleted accounts.
pub const GHOST_LOGIN: &str = "ghost";

/// A GitHub account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub html_url: String,
}

impl User {
    /// Creates a user from its login.
    #[must_use]
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            html_url: String::new(),
        }
    }

    /// The placeholder account for deleted users.
    #[must_use]
    pub fn ghost() -> Self {
        Self::new(GHOST_LOGIN)
    }
}

/// Deserializes a possibly `null` user, substituting [`User::ghost`].
pub(crate) fn user_or_ghost<'de, D>(deserializer: D) -> Result<User, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<User>::deserialize(deserializer)?.unwrap_or_else(User::ghost))
}
