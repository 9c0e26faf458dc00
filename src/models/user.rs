use serde::{Deserialize, Serialize};

/// A registered account as persisted in the `users` collection.
///
/// The username is the primary key and is also the ownership key carried in
/// bearer tokens, so it is never changed once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// bcrypt hash; stored under the `password` field.
    #[serde(rename = "password")]
    pub password_hash: String,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}
