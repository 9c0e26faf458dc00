use actix_web::web;
use std::sync::Arc;

use super::password::{hash_password_with_cost, verify_password};
use super::{AuthError, TokenKeys};
use crate::models::User;
use crate::store::{StoreError, UserStore};

/// Registration, login and bearer-token resolution over a `UserStore`.
#[derive(Clone)]
pub struct Accounts {
    users: Arc<dyn UserStore>,
    keys: TokenKeys,
    bcrypt_cost: u32,
}

impl Accounts {
    pub fn new(users: Arc<dyn UserStore>, keys: TokenKeys, bcrypt_cost: u32) -> Self {
        Self {
            users,
            keys,
            bcrypt_cost,
        }
    }

    /// Creates an account. The plaintext password is only ever held in memory.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.users.find_user(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        // bcrypt is deliberately slow; keep it off the async worker thread.
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let password_hash = web::block(move || hash_password_with_cost(&password, cost))
            .await
            .map_err(|e| AuthError::HashFailure(e.to_string()))??;

        // The pre-check above can race with a concurrent registration; the store's
        // unique constraint has the final word.
        match self.users.insert_user(&User::new(username, password_hash)).await {
            Ok(()) => {
                log::info!("Registered user {}", username);
                Ok(())
            }
            Err(StoreError::DuplicateKey(_)) => Err(AuthError::UsernameTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Checks the credentials and issues a token carrying the username.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .users
            .find_user(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let matches = web::block(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::HashFailure(e.to_string()))?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        self.keys.issue(&user.username)
    }

    /// Resolves an `Authorization` header value to a username.
    pub fn extract_identity(&self, header: Option<&str>) -> Result<String, AuthError> {
        self.keys.extract_identity(header)
    }
}
