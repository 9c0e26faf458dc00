pub mod accounts;
pub mod extractors;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::StoreError;

pub use accounts::Accounts;
pub use extractors::AuthenticatedUser;
pub use password::{hash_password_with_cost, verify_password};
pub use token::{Claims, TokenKeys};

lazy_static! {
    // Usernames become token subjects and ownership keys, so keep them to a plain charset.
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap();
}

/// Failures of registration, login and identity extraction.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("No token provided")]
    NoToken,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Token has expired")]
    Expired,
    #[error("Token claims are missing a username")]
    MalformedClaims,
    #[error("Failed to hash password: {0}")]
    HashFailure(String),
    #[error("Failed to generate token: {0}")]
    TokenIssue(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username; letters, digits, `_`, `.` and `-`, 3 to 32 characters.
    #[validate(
        length(min = 3, max = 32),
        regex(
            path = "USERNAME_REGEX",
            message = "Username may only contain letters, digits, underscores, dots or hyphens"
        )
    )]
    pub username: String,
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, max = 72))]
    pub password: String,
}

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response structure after a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    /// Bearer token valid for 24 hours.
    pub token: String,
}
