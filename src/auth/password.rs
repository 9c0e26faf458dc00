use super::AuthError;
use bcrypt::{hash, verify};

/// Hashes with an explicit bcrypt work factor; lower costs keep tests fast.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AuthError> {
    hash(password, cost).map_err(|e| AuthError::HashFailure(e.to_string()))
}

/// Returns `false` on mismatch; an unreadable stored hash is also a mismatch.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    match verify(password, hashed_password) {
        Ok(matches) => matches,
        Err(e) => {
            log::warn!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}
