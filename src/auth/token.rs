use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AuthError;

/// Lifetime of an issued token.
pub const TOKEN_VALIDITY_HOURS: i64 = 24;

/// Represents the claims encoded within a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Username of the token holder; also the ownership key for tasks.
    pub username: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// HS256 signing and verification keys derived from the configured secret.
///
/// Built once at startup and shared through the application state, so the
/// secret is never re-read from the environment per request.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Issues a token for `username` that expires 24 hours from now.
    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        self.issue_at(username, Utc::now())
    }

    /// Issues a token as if the current time were `issued_at`.
    pub fn issue_at(&self, username: &str, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let expiration = issued_at + Duration::hours(TOKEN_VALIDITY_HOURS);
        let claims = Claims {
            username: username.to_string(),
            exp: expiration.timestamp().max(0) as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Verifies the signature and expiry of `token` and decodes its claims.
    ///
    /// Claims are decoded loosely first so that a well-signed token with a missing
    /// or non-string `username` is reported as malformed rather than invalid.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Map<String, Value>>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::MissingRequiredClaim(_) => AuthError::MalformedClaims,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        let username = data
            .claims
            .get("username")
            .and_then(Value::as_str)
            .ok_or(AuthError::MalformedClaims)?;
        let exp = data
            .claims
            .get("exp")
            .and_then(Value::as_u64)
            .ok_or(AuthError::MalformedClaims)?;

        Ok(Claims {
            username: username.to_string(),
            exp: exp as usize,
        })
    }

    /// Resolves an `Authorization` header value to the username it carries.
    ///
    /// A leading `Bearer ` is stripped when present; a bare token is accepted too.
    pub fn extract_identity(&self, header: Option<&str>) -> Result<String, AuthError> {
        let value = header.map(str::trim).unwrap_or_default();
        let token = match value.strip_prefix("Bearer") {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
            _ => value,
        };
        if token.is_empty() {
            return Err(AuthError::NoToken);
        }

        self.verify(token).map(|claims| claims.username)
    }
}
