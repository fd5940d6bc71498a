//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: i32,
    /// Username, kept in the token so handlers can log it without a lookup.
    pub username: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: i32, username: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> i32 {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// User password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Username.
    pub username: String,
    /// User password.
    pub password: String,
    /// Preferred currency; falls back to the configured default.
    pub default_currency: Option<String>,
}

/// Token returned after successful authentication.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// Bearer access token.
    pub access_token: String,
    /// Token type, always "bearer".
    pub token_type: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

impl TokenResponse {
    /// Creates a new bearer token response.
    #[must_use]
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i32,
    /// Username.
    pub username: String,
    /// Default currency for reports and new records.
    pub default_currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_fields() {
        let expires_at = Utc::now() + Duration::hours(1);
        let claims = Claims::new(42, "alice", expires_at);

        assert_eq!(claims.user_id(), 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp, expires_at.timestamp());
        assert!(claims.iat <= claims.exp);
    }

    #[test]
    fn test_token_response_bearer() {
        let token = TokenResponse::bearer("abc".to_string(), 900);
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.expires_in, 900);
    }
}
