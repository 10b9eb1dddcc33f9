use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity carried inside a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserClaim {
    pub id: String,
}

/// Session token payload.
///
/// Serialises as `{"user": {"id": "..."}, "iat": ..., "exp": ...}`.
/// `user` is optional on the wire so that a token lacking it can be decoded
/// and reported as a missing claim rather than a generic decoding failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserClaim>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims for a user, issued now and valid for `ttl`.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `ttl` - Token lifetime
    ///
    /// # Returns
    /// Claims with user, iat and exp set
    pub fn for_user(user_id: impl ToString, ttl: Duration) -> Self {
        Self::issued_at(user_id, Utc::now(), ttl)
    }

    /// Create claims for a user with an explicit issue time.
    pub fn issued_at(user_id: impl ToString, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        let expiration = issued_at + ttl;

        Self {
            user: Some(UserClaim {
                id: user_id.to_string(),
            }),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Get the user identifier, if the claim is present and non-empty.
    pub fn user_id(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|user| user.id.trim())
            .filter(|id| !id.is_empty())
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
