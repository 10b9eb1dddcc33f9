use std::time::Duration;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SessionClaims;

/// Session token issuer and verifier.
///
/// Wraps a [`JwtHandler`] with a fixed session lifetime so that callers only
/// deal in user identifiers, never in raw claims.
pub struct Authenticator {
    jwt_handler: JwtHandler,
    session_ttl: chrono::Duration,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `session_ttl` - Lifetime of every issued token
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(jwt_secret: &[u8], session_ttl: Duration) -> Self {
        let seconds = i64::try_from(session_ttl.as_secs())
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);

        Self {
            jwt_handler: JwtHandler::new(jwt_secret),
            session_ttl: chrono::Duration::seconds(seconds),
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        self.session_ttl
    }

    /// Issue a signed session token for a user.
    ///
    /// # Arguments
    /// * `user_id` - Identifier embedded as `user.id`
    ///
    /// # Returns
    /// JWT token string valid for the configured lifetime
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, user_id: impl ToString) -> Result<String, JwtError> {
        let claims = SessionClaims::for_user(user_id, self.session_ttl);
        self.jwt_handler.encode(&claims)
    }

    /// Validate a session token and return the user identifier it carries.
    ///
    /// # Errors
    /// * `TokenExpired` - Token lifetime has elapsed
    /// * `InvalidToken` - Malformed token or foreign signature
    /// * `MissingClaim` - `exp` or `user.id` is absent or empty
    pub fn validate_token(&self, token: &str) -> Result<String, JwtError> {
        let claims: SessionClaims = self.jwt_handler.decode(token)?;

        claims
            .user_id()
            .map(str::to_string)
            .ok_or_else(|| JwtError::MissingClaim("user.id".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_issue_and_validate_token() {
        let authenticator = Authenticator::new(SECRET, Duration::from_secs(3600));

        let token = authenticator
            .issue_token("user123")
            .expect("Failed to issue token");

        let user_id = authenticator
            .validate_token(&token)
            .expect("Failed to validate token");
        assert_eq!(user_id, "user123");
    }

    #[test]
    fn test_session_ttl() {
        let authenticator = Authenticator::new(SECRET, Duration::from_secs(360_000));
        assert_eq!(authenticator.session_ttl(), chrono::Duration::hours(100));
    }

    #[test]
    fn test_validate_foreign_token() {
        let ours = Authenticator::new(SECRET, Duration::from_secs(3600));
        let theirs = Authenticator::new(b"another_secret_key_at_least_32_bytes", Duration::from_secs(3600));

        let token = theirs.issue_token("user123").unwrap();
        assert!(matches!(
            ours.validate_token(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_validate_expired_token() {
        let authenticator = Authenticator::new(SECRET, Duration::from_secs(3600));
        let issued = chrono::Utc::now() - chrono::Duration::hours(2);
        let claims = SessionClaims::issued_at("user123", issued, chrono::Duration::hours(1));
        let token = JwtHandler::new(SECRET).encode(&claims).unwrap();

        assert_eq!(
            authenticator.validate_token(&token),
            Err(JwtError::TokenExpired)
        );
    }

    #[test]
    fn test_validate_token_without_user() {
        let authenticator = Authenticator::new(SECRET, Duration::from_secs(3600));
        let mut claims = SessionClaims::for_user("ignored", chrono::Duration::hours(1));
        claims.user = None;
        let token = JwtHandler::new(SECRET).encode(&claims).unwrap();

        assert_eq!(
            authenticator.validate_token(&token),
            Err(JwtError::MissingClaim("user.id".to_string()))
        );
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = Authenticator::new(SECRET, Duration::from_secs(3600));

        let result = authenticator.validate_token("invalid.token.here");
        assert!(result.is_err());
    }
}
