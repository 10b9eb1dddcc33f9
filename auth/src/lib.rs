//! Authentication utilities library
//!
//! Provides the credential and session primitives used by the social service:
//! - Password hashing (Argon2id)
//! - Session token issuance and validation (JWT, HS256)
//! - Ownership checks on user-owned resources
//!
//! The service defines its own ports and adapts these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use std::time::Duration;
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::from_secs(3600));
//! let token = auth.issue_token("user123").unwrap();
//! assert_eq!(auth.validate_token(&token).unwrap(), "user123");
//! ```
//!
//! ## Ownership
//! ```
//! use auth::{ensure_owner, OwnershipError};
//!
//! assert!(ensure_owner("user123", "user123").is_ok());
//! assert_eq!(ensure_owner("user123", "intruder"), Err(OwnershipError::NotOwner));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod ownership;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use jwt::UserClaim;
pub use ownership::ensure_owner;
pub use ownership::OwnershipError;
pub use password::PasswordError;
pub use password::PasswordHasher;
