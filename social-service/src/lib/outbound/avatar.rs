use sha2::Digest;
use sha2::Sha256;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::ports::AvatarProvider;

const GRAVATAR_BASE_URL: &str = "https://www.gravatar.com/avatar";

/// Gravatar URL derivation: 200px, PG-rated, "mystery person" fallback.
#[derive(Debug, Clone)]
pub struct GravatarProvider {
    base_url: String,
}

impl GravatarProvider {
    pub fn new() -> Self {
        Self {
            base_url: GRAVATAR_BASE_URL.to_string(),
        }
    }
}

impl Default for GravatarProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarProvider for GravatarProvider {
    fn avatar_url(&self, email: &EmailAddress) -> String {
        // EmailAddress is already trimmed and lower-cased.
        let digest = Sha256::digest(email.as_str().as_bytes());

        format!("{}/{}?s=200&r=pg&d=mm", self.base_url, hex::encode(digest))
    }
}
