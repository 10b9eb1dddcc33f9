use thiserror::Error;

/// Error type for ownership checks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("User not authorized")]
    NotOwner,
}

/// Check that the caller owns a resource.
///
/// Identifiers are compared as strings, trimmed and ASCII lower-cased, so a
/// typed id (e.g. a UUID) and the string pulled from a token compare equal.
///
/// # Errors
/// * `NotOwner` - Owner and caller differ
pub fn ensure_owner(owner: impl ToString, caller: impl ToString) -> Result<(), OwnershipError> {
    if normalize(&owner.to_string()) == normalize(&caller.to_string()) {
        Ok(())
    } else {
        Err(OwnershipError::NotOwner)
    }
}

fn normalize(id: &str) -> String {
    id.trim().to_ascii_lowercase()
}
