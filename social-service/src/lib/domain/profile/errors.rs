use thiserror::Error;

/// Error for EntryId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntryIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Skills parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SkillsError {
    #[error("Skills is required")]
    Empty,
}

/// Top-level error for all profile-related operations
#[derive(Debug, Clone, Error)]
pub enum ProfileError {
    #[error("Invalid entry ID: {0}")]
    InvalidEntryId(#[from] EntryIdError),

    #[error("Invalid skills: {0}")]
    InvalidSkills(#[from] SkillsError),

    #[error("There is no profile for this user")]
    NotFound(String),

    #[error("Profile entry not found: {0}")]
    EntryNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for ProfileError {
    fn from(err: anyhow::Error) -> Self {
        ProfileError::Unknown(err.to_string())
    }
}
