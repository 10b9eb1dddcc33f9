use thiserror::Error;

/// Error for PostId / CommentId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for post or comment body validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostTextError {
    #[error("Text is required")]
    Empty,
}

/// Top-level error for all post-related operations
#[derive(Debug, Clone, Error)]
pub enum PostError {
    #[error("Invalid text: {0}")]
    InvalidText(#[from] PostTextError),

    #[error("Post not found")]
    NotFound(String),

    #[error("Comment does not exist")]
    CommentNotFound(String),

    #[error("Post already liked")]
    AlreadyLiked,

    #[error("User not authorized")]
    NotAuthorized,

    #[error("User not found: {0}")]
    AuthorNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for PostError {
    fn from(err: anyhow::Error) -> Self {
        PostError::Unknown(err.to_string())
    }
}

impl From<auth::OwnershipError> for PostError {
    fn from(_: auth::OwnershipError) -> Self {
        PostError::NotAuthorized
    }
}
