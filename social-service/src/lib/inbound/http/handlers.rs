use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use super::validation::FieldError;
use super::validation::ValidationErrors;
use crate::domain::post::errors::PostError;
use crate::domain::profile::errors::ProfileError;
use crate::domain::user::errors::UserError;

pub mod authentication;
pub mod posts;
pub mod profiles;
pub mod users;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }

    pub fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, data)
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Validation(Vec<FieldError>),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    InternalServerError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(ValidationErrors(errors): ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<auth::JwtError> for ApiError {
    fn from(e: auth::JwtError) -> Self {
        Self::InternalServerError(format!("Token generation failed: {}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let errors = match self {
            ApiError::Validation(errors) => errors,
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                vec![FieldError::new("Server error")]
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => vec![FieldError::new(msg)],
        };

        (status, Json(ApiErrorBody { errors })).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub errors: Vec<FieldError>,
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidName(e) => {
                ApiError::Validation(vec![FieldError::for_param("name", e.to_string())])
            }
            UserError::InvalidEmail(e) => {
                ApiError::Validation(vec![FieldError::for_param("email", e.to_string())])
            }
            UserError::InvalidPassword(e) => {
                ApiError::Validation(vec![FieldError::for_param("password", e.to_string())])
            }
            UserError::InvalidUserId(_) | UserError::NotFound(_) => {
                ApiError::NotFound("User not found".to_string())
            }
            UserError::EmailAlreadyExists(_) | UserError::InvalidCredentials => {
                ApiError::BadRequest(err.to_string())
            }
            UserError::NotAuthorized => ApiError::Forbidden(err.to_string()),
            UserError::Password(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::InvalidSkills(e) => {
                ApiError::Validation(vec![FieldError::for_param("skills", e.to_string())])
            }
            ProfileError::InvalidEntryId(_) | ProfileError::EntryNotFound(_) => {
                ApiError::NotFound("Entry not found".to_string())
            }
            ProfileError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ProfileError::UserNotFound(_) => ApiError::NotFound("User not found".to_string()),
            ProfileError::DatabaseError(_) | ProfileError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::InvalidText(e) => {
                ApiError::Validation(vec![FieldError::for_param("text", e.to_string())])
            }
            PostError::NotFound(_) | PostError::CommentNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            PostError::AuthorNotFound(_) => ApiError::NotFound("User not found".to_string()),
            PostError::AlreadyLiked => ApiError::BadRequest(err.to_string()),
            PostError::NotAuthorized => ApiError::Forbidden(err.to_string()),
            PostError::DatabaseError(_) | PostError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

/// Body returned by registration and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub token: String,
}

/// Body returned by deletions that have nothing else to report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponseData {
    pub msg: String,
}

impl MessageResponseData {
    pub fn new(msg: &str) -> Self {
        Self {
            msg: msg.to_string(),
        }
    }
}
