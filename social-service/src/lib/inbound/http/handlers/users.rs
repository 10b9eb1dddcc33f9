use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageResponseData;
use super::TokenResponseData;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserName;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::ValidationErrors;
use crate::inbound::http::validation::Validator;

/// Register an account and sign the new user in.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let Json(body) = body?;
    let command = body.try_into_command()?;

    let user = state.user_service.create_user(command).await?;
    let token = state.authenticator.issue_token(user.id)?;

    Ok(ApiSuccess::ok(TokenResponseData { token }))
}

/// Delete the caller's own account and profile.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let user_id = UserId::from_string(&user_id)
        .map_err(|_| ApiError::NotFound("User not found".to_string()))?;

    state
        .user_service
        .delete_user(&user_id, &caller.user_id)
        .await?;

    Ok(ApiSuccess::ok(MessageResponseData::new("User deleted")))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ValidationErrors> {
        let mut validator = Validator::new();

        let name = validator.check("name", UserName::new(self.name.unwrap_or_default()));
        let email = validator.check("email", EmailAddress::new(self.email.unwrap_or_default()));
        let password = validator.check(
            "password",
            Password::new(self.password.unwrap_or_default()),
        );

        validator.finish(
            name.zip(email)
                .zip(password)
                .map(|((name, email), password)| CreateUserCommand::new(name, email, password)),
        )
    }
}

/// Public view of an account; the password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponseData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl From<&User> for UserResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            avatar: user.avatar_url.clone(),
            date: user.created_at,
        }
    }
}
