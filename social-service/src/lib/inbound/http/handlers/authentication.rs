use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::users::UserResponseData;
use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::ValidationErrors;
use crate::inbound::http::validation::Validator;

/// Exchange an email and password for a session token.
///
/// Unknown email and wrong password produce the same response.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let Json(body) = body?;
    let (email, password) = body.try_into_parts()?;

    let user = state.user_service.authenticate(&email, &password).await?;
    let token = state.authenticator.issue_token(user.id)?;

    tracing::debug!(user_id = %user.id, "User signed in");
    Ok(ApiSuccess::ok(TokenResponseData { token }))
}

/// Return the authenticated caller's account.
pub async fn current_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let user = state.user_service.get_user(&caller.user_id).await?;
    Ok(ApiSuccess::ok((&user).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

impl LoginRequest {
    fn try_into_parts(self) -> Result<(EmailAddress, String), ValidationErrors> {
        let mut validator = Validator::new();

        let email = validator.check("email", EmailAddress::new(self.email.unwrap_or_default()));
        // Only presence is checked; the stored digest decides the rest.
        let password = match self.password {
            Some(password) if !password.is_empty() => Some(password),
            _ => validator.required("password", None, "Password is required"),
        };

        validator.finish(email.zip(password))
    }
}
