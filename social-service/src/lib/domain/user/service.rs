use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::profile::ports::ProfileRepository;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::AvatarProvider;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR, PR, AP>
where
    UR: UserRepository,
    PR: ProfileRepository,
    AP: AvatarProvider,
{
    repository: Arc<UR>,
    profile_repository: Arc<PR>,
    avatar_provider: Arc<AP>,
    password_hasher: auth::PasswordHasher,
}

impl<UR, PR, AP> UserService<UR, PR, AP>
where
    UR: UserRepository,
    PR: ProfileRepository,
    AP: AvatarProvider,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store
    /// * `profile_repository` - Profile store, cleared on account deletion
    /// * `avatar_provider` - Avatar URL derivation
    /// * `password_hasher` - Hasher configured with the deployment's work factor
    pub fn new(
        repository: Arc<UR>,
        profile_repository: Arc<PR>,
        avatar_provider: Arc<AP>,
        password_hasher: auth::PasswordHasher,
    ) -> Self {
        Self {
            repository,
            profile_repository,
            avatar_provider,
            password_hasher,
        }
    }
}

#[async_trait]
impl<UR, PR, AP> UserServicePort for UserService<UR, PR, AP>
where
    UR: UserRepository,
    PR: ProfileRepository,
    AP: AvatarProvider,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        // Fast path; the store's uniqueness constraint settles concurrent registrations.
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.password_hasher.hash(command.password.as_str())?;

        let user = User {
            id: UserId::new(),
            avatar_url: self.avatar_provider.avatar_url(&command.email),
            name: command.name,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn authenticate(&self, email: &EmailAddress, password: &str) -> Result<User, UserError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            // Unknown accounts pay for a hash too, so timing does not reveal registration.
            self.password_hasher.verify_missing(password);
            tracing::debug!("Login rejected: unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !self.password_hasher.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn delete_user(&self, id: &UserId, caller: &UserId) -> Result<(), UserError> {
        auth::ensure_owner(id, caller)?;

        // The account goes first; a failure here leaves both records in place.
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        // Stores that cascade from users have nothing left to remove.
        if self.profile_repository.delete(id).await? {
            tracing::debug!(user_id = %id, "Profile deleted");
        }

        Ok(())
    }
}
