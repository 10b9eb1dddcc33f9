use async_trait::async_trait;

use crate::domain::profile::errors::ProfileError;
use crate::domain::profile::models::Education;
use crate::domain::profile::models::EntryId;
use crate::domain::profile::models::Experience;
use crate::domain::profile::models::NewEducation;
use crate::domain::profile::models::NewExperience;
use crate::domain::profile::models::PopulatedProfile;
use crate::domain::profile::models::Profile;
use crate::domain::profile::models::ProfileDetails;
use crate::domain::user::models::UserId;

/// Port for profile domain service operations.
///
/// Every mutation acts on the caller's own profile; the caller is passed in
/// from the authenticated request, never from the body.
#[async_trait]
pub trait ProfileServicePort: Send + Sync + 'static {
    /// # Errors
    /// * `NotFound` - User has no profile
    async fn get_profile(&self, user: &UserId) -> Result<PopulatedProfile, ProfileError>;

    async fn list_profiles(&self) -> Result<Vec<PopulatedProfile>, ProfileError>;

    /// Create the profile or replace its scalar fields.
    ///
    /// # Errors
    /// * `UserNotFound` - Owner account no longer exists
    async fn upsert_profile(
        &self,
        user: &UserId,
        details: ProfileDetails,
    ) -> Result<PopulatedProfile, ProfileError>;

    /// Prepend an experience entry.
    ///
    /// # Errors
    /// * `NotFound` - User has no profile
    async fn add_experience(
        &self,
        user: &UserId,
        experience: NewExperience,
    ) -> Result<PopulatedProfile, ProfileError>;

    /// # Errors
    /// * `NotFound` - User has no profile
    /// * `EntryNotFound` - No experience entry with this id on the profile
    async fn remove_experience(
        &self,
        user: &UserId,
        entry: &EntryId,
    ) -> Result<PopulatedProfile, ProfileError>;

    async fn add_education(
        &self,
        user: &UserId,
        education: NewEducation,
    ) -> Result<PopulatedProfile, ProfileError>;

    async fn remove_education(
        &self,
        user: &UserId,
        entry: &EntryId,
    ) -> Result<PopulatedProfile, ProfileError>;
}

/// Persistence operations for profiles.
///
/// Entry additions and removals are single atomic operations on the store.
#[async_trait]
pub trait ProfileRepository: Send + Sync + 'static {
    /// Insert or replace the scalar fields of a profile.
    ///
    /// # Errors
    /// * `UserNotFound` - Owner does not exist
    /// * `DatabaseError` - Database operation failed
    async fn upsert(&self, user: &UserId, details: ProfileDetails)
        -> Result<Profile, ProfileError>;

    async fn find_by_user(&self, user: &UserId) -> Result<Option<Profile>, ProfileError>;

    async fn list_all(&self) -> Result<Vec<Profile>, ProfileError>;

    /// Remove a profile and its entries.
    ///
    /// # Returns
    /// `false` when there was no profile
    async fn delete(&self, user: &UserId) -> Result<bool, ProfileError>;

    /// # Returns
    /// `false` when the user has no profile
    async fn add_experience(
        &self,
        user: &UserId,
        experience: Experience,
    ) -> Result<bool, ProfileError>;

    /// # Returns
    /// `false` when no such entry exists on the user's profile
    async fn remove_experience(&self, user: &UserId, entry: &EntryId)
        -> Result<bool, ProfileError>;

    async fn add_education(&self, user: &UserId, education: Education)
        -> Result<bool, ProfileError>;

    async fn remove_education(&self, user: &UserId, entry: &EntryId)
        -> Result<bool, ProfileError>;
}
