use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::profile::errors::ProfileError;
use crate::domain::profile::models::Education;
use crate::domain::profile::models::EntryId;
use crate::domain::profile::models::Experience;
use crate::domain::profile::models::Profile;
use crate::domain::profile::models::ProfileDetails;
use crate::domain::profile::ports::ProfileRepository;
use crate::domain::user::models::UserId;

/// Profile store kept in process memory.
///
/// Owner existence is not checked here; the service resolves owners on read.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: Arc<RwLock<HashMap<UserId, Profile>>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn upsert(
        &self,
        user: &UserId,
        details: ProfileDetails,
    ) -> Result<Profile, ProfileError> {
        let mut profiles = self.profiles.write().await;

        let (experience, education) = profiles
            .remove(user)
            .map(|existing| (existing.experience, existing.education))
            .unwrap_or_default();

        let profile = Profile {
            user: *user,
            company: details.company,
            location: details.location,
            bio: details.bio,
            status: details.status,
            website: details.website,
            githubusername: details.githubusername,
            skills: details.skills.into_inner(),
            social: details.social,
            experience,
            education,
            updated_at: Utc::now(),
        };

        profiles.insert(*user, profile.clone());
        Ok(profile)
    }

    async fn find_by_user(&self, user: &UserId) -> Result<Option<Profile>, ProfileError> {
        Ok(self.profiles.read().await.get(user).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Profile>, ProfileError> {
        let mut profiles: Vec<Profile> = self.profiles.read().await.values().cloned().collect();
        profiles.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(profiles)
    }

    async fn delete(&self, user: &UserId) -> Result<bool, ProfileError> {
        Ok(self.profiles.write().await.remove(user).is_some())
    }

    async fn add_experience(
        &self,
        user: &UserId,
        experience: Experience,
    ) -> Result<bool, ProfileError> {
        match self.profiles.write().await.get_mut(user) {
            Some(profile) => {
                profile.experience.insert(0, experience);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_experience(
        &self,
        user: &UserId,
        entry: &EntryId,
    ) -> Result<bool, ProfileError> {
        let mut profiles = self.profiles.write().await;
        let Some(profile) = profiles.get_mut(user) else {
            return Ok(false);
        };

        let before = profile.experience.len();
        profile.experience.retain(|item| item.id != *entry);
        Ok(profile.experience.len() < before)
    }

    async fn add_education(
        &self,
        user: &UserId,
        education: Education,
    ) -> Result<bool, ProfileError> {
        match self.profiles.write().await.get_mut(user) {
            Some(profile) => {
                profile.education.insert(0, education);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_education(
        &self,
        user: &UserId,
        entry: &EntryId,
    ) -> Result<bool, ProfileError> {
        let mut profiles = self.profiles.write().await;
        let Some(profile) = profiles.get_mut(user) else {
            return Ok(false);
        };

        let before = profile.education.len();
        profile.education.retain(|item| item.id != *entry);
        Ok(profile.education.len() < before)
    }
}
