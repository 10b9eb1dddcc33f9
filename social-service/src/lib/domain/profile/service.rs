use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::profile::errors::ProfileError;
use crate::domain::profile::models::EntryId;
use crate::domain::profile::models::NewEducation;
use crate::domain::profile::models::NewExperience;
use crate::domain::profile::models::PopulatedProfile;
use crate::domain::profile::models::Profile;
use crate::domain::profile::models::ProfileDetails;
use crate::domain::profile::models::ProfileOwner;
use crate::domain::profile::ports::ProfileRepository;
use crate::domain::profile::ports::ProfileServicePort;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Domain service implementation for profile operations.
pub struct ProfileService<PR, UR>
where
    PR: ProfileRepository,
    UR: UserRepository,
{
    repository: Arc<PR>,
    user_repository: Arc<UR>,
}

impl<PR, UR> ProfileService<PR, UR>
where
    PR: ProfileRepository,
    UR: UserRepository,
{
    pub fn new(repository: Arc<PR>, user_repository: Arc<UR>) -> Self {
        Self {
            repository,
            user_repository,
        }
    }

    async fn populate(&self, profile: Profile) -> Result<PopulatedProfile, ProfileError> {
        let owner = self
            .user_repository
            .find_by_id(&profile.user)
            .await
            .map_err(|e| ProfileError::DatabaseError(e.to_string()))?
            .ok_or_else(|| ProfileError::UserNotFound(profile.user.to_string()))?;

        Ok(PopulatedProfile {
            owner: ProfileOwner::from(&owner),
            profile,
        })
    }

    async fn load(&self, user: &UserId) -> Result<PopulatedProfile, ProfileError> {
        let profile = self
            .repository
            .find_by_user(user)
            .await?
            .ok_or_else(|| ProfileError::NotFound(user.to_string()))?;

        self.populate(profile).await
    }

    async fn ensure_exists(&self, user: &UserId) -> Result<(), ProfileError> {
        match self.repository.find_by_user(user).await? {
            Some(_) => Ok(()),
            None => Err(ProfileError::NotFound(user.to_string())),
        }
    }
}

#[async_trait]
impl<PR, UR> ProfileServicePort for ProfileService<PR, UR>
where
    PR: ProfileRepository,
    UR: UserRepository,
{
    async fn get_profile(&self, user: &UserId) -> Result<PopulatedProfile, ProfileError> {
        self.load(user).await
    }

    async fn list_profiles(&self) -> Result<Vec<PopulatedProfile>, ProfileError> {
        let profiles = self.repository.list_all().await?;

        let user_ids: Vec<UserId> = profiles.iter().map(|profile| profile.user).collect();
        let owners: HashMap<UserId, ProfileOwner> = self
            .user_repository
            .find_by_ids(&user_ids)
            .await
            .map_err(|e| ProfileError::DatabaseError(e.to_string()))?
            .iter()
            .map(|user| (user.id, ProfileOwner::from(user)))
            .collect();

        // A profile whose owner vanished mid-request is skipped rather than failing the list.
        Ok(profiles
            .into_iter()
            .filter_map(|profile| {
                owners
                    .get(&profile.user)
                    .cloned()
                    .map(|owner| PopulatedProfile { profile, owner })
            })
            .collect())
    }

    async fn upsert_profile(
        &self,
        user: &UserId,
        details: ProfileDetails,
    ) -> Result<PopulatedProfile, ProfileError> {
        let profile = self.repository.upsert(user, details).await?;
        tracing::info!(user_id = %user, "Profile saved");

        self.populate(profile).await
    }

    async fn add_experience(
        &self,
        user: &UserId,
        experience: NewExperience,
    ) -> Result<PopulatedProfile, ProfileError> {
        let entry = experience.into_entry(EntryId::new());
        let entry_id = entry.id;

        if !self.repository.add_experience(user, entry).await? {
            return Err(ProfileError::NotFound(user.to_string()));
        }
        tracing::debug!(user_id = %user, entry_id = %entry_id, "Experience added");

        self.load(user).await
    }

    async fn remove_experience(
        &self,
        user: &UserId,
        entry: &EntryId,
    ) -> Result<PopulatedProfile, ProfileError> {
        self.ensure_exists(user).await?;

        if !self.repository.remove_experience(user, entry).await? {
            return Err(ProfileError::EntryNotFound(entry.to_string()));
        }
        tracing::debug!(user_id = %user, entry_id = %entry, "Experience removed");

        self.load(user).await
    }

    async fn add_education(
        &self,
        user: &UserId,
        education: NewEducation,
    ) -> Result<PopulatedProfile, ProfileError> {
        let entry = education.into_entry(EntryId::new());
        let entry_id = entry.id;

        if !self.repository.add_education(user, entry).await? {
            return Err(ProfileError::NotFound(user.to_string()));
        }
        tracing::debug!(user_id = %user, entry_id = %entry_id, "Education added");

        self.load(user).await
    }

    async fn remove_education(
        &self,
        user: &UserId,
        entry: &EntryId,
    ) -> Result<PopulatedProfile, ProfileError> {
        self.ensure_exists(user).await?;

        if !self.repository.remove_education(user, entry).await? {
            return Err(ProfileError::EntryNotFound(entry.to_string()));
        }
        tracing::debug!(user_id = %user, entry_id = %entry, "Education removed");

        self.load(user).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::profile::models::Education;
    use crate::domain::profile::models::Experience;
    use crate::domain::profile::models::Skills;
    use crate::domain::profile::models::SocialLinks;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserName;

    mock! {
        pub TestProfileRepository {}

        #[async_trait]
        impl ProfileRepository for TestProfileRepository {
            async fn upsert(&self, user: &UserId, details: ProfileDetails) -> Result<Profile, ProfileError>;
            async fn find_by_user(&self, user: &UserId) -> Result<Option<Profile>, ProfileError>;
            async fn list_all(&self) -> Result<Vec<Profile>, ProfileError>;
            async fn delete(&self, user: &UserId) -> Result<bool, ProfileError>;
            async fn add_experience(&self, user: &UserId, experience: Experience) -> Result<bool, ProfileError>;
            async fn remove_experience(&self, user: &UserId, entry: &EntryId) -> Result<bool, ProfileError>;
            async fn add_education(&self, user: &UserId, education: Education) -> Result<bool, ProfileError>;
            async fn remove_education(&self, user: &UserId, entry: &EntryId) -> Result<bool, ProfileError>;
        }
    }

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
            async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    fn user(id: UserId) -> User {
        User {
            id,
            name: UserName::new("Ada".to_string()).unwrap(),
            email: EmailAddress::new(format!("{}@example.com", id)).unwrap(),
            password_hash: "$argon2id$stub".to_string(),
            avatar_url: "https://avatar/ada".to_string(),
            created_at: Utc::now(),
        }
    }

    fn profile(owner: UserId) -> Profile {
        Profile {
            user: owner,
            company: None,
            location: None,
            bio: None,
            status: "Developer".to_string(),
            website: None,
            githubusername: None,
            skills: vec!["rust".to_string()],
            social: SocialLinks::default(),
            experience: vec![],
            education: vec![],
            updated_at: Utc::now(),
        }
    }

    fn users_returning_owner() -> MockTestUserRepository {
        let mut users = MockTestUserRepository::new();
        users.expect_find_by_id().returning(|id| Ok(Some(user(*id))));
        users
    }

    fn new_experience() -> NewExperience {
        NewExperience {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: None,
            from: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            to: None,
            current: true,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_get_profile_is_populated() {
        let owner = UserId::new();
        let mut profiles = MockTestProfileRepository::new();
        profiles
            .expect_find_by_user()
            .with(eq(owner))
            .returning(|id| Ok(Some(profile(*id))));

        let service = ProfileService::new(Arc::new(profiles), Arc::new(users_returning_owner()));

        let populated = service.get_profile(&owner).await.unwrap();
        assert_eq!(populated.owner.id, owner);
        assert_eq!(populated.owner.name, "Ada");
    }

    #[tokio::test]
    async fn test_get_profile_missing() {
        let mut profiles = MockTestProfileRepository::new();
        profiles.expect_find_by_user().returning(|_| Ok(None));

        let service = ProfileService::new(
            Arc::new(profiles),
            Arc::new(MockTestUserRepository::new()),
        );

        let result = service.get_profile(&UserId::new()).await;
        assert!(matches!(result, Err(ProfileError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_upsert_profile() {
        let owner = UserId::new();
        let mut profiles = MockTestProfileRepository::new();
        profiles
            .expect_upsert()
            .withf(|_, details| details.status == "Student" && details.skills.as_slice() == ["go"])
            .times(1)
            .returning(|id, details| {
                let mut saved = profile(*id);
                saved.status = details.status;
                saved.skills = details.skills.into_inner();
                Ok(saved)
            });

        let service = ProfileService::new(Arc::new(profiles), Arc::new(users_returning_owner()));

        let details = ProfileDetails {
            company: None,
            location: None,
            bio: None,
            status: "Student".to_string(),
            website: None,
            githubusername: None,
            skills: Skills::parse("go").unwrap(),
            social: SocialLinks::default(),
        };

        let populated = service.upsert_profile(&owner, details).await.unwrap();
        assert_eq!(populated.profile.status, "Student");
    }

    #[tokio::test]
    async fn test_list_profiles_skips_orphans() {
        let alive = UserId::new();
        let orphan = UserId::new();

        let mut profiles = MockTestProfileRepository::new();
        profiles
            .expect_list_all()
            .returning(move || Ok(vec![profile(alive), profile(orphan)]));

        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_ids()
            .returning(move |_| Ok(vec![user(alive)]));

        let service = ProfileService::new(Arc::new(profiles), Arc::new(users));

        let listed = service.list_profiles().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].owner.id, alive);
    }

    #[tokio::test]
    async fn test_add_experience_without_profile() {
        let mut profiles = MockTestProfileRepository::new();
        profiles
            .expect_add_experience()
            .times(1)
            .returning(|_, _| Ok(false));

        let service = ProfileService::new(
            Arc::new(profiles),
            Arc::new(MockTestUserRepository::new()),
        );

        let result = service.add_experience(&UserId::new(), new_experience()).await;
        assert!(matches!(result, Err(ProfileError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_experience_returns_profile() {
        let owner = UserId::new();
        let mut profiles = MockTestProfileRepository::new();
        profiles
            .expect_add_experience()
            .withf(|_, entry| entry.title == "Engineer")
            .times(1)
            .returning(|_, _| Ok(true));
        profiles.expect_find_by_user().returning(|id| {
            let mut saved = profile(*id);
            saved.experience = vec![new_experience().into_entry(EntryId::new())];
            Ok(Some(saved))
        });

        let service = ProfileService::new(Arc::new(profiles), Arc::new(users_returning_owner()));

        let populated = service
            .add_experience(&owner, new_experience())
            .await
            .unwrap();
        assert_eq!(populated.profile.experience.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_unknown_experience() {
        let mut profiles = MockTestProfileRepository::new();
        profiles
            .expect_find_by_user()
            .returning(|id| Ok(Some(profile(*id))));
        profiles
            .expect_remove_experience()
            .times(1)
            .returning(|_, _| Ok(false));

        let service = ProfileService::new(
            Arc::new(profiles),
            Arc::new(MockTestUserRepository::new()),
        );

        let result = service
            .remove_experience(&UserId::new(), &EntryId::new())
            .await;
        assert!(matches!(result, Err(ProfileError::EntryNotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_education_without_profile() {
        let mut profiles = MockTestProfileRepository::new();
        profiles.expect_find_by_user().returning(|_| Ok(None));
        profiles.expect_remove_education().times(0);

        let service = ProfileService::new(
            Arc::new(profiles),
            Arc::new(MockTestUserRepository::new()),
        );

        let result = service
            .remove_education(&UserId::new(), &EntryId::new())
            .await;
        assert!(matches!(result, Err(ProfileError::NotFound(_))));
    }
}
