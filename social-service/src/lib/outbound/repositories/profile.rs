use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::profile::errors::ProfileError;
use crate::domain::profile::models::Education;
use crate::domain::profile::models::EntryId;
use crate::domain::profile::models::Experience;
use crate::domain::profile::models::Profile;
use crate::domain::profile::models::ProfileDetails;
use crate::domain::profile::models::SocialLinks;
use crate::domain::profile::ports::ProfileRepository;
use crate::domain::user::models::UserId;

const PROFILE_COLUMNS: &str = "user_id, company, location, bio, status, website, githubusername, \
                               skills, youtube, twitter, facebook, linkedin, instagram, updated_at";

fn db_error(e: sqlx::Error) -> ProfileError {
    ProfileError::DatabaseError(e.to_string())
}

pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Profile row without its entries.
    fn row_to_profile(row: &PgRow) -> Result<Profile, ProfileError> {
        Ok(Profile {
            user: UserId(row.try_get("user_id").map_err(db_error)?),
            company: row.try_get("company").map_err(db_error)?,
            location: row.try_get("location").map_err(db_error)?,
            bio: row.try_get("bio").map_err(db_error)?,
            status: row.try_get("status").map_err(db_error)?,
            website: row.try_get("website").map_err(db_error)?,
            githubusername: row.try_get("githubusername").map_err(db_error)?,
            skills: row.try_get("skills").map_err(db_error)?,
            social: SocialLinks {
                youtube: row.try_get("youtube").map_err(db_error)?,
                twitter: row.try_get("twitter").map_err(db_error)?,
                facebook: row.try_get("facebook").map_err(db_error)?,
                linkedin: row.try_get("linkedin").map_err(db_error)?,
                instagram: row.try_get("instagram").map_err(db_error)?,
            },
            experience: Vec::new(),
            education: Vec::new(),
            updated_at: row.try_get("updated_at").map_err(db_error)?,
        })
    }

    async fn experience_for(
        &self,
        owners: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Experience>>, ProfileError> {
        let rows = sqlx::query(
            r#"
            SELECT id, profile_user_id, title, company, location, from_date, to_date, is_current, description
            FROM profile_experience
            WHERE profile_user_id = ANY($1)
            ORDER BY seq DESC
            "#,
        )
        .bind(owners)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut grouped: HashMap<Uuid, Vec<Experience>> = HashMap::new();
        for row in &rows {
            let owner: Uuid = row.try_get("profile_user_id").map_err(db_error)?;
            grouped.entry(owner).or_default().push(Experience {
                id: EntryId(row.try_get("id").map_err(db_error)?),
                title: row.try_get("title").map_err(db_error)?,
                company: row.try_get("company").map_err(db_error)?,
                location: row.try_get("location").map_err(db_error)?,
                from: row.try_get("from_date").map_err(db_error)?,
                to: row.try_get("to_date").map_err(db_error)?,
                current: row.try_get("is_current").map_err(db_error)?,
                description: row.try_get("description").map_err(db_error)?,
            });
        }

        Ok(grouped)
    }

    async fn education_for(
        &self,
        owners: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Education>>, ProfileError> {
        let rows = sqlx::query(
            r#"
            SELECT id, profile_user_id, school, degree, fieldofstudy, from_date, to_date, is_current, description
            FROM profile_education
            WHERE profile_user_id = ANY($1)
            ORDER BY seq DESC
            "#,
        )
        .bind(owners)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let mut grouped: HashMap<Uuid, Vec<Education>> = HashMap::new();
        for row in &rows {
            let owner: Uuid = row.try_get("profile_user_id").map_err(db_error)?;
            grouped.entry(owner).or_default().push(Education {
                id: EntryId(row.try_get("id").map_err(db_error)?),
                school: row.try_get("school").map_err(db_error)?,
                degree: row.try_get("degree").map_err(db_error)?,
                fieldofstudy: row.try_get("fieldofstudy").map_err(db_error)?,
                from: row.try_get("from_date").map_err(db_error)?,
                to: row.try_get("to_date").map_err(db_error)?,
                current: row.try_get("is_current").map_err(db_error)?,
                description: row.try_get("description").map_err(db_error)?,
            });
        }

        Ok(grouped)
    }

    async fn with_entries(&self, mut profiles: Vec<Profile>) -> Result<Vec<Profile>, ProfileError> {
        if profiles.is_empty() {
            return Ok(profiles);
        }

        let owners: Vec<Uuid> = profiles.iter().map(|profile| profile.user.0).collect();
        let mut experience = self.experience_for(&owners).await?;
        let mut education = self.education_for(&owners).await?;

        for profile in &mut profiles {
            profile.experience = experience.remove(&profile.user.0).unwrap_or_default();
            profile.education = education.remove(&profile.user.0).unwrap_or_default();
        }

        Ok(profiles)
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn upsert(
        &self,
        user: &UserId,
        details: ProfileDetails,
    ) -> Result<Profile, ProfileError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, company, location, bio, status, website, githubusername,
                                  skills, youtube, twitter, facebook, linkedin, instagram, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                company = EXCLUDED.company,
                location = EXCLUDED.location,
                bio = EXCLUDED.bio,
                status = EXCLUDED.status,
                website = EXCLUDED.website,
                githubusername = EXCLUDED.githubusername,
                skills = EXCLUDED.skills,
                youtube = EXCLUDED.youtube,
                twitter = EXCLUDED.twitter,
                facebook = EXCLUDED.facebook,
                linkedin = EXCLUDED.linkedin,
                instagram = EXCLUDED.instagram,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user.0)
        .bind(&details.company)
        .bind(&details.location)
        .bind(&details.bio)
        .bind(&details.status)
        .bind(&details.website)
        .bind(&details.githubusername)
        .bind(details.skills.as_slice())
        .bind(&details.social.youtube)
        .bind(&details.social.twitter)
        .bind(&details.social.facebook)
        .bind(&details.social.linkedin)
        .bind(&details.social.instagram)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return ProfileError::UserNotFound(user.to_string());
                }
            }
            db_error(e)
        })?;

        self.find_by_user(user)
            .await?
            .ok_or_else(|| ProfileError::NotFound(user.to_string()))
    }

    async fn find_by_user(&self, user: &UserId) -> Result<Option<Profile>, ProfileError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM profiles WHERE user_id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let profile = Self::row_to_profile(&row)?;
        Ok(self.with_entries(vec![profile]).await?.pop())
    }

    async fn list_all(&self) -> Result<Vec<Profile>, ProfileError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM profiles ORDER BY updated_at DESC",
            PROFILE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        let profiles = rows
            .iter()
            .map(Self::row_to_profile)
            .collect::<Result<Vec<_>, _>>()?;

        self.with_entries(profiles).await
    }

    async fn delete(&self, user: &UserId) -> Result<bool, ProfileError> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user.0)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_experience(
        &self,
        user: &UserId,
        experience: Experience,
    ) -> Result<bool, ProfileError> {
        // Inserting through the profiles row makes "no profile" a zero-row insert.
        let result = sqlx::query(
            r#"
            INSERT INTO profile_experience
                (id, profile_user_id, title, company, location, from_date, to_date, is_current, description)
            SELECT $1, user_id, $3, $4, $5, $6, $7, $8, $9
            FROM profiles
            WHERE user_id = $2
            "#,
        )
        .bind(experience.id.0)
        .bind(user.0)
        .bind(&experience.title)
        .bind(&experience.company)
        .bind(&experience.location)
        .bind(experience.from)
        .bind(experience.to)
        .bind(experience.current)
        .bind(&experience.description)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_experience(
        &self,
        user: &UserId,
        entry: &EntryId,
    ) -> Result<bool, ProfileError> {
        let result =
            sqlx::query("DELETE FROM profile_experience WHERE id = $1 AND profile_user_id = $2")
                .bind(entry.0)
                .bind(user.0)
                .execute(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_education(
        &self,
        user: &UserId,
        education: Education,
    ) -> Result<bool, ProfileError> {
        let result = sqlx::query(
            r#"
            INSERT INTO profile_education
                (id, profile_user_id, school, degree, fieldofstudy, from_date, to_date, is_current, description)
            SELECT $1, user_id, $3, $4, $5, $6, $7, $8, $9
            FROM profiles
            WHERE user_id = $2
            "#,
        )
        .bind(education.id.0)
        .bind(user.0)
        .bind(&education.school)
        .bind(&education.degree)
        .bind(&education.fieldofstudy)
        .bind(education.from)
        .bind(education.to)
        .bind(education.current)
        .bind(&education.description)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_education(
        &self,
        user: &UserId,
        entry: &EntryId,
    ) -> Result<bool, ProfileError> {
        let result =
            sqlx::query("DELETE FROM profile_education WHERE id = $1 AND profile_user_id = $2")
                .bind(entry.0)
                .bind(user.0)
                .execute(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
