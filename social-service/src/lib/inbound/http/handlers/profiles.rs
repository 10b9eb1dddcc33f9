use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageResponseData;
use crate::domain::profile::models::Education;
use crate::domain::profile::models::EntryId;
use crate::domain::profile::models::Experience;
use crate::domain::profile::models::NewEducation;
use crate::domain::profile::models::NewExperience;
use crate::domain::profile::models::PopulatedProfile;
use crate::domain::profile::models::ProfileDetails;
use crate::domain::profile::models::Skills;
use crate::domain::profile::models::SocialLinks;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::optional;
use crate::inbound::http::validation::ValidationErrors;
use crate::inbound::http::validation::Validator;

pub async fn my_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let profile = state.profile_service.get_profile(&caller.user_id).await?;
    Ok(ApiSuccess::ok(profile.into()))
}

/// Create the caller's profile, or replace its fields if it exists.
pub async fn upsert_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let Json(body) = body?;
    let details = body.try_into_details()?;

    let profile = state
        .profile_service
        .upsert_profile(&caller.user_id, details)
        .await?;

    Ok(ApiSuccess::ok(profile.into()))
}

pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<ProfileResponseData>>, ApiError> {
    let profiles = state.profile_service.list_profiles().await?;
    Ok(ApiSuccess::ok(
        profiles.into_iter().map(ProfileResponseData::from).collect(),
    ))
}

pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let user_id = UserId::from_string(&user_id)
        .map_err(|_| ApiError::NotFound("Profile not found".to_string()))?;

    let profile = state.profile_service.get_profile(&user_id).await?;
    Ok(ApiSuccess::ok(profile.into()))
}

/// Delete the caller's profile together with the account itself.
pub async fn delete_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    state
        .user_service
        .delete_user(&caller.user_id, &caller.user_id)
        .await?;

    Ok(ApiSuccess::ok(MessageResponseData::new("User deleted")))
}

pub async fn add_experience(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    body: Result<Json<ExperienceRequest>, JsonRejection>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let Json(body) = body?;
    let experience = body.try_into_new()?;

    let profile = state
        .profile_service
        .add_experience(&caller.user_id, experience)
        .await?;

    Ok(ApiSuccess::ok(profile.into()))
}

pub async fn remove_experience(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(entry_id): Path<String>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let entry = parse_entry_id(&entry_id)?;

    let profile = state
        .profile_service
        .remove_experience(&caller.user_id, &entry)
        .await?;

    Ok(ApiSuccess::ok(profile.into()))
}

pub async fn add_education(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    body: Result<Json<EducationRequest>, JsonRejection>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let Json(body) = body?;
    let education = body.try_into_new()?;

    let profile = state
        .profile_service
        .add_education(&caller.user_id, education)
        .await?;

    Ok(ApiSuccess::ok(profile.into()))
}

pub async fn remove_education(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(entry_id): Path<String>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    let entry = parse_entry_id(&entry_id)?;

    let profile = state
        .profile_service
        .remove_education(&caller.user_id, &entry)
        .await?;

    Ok(ApiSuccess::ok(profile.into()))
}

fn parse_entry_id(raw: &str) -> Result<EntryId, ApiError> {
    EntryId::from_string(raw).map_err(|_| ApiError::NotFound("Entry not found".to_string()))
}

/// Skills arrive as a comma-separated string from forms, or as a JSON list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    Text(String),
    List(Vec<String>),
}

impl SkillsInput {
    fn joined(self) -> String {
        match self {
            SkillsInput::Text(text) => text,
            SkillsInput::List(items) => items.join(","),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileRequest {
    company: Option<String>,
    website: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    status: Option<String>,
    githubusername: Option<String>,
    skills: Option<SkillsInput>,
    youtube: Option<String>,
    twitter: Option<String>,
    facebook: Option<String>,
    linkedin: Option<String>,
    instagram: Option<String>,
}

impl ProfileRequest {
    fn try_into_details(self) -> Result<ProfileDetails, ValidationErrors> {
        let mut validator = Validator::new();

        let status = validator.required("status", self.status, "Status is required");
        let raw_skills = self.skills.map(SkillsInput::joined).unwrap_or_default();
        let skills = validator.check("skills", Skills::parse(&raw_skills));

        let social = SocialLinks {
            youtube: optional(self.youtube),
            twitter: optional(self.twitter),
            facebook: optional(self.facebook),
            linkedin: optional(self.linkedin),
            instagram: optional(self.instagram),
        };

        validator.finish(status.zip(skills).map(|(status, skills)| ProfileDetails {
            company: optional(self.company),
            location: optional(self.location),
            bio: optional(self.bio),
            status,
            website: optional(self.website),
            githubusername: optional(self.githubusername),
            skills,
            social,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExperienceRequest {
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
    from: Option<String>,
    to: Option<String>,
    current: Option<bool>,
    description: Option<String>,
}

impl ExperienceRequest {
    fn try_into_new(self) -> Result<NewExperience, ValidationErrors> {
        let mut validator = Validator::new();

        let title = validator.required("title", self.title, "Title is required");
        let company = validator.required("company", self.company, "Company is required");
        let from = validator.date("from", self.from, "From date is required");
        let to = validator.optional_date("to", self.to);

        validator.finish(title.zip(company).zip(from).zip(to).map(
            |(((title, company), from), to)| NewExperience {
                title,
                company,
                location: optional(self.location),
                from,
                to,
                current: self.current.unwrap_or(false),
                description: optional(self.description),
            },
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EducationRequest {
    school: Option<String>,
    degree: Option<String>,
    fieldofstudy: Option<String>,
    from: Option<String>,
    to: Option<String>,
    current: Option<bool>,
    description: Option<String>,
}

impl EducationRequest {
    fn try_into_new(self) -> Result<NewEducation, ValidationErrors> {
        let mut validator = Validator::new();

        let school = validator.required("school", self.school, "School is required");
        let degree = validator.required("degree", self.degree, "Degree is required");
        let fieldofstudy =
            validator.required("fieldofstudy", self.fieldofstudy, "Field of study is required");
        let from = validator.date("from", self.from, "From date is required");
        let to = validator.optional_date("to", self.to);

        validator.finish(school.zip(degree).zip(fieldofstudy).zip(from).zip(to).map(
            |((((school, degree), fieldofstudy), from), to)| NewEducation {
                school,
                degree,
                fieldofstudy,
                from,
                to,
                current: self.current.unwrap_or(false),
                description: optional(self.description),
            },
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileOwnerData {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialData {
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperienceData {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

impl From<Experience> for ExperienceData {
    fn from(entry: Experience) -> Self {
        Self {
            id: entry.id.to_string(),
            title: entry.title,
            company: entry.company,
            location: entry.location,
            from: entry.from,
            to: entry.to,
            current: entry.current,
            description: entry.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EducationData {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

impl From<Education> for EducationData {
    fn from(entry: Education) -> Self {
        Self {
            id: entry.id.to_string(),
            school: entry.school,
            degree: entry.degree,
            fieldofstudy: entry.fieldofstudy,
            from: entry.from,
            to: entry.to,
            current: entry.current,
            description: entry.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileResponseData {
    pub user: ProfileOwnerData,
    pub company: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub website: Option<String>,
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    pub social: SocialData,
    pub experience: Vec<ExperienceData>,
    pub education: Vec<EducationData>,
    pub date: DateTime<Utc>,
}

impl From<PopulatedProfile> for ProfileResponseData {
    fn from(populated: PopulatedProfile) -> Self {
        let PopulatedProfile { profile, owner } = populated;

        Self {
            user: ProfileOwnerData {
                id: owner.id.to_string(),
                name: owner.name,
                avatar: owner.avatar_url,
            },
            company: profile.company,
            location: profile.location,
            bio: profile.bio,
            status: profile.status,
            website: profile.website,
            githubusername: profile.githubusername,
            skills: profile.skills,
            social: SocialData {
                youtube: profile.social.youtube,
                twitter: profile.social.twitter,
                facebook: profile.social.facebook,
                linkedin: profile.social.linkedin,
                instagram: profile.social.instagram,
            },
            experience: profile.experience.into_iter().map(Into::into).collect(),
            education: profile.education.into_iter().map(Into::into).collect(),
            date: profile.updated_at,
        }
    }
}
