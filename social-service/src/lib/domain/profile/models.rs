use std::fmt;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::profile::errors::EntryIdError;
use crate::domain::profile::errors::SkillsError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Developer profile, one per user.
///
/// `experience` and `education` are ordered newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub user: UserId,
    pub company: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub website: Option<String>,
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    pub social: SocialLinks,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialLinks {
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

/// Identifier of an experience or education entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, EntryIdError> {
        Uuid::parse_str(s.trim())
            .map(EntryId)
            .map_err(|e| EntryIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experience {
    pub id: EntryId,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Education {
    pub id: EntryId,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// Skill list parsed from comma-separated input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skills(Vec<String>);

impl Skills {
    /// Split on commas, trim each fragment and drop the empty ones.
    ///
    /// # Errors
    /// * `Empty` - No skill remains after trimming
    pub fn parse(raw: &str) -> Result<Self, SkillsError> {
        let skills: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(str::to_string)
            .collect();

        if skills.is_empty() {
            Err(SkillsError::Empty)
        } else {
            Ok(Self(skills))
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// Command to create or replace the caller's profile.
///
/// Scalar fields and social links are replaced wholesale; experience and
/// education entries are left untouched.
#[derive(Debug, Clone)]
pub struct ProfileDetails {
    pub company: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub website: Option<String>,
    pub githubusername: Option<String>,
    pub skills: Skills,
    pub social: SocialLinks,
}

/// Command to add an experience entry
#[derive(Debug, Clone)]
pub struct NewExperience {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

impl NewExperience {
    pub fn into_entry(self, id: EntryId) -> Experience {
        Experience {
            id,
            title: self.title,
            company: self.company,
            location: self.location,
            from: self.from,
            to: self.to,
            current: self.current,
            description: self.description,
        }
    }
}

/// Command to add an education entry
#[derive(Debug, Clone)]
pub struct NewEducation {
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

impl NewEducation {
    pub fn into_entry(self, id: EntryId) -> Education {
        Education {
            id,
            school: self.school,
            degree: self.degree,
            fieldofstudy: self.fieldofstudy,
            from: self.from,
            to: self.to,
            current: self.current,
            description: self.description,
        }
    }
}

/// Public view of the profile owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOwner {
    pub id: UserId,
    pub name: String,
    pub avatar_url: String,
}

impl From<&User> for ProfileOwner {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.as_str().to_string(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// Profile together with its owner's public fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedProfile {
    pub profile: Profile,
    pub owner: ProfileOwner,
}
