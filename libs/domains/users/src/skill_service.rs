use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateSkill, CreateSkillProfile, Skill, SkillProfile, USER_ID_REQUIRED};
use crate::repository::{SkillProfileRepository, SkillRepository, UserRepository};

/// Skill catalogue and the profiles that tie skills to users
pub struct SkillService<U, P, S> {
    users: Arc<U>,
    profiles: Arc<P>,
    skills: Arc<S>,
}

impl<U, P, S> Clone for SkillService<U, P, S> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            profiles: Arc::clone(&self.profiles),
            skills: Arc::clone(&self.skills),
        }
    }
}

impl<U, P, S> SkillService<U, P, S>
where
    U: UserRepository,
    P: SkillProfileRepository,
    S: SkillRepository,
{
    pub fn new(users: Arc<U>, profiles: Arc<P>, skills: Arc<S>) -> Self {
        Self {
            users,
            profiles,
            skills,
        }
    }

    /// The user and every referenced skill must already exist.
    #[instrument(skip(self, input))]
    pub async fn create_profile(&self, input: CreateSkillProfile) -> UserResult<SkillProfile> {
        input
            .validate()
            .map_err(|_| UserError::Validation(USER_ID_REQUIRED.to_string()))?;

        let raw_user = input.user.unwrap_or_default();
        let user_id = Uuid::parse_str(&raw_user)
            .map_err(|_| UserError::Validation(format!("Invalid user ID: {raw_user}")))?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(UserError::NotFound(user_id));
        }

        for skill_id in &input.skills {
            if self.skills.find_by_id(*skill_id).await?.is_none() {
                return Err(UserError::SkillNotFound(*skill_id));
            }
        }

        let profile = self
            .profiles
            .create(SkillProfile::new(user_id, input.licenses, input.skills))
            .await?;

        tracing::info!(profile_id = %profile.id, user_id = %user_id, "Skill profile created");
        Ok(profile)
    }

    #[instrument(skip(self))]
    pub async fn list_profiles(&self) -> UserResult<Vec<SkillProfile>> {
        self.profiles.find_all().await
    }

    #[instrument(skip(self, input), fields(skill_name = %input.skill_name))]
    pub async fn create_skill(&self, input: CreateSkill) -> UserResult<Skill> {
        input
            .validate()
            .map_err(|_| UserError::Validation("All fields are required".to_string()))?;

        self.skills.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn list_skills(&self) -> UserResult<Vec<Skill>> {
        self.skills.find_all().await
    }
}
