use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};

pub(crate) const ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub(crate) const USER_ID_REQUIRED: &str = "User ID required";

/// User entity as stored in the `users` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Unique login name
    pub username: String,
    /// Argon2 PHC string, never exposed in API responses
    #[serde(rename = "password")]
    pub password_hash: String,
    pub roles: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(username: String, password_hash: String, roles: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            username,
            password_hash,
            roles,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the mutable fields; the hash only when a new one is given.
    pub fn apply_update(&mut self, update: UserUpdate, new_password_hash: Option<String>) {
        self.username = update.username;
        self.roles = update.roles;
        self.active = update.active;
        if let Some(hash) = new_password_hash {
            self.password_hash = hash;
        }
        self.updated_at = Utc::now();
    }
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            roles: user.roles,
            active: user.active,
        }
    }
}

/// Confirmation body for writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `POST /users`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(required, length(min = 1))]
    pub username: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
    #[validate(required, length(min = 1))]
    pub roles: Option<Vec<String>>,
}

/// A create request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub roles: Vec<String>,
}

impl CreateUser {
    pub fn into_command(self) -> UserResult<NewUser> {
        self.validate()
            .map_err(|_| UserError::Validation(ALL_FIELDS_REQUIRED.to_string()))?;

        match (self.username, self.password, self.roles) {
            (Some(username), Some(password), Some(roles)) => Ok(NewUser {
                username,
                password,
                roles,
            }),
            _ => Err(UserError::Validation(ALL_FIELDS_REQUIRED.to_string())),
        }
    }
}

/// Body of `PATCH /users`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(required, length(min = 1))]
    pub id: Option<String>,
    #[validate(required, length(min = 1))]
    pub username: Option<String>,
    #[validate(required, length(min = 1))]
    pub roles: Option<Vec<String>>,
    #[validate(required)]
    pub active: Option<bool>,
    /// Replaces the password when present and non-empty
    pub password: Option<String>,
}

/// An update request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct UserUpdate {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub password: Option<String>,
}

impl UpdateUser {
    pub fn into_command(self) -> UserResult<UserUpdate> {
        self.validate()
            .map_err(|_| UserError::Validation(ALL_FIELDS_REQUIRED.to_string()))?;

        let (Some(id), Some(username), Some(roles), Some(active)) =
            (self.id, self.username, self.roles, self.active)
        else {
            return Err(UserError::Validation(ALL_FIELDS_REQUIRED.to_string()));
        };

        Ok(UserUpdate {
            id: parse_user_id(&id)?,
            username,
            roles,
            active,
            password: self.password.filter(|p| !p.is_empty()),
        })
    }
}

/// Body of `DELETE /users`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DeleteUser {
    pub id: Option<String>,
}

impl DeleteUser {
    pub fn into_command(self) -> UserResult<Uuid> {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => parse_user_id(id),
            _ => Err(UserError::Validation(USER_ID_REQUIRED.to_string())),
        }
    }
}

fn parse_user_id(raw: &str) -> UserResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| UserError::Validation(format!("Invalid user ID: {raw}")))
}

/// A user's licenses and skills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SkillProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Owning user
    pub user: Uuid,
    #[serde(default)]
    pub licenses: Vec<String>,
    /// Referenced skill ids
    #[serde(default)]
    pub skills: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SkillProfile {
    pub fn new(user: Uuid, licenses: Vec<String>, skills: Vec<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user,
            licenses,
            skills,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `POST /skill-profiles`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateSkillProfile {
    #[validate(required, length(min = 1))]
    pub user: Option<String>,
    #[serde(default)]
    pub licenses: Vec<String>,
    #[serde(default)]
    pub skills: Vec<Uuid>,
}

/// A catalogue skill with its sequence number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Skill {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub skill_name: String,
    pub skill_level: String,
    /// Allocated from the `skillNums` sequence, starting at 1
    pub count: i64,
}

/// Body of `POST /skills`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSkill {
    #[validate(length(min = 1))]
    pub skill_name: String,
    #[validate(length(min = 1))]
    pub skill_level: String,
}
