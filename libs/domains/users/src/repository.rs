use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateSkill, Skill, SkillProfile, User};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user; `None` when the store did not produce a record
    async fn create(&self, user: User) -> UserResult<Option<User>>;

    async fn find_all(&self) -> UserResult<Vec<User>>;

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Exact, case-sensitive username match
    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>>;

    /// Replace an existing user
    async fn update(&self, user: User) -> UserResult<User>;

    /// Remove a user, returning what was removed
    async fn delete(&self, id: Uuid) -> UserResult<Option<User>>;
}

/// Repository trait for SkillProfile persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillProfileRepository: Send + Sync {
    async fn create(&self, profile: SkillProfile) -> UserResult<SkillProfile>;

    async fn find_all(&self) -> UserResult<Vec<SkillProfile>>;

    /// Any profile that references `user_id`
    async fn find_by_user(&self, user_id: Uuid) -> UserResult<Option<SkillProfile>>;
}

/// Repository trait for the skill catalogue
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// Store a skill under the next sequence number
    async fn create(&self, input: CreateSkill) -> UserResult<Skill>;

    /// All skills ordered by sequence number
    async fn find_all(&self) -> UserResult<Vec<Skill>>;

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<Skill>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(UserError::Conflict("Duplicate username".to_string()));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(Some(user))
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by_key(|r| (r.created_at, r.id));
        Ok(result)
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }

        if users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(UserError::Conflict("Duplicate username".to_string()));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;
        let removed = users.remove(&id);

        if removed.is_some() {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(removed)
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemorySkillProfileRepository {
    profiles: Arc<RwLock<HashMap<Uuid, SkillProfile>>>,
}

impl InMemorySkillProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SkillProfileRepository for InMemorySkillProfileRepository {
    async fn create(&self, profile: SkillProfile) -> UserResult<SkillProfile> {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.id, profile.clone());

        tracing::info!(profile_id = %profile.id, user_id = %profile.user, "Created skill profile");
        Ok(profile)
    }

    async fn find_all(&self) -> UserResult<Vec<SkillProfile>> {
        let profiles = self.profiles.read().await;
        let mut result: Vec<SkillProfile> = profiles.values().cloned().collect();
        result.sort_by_key(|r| (r.created_at, r.id));
        Ok(result)
    }

    async fn find_by_user(&self, user_id: Uuid) -> UserResult<Option<SkillProfile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.values().find(|p| p.user == user_id).cloned())
    }
}

/// Skills plus the sequence counter, guarded together
#[derive(Debug, Default)]
struct SkillStore {
    skills: HashMap<Uuid, Skill>,
    seq: i64,
}

#[derive(Debug, Default, Clone)]
pub struct InMemorySkillRepository {
    store: Arc<RwLock<SkillStore>>,
}

impl InMemorySkillRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SkillRepository for InMemorySkillRepository {
    async fn create(&self, input: CreateSkill) -> UserResult<Skill> {
        let mut store = self.store.write().await;
        store.seq += 1;

        let skill = Skill {
            id: Uuid::now_v7(),
            skill_name: input.skill_name,
            skill_level: input.skill_level,
            count: store.seq,
        };
        store.skills.insert(skill.id, skill.clone());

        tracing::info!(skill_id = %skill.id, count = skill.count, "Created skill");
        Ok(skill)
    }

    async fn find_all(&self) -> UserResult<Vec<Skill>> {
        let store = self.store.read().await;
        let mut result: Vec<Skill> = store.skills.values().cloned().collect();
        result.sort_by_key(|s| s.count);
        Ok(result)
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<Skill>> {
        let store = self.store.read().await;
        Ok(store.skills.get(&id).cloned())
    }
}
