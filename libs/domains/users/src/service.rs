use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{
    CreateUser, DeleteUser, MessageResponse, NewUser, UpdateUser, User, UserResponse, UserUpdate,
};
use crate::password::PasswordHasher;
use crate::repository::{SkillProfileRepository, UserRepository};

/// User directory rules: validation, uniqueness, hashing and the
/// skill-profile delete guard.
pub struct UserService<U, P, H> {
    users: Arc<U>,
    profiles: Arc<P>,
    hasher: Arc<H>,
}

impl<U, P, H> Clone for UserService<U, P, H> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            profiles: Arc::clone(&self.profiles),
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<U, P, H> UserService<U, P, H>
where
    U: UserRepository,
    P: SkillProfileRepository,
    H: PasswordHasher + 'static,
{
    pub fn new(users: Arc<U>, profiles: Arc<P>, hasher: Arc<H>) -> Self {
        Self {
            users,
            profiles,
            hasher,
        }
    }

    /// All users without password hashes. An empty directory is an error.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.users.find_all().await?;
        if users.is_empty() {
            return Err(UserError::Validation("No users found".to_string()));
        }
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;
        Ok(user.into())
    }

    #[instrument(skip(self, input))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<MessageResponse> {
        let NewUser {
            username,
            password,
            roles,
        } = input.into_command()?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(UserError::Conflict("Duplicate username".to_string()));
        }

        let password_hash = self.hash_password(password).await?;
        let user = User::new(username, password_hash, roles);

        let created = self
            .users
            .create(user)
            .await?
            .ok_or_else(|| UserError::BadRequest("Invalid user data received".to_string()))?;

        tracing::info!(user_id = %created.id, "User created");
        Ok(MessageResponse::new(format!(
            "New user {} created",
            created.username
        )))
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(&self, input: UpdateUser) -> UserResult<MessageResponse> {
        let update: UserUpdate = input.into_command()?;
        let id = update.id;

        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if let Some(holder) = self.users.find_by_username(&update.username).await? {
            if holder.id != id {
                return Err(UserError::Conflict("Duplicate username".to_string()));
            }
        }

        let new_password_hash = match update.password.clone() {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };

        user.apply_update(update, new_password_hash);
        let updated = self.users.update(user).await?;

        tracing::info!(user_id = %updated.id, "User updated");
        Ok(MessageResponse::new(format!("{} updated", updated.username)))
    }

    /// Refused while any skill profile still references the user.
    #[instrument(skip(self, input))]
    pub async fn delete_user(&self, input: DeleteUser) -> UserResult<MessageResponse> {
        let id = input.into_command()?;

        if self.profiles.find_by_user(id).await?.is_some() {
            return Err(UserError::BadRequest(
                "User has assigned skill profile".to_string(),
            ));
        }

        if self.users.find_by_id(id).await?.is_none() {
            return Err(UserError::NotFound(id));
        }

        let removed = self
            .users
            .delete(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        tracing::info!(user_id = %removed.id, "User deleted");
        Ok(MessageResponse::new(format!(
            "Username {} with ID {} deleted",
            removed.username, removed.id
        )))
    }

    /// Argon2 is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> UserResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::Internal(format!("Password hashing task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SkillProfile;
    use crate::password::MockPasswordHasher;
    use crate::repository::{MockSkillProfileRepository, MockUserRepository};
    use mockall::predicate::eq;

    type TestService = UserService<MockUserRepository, MockSkillProfileRepository, MockPasswordHasher>;

    fn service(
        users: MockUserRepository,
        profiles: MockSkillProfileRepository,
        hasher: MockPasswordHasher,
    ) -> TestService {
        UserService::new(Arc::new(users), Arc::new(profiles), Arc::new(hasher))
    }

    fn stored(username: &str) -> User {
        User::new(
            username.to_string(),
            "$argon2id$old".to_string(),
            vec!["Employee".to_string()],
        )
    }

    fn create_input(username: &str) -> CreateUser {
        CreateUser {
            username: Some(username.to_string()),
            password: Some("secret".to_string()),
            roles: Some(vec!["Employee".to_string()]),
        }
    }

    fn update_input(user: &User, username: &str, password: Option<&str>) -> UpdateUser {
        UpdateUser {
            id: Some(user.id.to_string()),
            username: Some(username.to_string()),
            roles: Some(vec!["Employee".to_string(), "Manager".to_string()]),
            active: Some(true),
            password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_list_users_empty_is_validation_error() {
        let mut users = MockUserRepository::new();
        users.expect_find_all().returning(|| Ok(vec![]));

        let svc = service(users, MockSkillProfileRepository::new(), MockPasswordHasher::new());
        let err = svc.list_users().await.unwrap_err();

        assert!(matches!(err, UserError::Validation(msg) if msg == "No users found"));
    }

    #[tokio::test]
    async fn test_list_users_strips_hash() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_all()
            .returning(|| Ok(vec![stored("alice"), stored("bob")]));

        let svc = service(users, MockSkillProfileRepository::new(), MockPasswordHasher::new());
        let listed = svc.list_users().await.unwrap();

        assert_eq!(listed.len(), 2);
        let json = serde_json::to_string(&listed).unwrap();
        assert!(!json.contains("argon2"));
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .withf(|name| name == "alice")
            .returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|u| u.password_hash == "hashed:secret" && u.active)
            .returning(|u| Ok(Some(u)));

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|p| p == "secret")
            .returning(|p| Ok(format!("hashed:{p}")));

        let svc = service(users, MockSkillProfileRepository::new(), hasher);
        let msg = svc.create_user(create_input("alice")).await.unwrap();

        assert_eq!(msg.message, "New user alice created");
    }

    #[tokio::test]
    async fn test_create_duplicate_username_is_conflict() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|name| Ok(Some(stored(name))));
        users.expect_create().never();

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();

        let svc = service(users, MockSkillProfileRepository::new(), hasher);
        let err = svc.create_user(create_input("alice")).await.unwrap_err();

        assert!(matches!(err, UserError::Conflict(msg) if msg == "Duplicate username"));
    }

    #[tokio::test]
    async fn test_create_missing_fields_never_touches_store() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().never();

        let svc = service(users, MockSkillProfileRepository::new(), MockPasswordHasher::new());
        let err = svc.create_user(CreateUser::default()).await.unwrap_err();

        assert!(matches!(err, UserError::Validation(msg) if msg == "All fields are required"));
    }

    #[tokio::test]
    async fn test_create_without_record_is_bad_request() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users.expect_create().returning(|_| Ok(None));

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().returning(|_| Ok("h".to_string()));

        let svc = service(users, MockSkillProfileRepository::new(), hasher);
        let err = svc.create_user(create_input("alice")).await.unwrap_err();

        assert!(matches!(err, UserError::BadRequest(msg) if msg == "Invalid user data received"));
    }

    #[tokio::test]
    async fn test_update_own_username_is_not_conflict() {
        let alice = stored("alice");
        let id = alice.id;

        let mut users = MockUserRepository::new();
        let found = alice.clone();
        users
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(found.clone())));
        let holder = alice.clone();
        users
            .expect_find_by_username()
            .returning(move |_| Ok(Some(holder.clone())));
        users
            .expect_update()
            .withf(|u| u.roles.len() == 2 && u.password_hash == "$argon2id$old")
            .returning(Ok);

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();

        let svc = service(users, MockSkillProfileRepository::new(), hasher);
        let msg = svc
            .update_user(update_input(&alice, "alice", None))
            .await
            .unwrap();

        assert_eq!(msg.message, "alice updated");
    }

    #[tokio::test]
    async fn test_update_to_other_users_name_is_conflict() {
        let alice = stored("alice");
        let found = alice.clone();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        users
            .expect_find_by_username()
            .returning(|name| Ok(Some(stored(name))));
        users.expect_update().never();

        let svc = service(users, MockSkillProfileRepository::new(), MockPasswordHasher::new());
        let err = svc
            .update_user(update_input(&alice, "bob", None))
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_with_password_rehashes() {
        let alice = stored("alice");
        let found = alice.clone();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_update()
            .withf(|u| u.password_hash == "hashed:new-secret")
            .returning(Ok);

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|p| Ok(format!("hashed:{p}")));

        let svc = service(users, MockSkillProfileRepository::new(), hasher);
        svc.update_user(update_input(&alice, "alice", Some("new-secret")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let ghost = stored("ghost");

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        users.expect_find_by_username().never();

        let svc = service(users, MockSkillProfileRepository::new(), MockPasswordHasher::new());
        let err = svc
            .update_user(update_input(&ghost, "ghost", None))
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotFound(id) if id == ghost.id));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_skill_profile() {
        let id = Uuid::now_v7();

        let mut profiles = MockSkillProfileRepository::new();
        profiles
            .expect_find_by_user()
            .with(eq(id))
            .returning(|user| Ok(Some(SkillProfile::new(user, vec![], vec![]))));

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();
        users.expect_delete().never();

        let svc = service(users, profiles, MockPasswordHasher::new());
        let err = svc
            .delete_user(DeleteUser {
                id: Some(id.to_string()),
            })
            .await
            .unwrap_err();

        assert!(
            matches!(err, UserError::BadRequest(msg) if msg == "User has assigned skill profile")
        );
    }

    #[tokio::test]
    async fn test_delete_unreferenced_user() {
        let alice = stored("alice");
        let id = alice.id;

        let mut profiles = MockSkillProfileRepository::new();
        profiles.expect_find_by_user().returning(|_| Ok(None));

        let mut users = MockUserRepository::new();
        let found = alice.clone();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        users
            .expect_delete()
            .with(eq(id))
            .times(1)
            .returning(move |_| Ok(Some(alice.clone())));

        let svc = service(users, profiles, MockPasswordHasher::new());
        let msg = svc
            .delete_user(DeleteUser {
                id: Some(id.to_string()),
            })
            .await
            .unwrap();

        assert_eq!(msg.message, format!("Username alice with ID {id} deleted"));
    }

    #[tokio::test]
    async fn test_delete_without_id() {
        let svc = service(
            MockUserRepository::new(),
            MockSkillProfileRepository::new(),
            MockPasswordHasher::new(),
        );
        let err = svc.delete_user(DeleteUser { id: None }).await.unwrap_err();

        assert!(matches!(err, UserError::Validation(msg) if msg == "User ID required"));
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let mut profiles = MockSkillProfileRepository::new();
        profiles.expect_find_by_user().returning(|_| Ok(None));

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        users.expect_delete().never();

        let svc = service(users, profiles, MockPasswordHasher::new());
        let err = svc
            .delete_user(DeleteUser {
                id: Some(Uuid::now_v7().to_string()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotFound(_)));
    }
}
