//! MongoDB implementations of the user, skill profile and skill repositories

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, to_raw_document_buf},
    options::{IndexOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateSkill, Skill, SkillProfile, User};
use crate::repository::{SkillProfileRepository, SkillRepository, UserRepository};

const USERS: &str = "users";
const SKILL_PROFILES: &str = "skillprofiles";
const SKILLS: &str = "skills";
const COUNTERS: &str = "counters";
const SKILL_SEQUENCE: &str = "skillNums";

/// `{ field: value }` encoded the way documents are written, so UUIDs
/// compare as the same BSON type they were stored with.
fn eq_filter<T: Serialize>(field: &str, value: &T) -> UserResult<Document> {
    let raw = to_raw_document_buf(&BTreeMap::from([(field, value)]))?;
    Ok(raw.to_document()?)
}

/// Create the indexes the repositories rely on.
///
/// The unique `username` index backs the duplicate check when two writes race.
pub async fn create_indexes(db: &Database) -> UserResult<()> {
    let unique = IndexOptions::builder().unique(true).build();
    db.collection::<User>(USERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(unique)
                .build(),
        )
        .await?;

    db.collection::<SkillProfile>(SKILL_PROFILES)
        .create_index(IndexModel::builder().keys(doc! { "user": 1 }).build())
        .await?;

    db.collection::<Skill>(SKILLS)
        .create_index(IndexModel::builder().keys(doc! { "count": 1 }).build())
        .await?;

    tracing::info!("MongoDB indexes ensured");
    Ok(())
}

/// MongoDB implementation of the UserRepository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>(USERS),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: User) -> UserResult<Option<User>> {
        let filter = eq_filter("_id", &user.id)?;
        self.collection
            .insert_one(&user)
            .await
            .map_err(UserError::from_user_write)?;

        let created = self.collection.find_one(filter).await?;
        if created.is_some() {
            tracing::info!(user_id = %user.id, "User created successfully");
        }
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> UserResult<Vec<User>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(eq_filter("_id", &id)?).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! { "username": username })
            .await?)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: User) -> UserResult<User> {
        let result = self
            .collection
            .replace_one(eq_filter("_id", &user.id)?, &user)
            .await
            .map_err(UserError::from_user_write)?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(user.id));
        }

        tracing::info!(user_id = %user.id, "User updated successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> UserResult<Option<User>> {
        let removed = self
            .collection
            .find_one_and_delete(eq_filter("_id", &id)?)
            .await?;

        if removed.is_some() {
            tracing::info!(user_id = %id, "User deleted successfully");
        }
        Ok(removed)
    }
}

/// MongoDB implementation of the SkillProfileRepository
#[derive(Clone)]
pub struct MongoSkillProfileRepository {
    collection: Collection<SkillProfile>,
}

impl MongoSkillProfileRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<SkillProfile>(SKILL_PROFILES),
        }
    }
}

#[async_trait]
impl SkillProfileRepository for MongoSkillProfileRepository {
    #[instrument(skip(self, profile), fields(user_id = %profile.user))]
    async fn create(&self, profile: SkillProfile) -> UserResult<SkillProfile> {
        self.collection.insert_one(&profile).await?;

        tracing::info!(profile_id = %profile.id, "Skill profile created successfully");
        Ok(profile)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> UserResult<Vec<SkillProfile>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Uuid) -> UserResult<Option<SkillProfile>> {
        Ok(self.collection.find_one(eq_filter("user", &user_id)?).await?)
    }
}

/// Named sequence document in the `counters` collection
#[derive(Debug, Serialize, Deserialize)]
struct Counter {
    #[serde(rename = "_id")]
    id: String,
    seq: i64,
}

/// MongoDB implementation of the SkillRepository
#[derive(Clone)]
pub struct MongoSkillRepository {
    collection: Collection<Skill>,
    counters: Collection<Counter>,
}

impl MongoSkillRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Skill>(SKILLS),
            counters: db.collection::<Counter>(COUNTERS),
        }
    }

    /// Atomically increment and return the skill sequence; the first call yields 1.
    async fn next_count(&self) -> UserResult<i64> {
        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": SKILL_SEQUENCE },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| UserError::Internal("Skill sequence upsert returned nothing".into()))?;

        Ok(counter.seq)
    }
}

#[async_trait]
impl SkillRepository for MongoSkillRepository {
    #[instrument(skip(self, input), fields(skill_name = %input.skill_name))]
    async fn create(&self, input: CreateSkill) -> UserResult<Skill> {
        let skill = Skill {
            id: Uuid::now_v7(),
            skill_name: input.skill_name,
            skill_level: input.skill_level,
            count: self.next_count().await?,
        };

        self.collection.insert_one(&skill).await?;

        tracing::info!(skill_id = %skill.id, count = skill.count, "Skill created successfully");
        Ok(skill)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> UserResult<Vec<Skill>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "count": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<Skill>> {
        Ok(self.collection.find_one(eq_filter("_id", &id)?).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_eq_filter_matches_stored_encoding() {
        let user = User::new("alice".into(), "hash".into(), vec!["Employee".into()]);
        let stored = to_raw_document_buf(&user).unwrap().to_document().unwrap();
        let filter = eq_filter("_id", &user.id).unwrap();

        assert_eq!(filter.get("_id"), stored.get("_id"));
    }

    #[test]
    fn test_eq_filter_plain_values() {
        let filter = eq_filter("username", &"alice").unwrap();
        assert_eq!(filter.get("username"), Some(&Bson::String("alice".into())));
    }

    // Integration tests below need a running MongoDB (MONGODB_URL)

    async fn test_db() -> Database {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = mongodb::Client::with_uri_str(&url).await.unwrap();
        let db = client.database(&format!("skills_test_{}", Uuid::now_v7().simple()));
        create_indexes(&db).await.unwrap();
        db
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_unique_username_index() {
        let db = test_db().await;
        let repo = MongoUserRepository::new(&db);

        let alice = User::new("alice".into(), "h".into(), vec!["Employee".into()]);
        let created = repo.create(alice.clone()).await.unwrap().unwrap();
        assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(alice));

        let again = User::new("alice".into(), "h".into(), vec!["Employee".into()]);
        assert!(matches!(
            repo.create(again).await,
            Err(UserError::Conflict(msg)) if msg == "Duplicate username"
        ));

        db.drop().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_profile_lookup_and_skill_sequence() {
        let db = test_db().await;
        let profiles = MongoSkillProfileRepository::new(&db);
        let skills = MongoSkillRepository::new(&db);

        let owner = Uuid::now_v7();
        profiles
            .create(SkillProfile::new(owner, vec![], vec![]))
            .await
            .unwrap();
        assert!(profiles.find_by_user(owner).await.unwrap().is_some());

        let first = skills
            .create(CreateSkill {
                skill_name: "Welding".into(),
                skill_level: "Expert".into(),
            })
            .await
            .unwrap();
        let second = skills
            .create(CreateSkill {
                skill_name: "Rust".into(),
                skill_level: "Novice".into(),
            })
            .await
            .unwrap();
        assert_eq!((first.count, second.count), (1, 2));

        db.drop().await.unwrap();
    }
}
