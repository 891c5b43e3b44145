use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::models::course::ValidCourse;
use crate::database::models::user::EMAIL_TAKEN;
use crate::database::models::{Course, CourseFields, Identity, NewUser, User};
use crate::database::store::{Store, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, Identity>,
    courses: BTreeMap<i64, Course>,
    last_user_id: i64,
    last_course_id: i64,
}

/// Process-local `Store` with the same constraints as the Postgres schema:
/// case-insensitive unique emails and owner-cascading deletes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Same folding as the `LOWER(email_address)` index, non-ASCII letters included.
fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().map(|i| i.user.clone()).collect())
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(|i| i.user.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|i| same_email(&i.user.email_address, email))
            .cloned())
    }

    async fn create_user(&self, fields: NewUser) -> StoreResult<User> {
        // Hashing happens before the lock is taken
        let valid = fields.validate().await?;

        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|i| same_email(&i.user.email_address, &valid.email_address));
        if taken {
            return Err(StoreError::Uniqueness(vec![EMAIL_TAKEN.to_string()]));
        }

        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            first_name: valid.first_name,
            last_name: valid.last_name,
            email_address: valid.email_address,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(
            user.id,
            Identity {
                user: user.clone(),
                password_hash: valid.password_hash,
            },
        );
        Ok(user)
    }

    async fn delete_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&user.id);
        tables.courses.retain(|_, c| c.user_id != user.id);
        Ok(())
    }

    async fn list_courses(&self) -> StoreResult<Vec<Course>> {
        let tables = self.tables.read().await;
        Ok(tables.courses.values().cloned().collect())
    }

    async fn find_course(&self, id: i64) -> StoreResult<Option<Course>> {
        let tables = self.tables.read().await;
        Ok(tables.courses.get(&id).cloned())
    }

    async fn create_course(&self, owner: &User, fields: CourseFields) -> StoreResult<Course> {
        let ValidCourse {
            title,
            description,
            estimated_time,
            materials_needed,
        } = fields.validate()?;

        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&owner.id) {
            return Err(anyhow::anyhow!("course owner {} does not exist", owner.id).into());
        }

        tables.last_course_id += 1;
        let now = Utc::now();
        let course = Course {
            id: tables.last_course_id,
            title,
            description,
            estimated_time,
            materials_needed,
            user_id: owner.id,
            created_at: now,
            updated_at: now,
        };
        tables.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn update_course(&self, course: &Course, fields: CourseFields) -> StoreResult<Course> {
        let valid = fields.merge_onto(course)?;

        let mut tables = self.tables.write().await;
        let stored = tables
            .courses
            .get_mut(&course.id)
            .ok_or_else(|| anyhow::anyhow!("course {} vanished during update", course.id))?;
        stored.title = valid.title;
        stored.description = valid.description;
        stored.estimated_time = valid.estimated_time;
        stored.materials_needed = valid.materials_needed;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_course(&self, course: &Course) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.courses.remove(&course.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::course::TITLE_REQUIRED;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: Some("Sally".to_string()),
            last_name: Some("Jones".to_string()),
            email_address: Some(email.to_string()),
            password: Some("sallypassword".to_string()),
        }
    }

    fn course_fields(title: &str) -> CourseFields {
        CourseFields {
            title: Some(title.to_string()),
            description: Some("Learn by doing.".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn email_uniqueness_ignores_case() {
        let store = MemoryStore::new();
        store.create_user(new_user("sally@jones.com")).await.unwrap();

        match store.create_user(new_user("SALLY@Jones.com")).await {
            Err(StoreError::Uniqueness(errors)) => assert_eq!(errors, vec![EMAIL_TAKEN]),
            other => panic!("expected uniqueness conflict, got {:?}", other),
        }
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn email_uniqueness_folds_non_ascii_letters() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("élan@x.com")).await.unwrap();

        match store.create_user(new_user("ÉLAN@x.com")).await {
            Err(StoreError::Uniqueness(errors)) => assert_eq!(errors, vec![EMAIL_TAKEN]),
            other => panic!("expected uniqueness conflict, got {:?}", other),
        }
        let identity = store.find_user_by_email("ÉLAN@X.COM").await.unwrap();
        assert_eq!(identity.map(|i| i.user), Some(user));
    }

    #[tokio::test]
    async fn lookup_by_email_returns_the_hash() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("sally@jones.com")).await.unwrap();

        let identity = store
            .find_user_by_email("Sally@Jones.com")
            .await
            .unwrap()
            .expect("identity");
        assert_eq!(identity.user, user);
        assert!(identity.password_hash.starts_with("$argon2"));
        assert!(store.find_user_by_email("nobody@jones.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_course_is_not_stored() {
        let store = MemoryStore::new();
        let owner = store.create_user(new_user("sally@jones.com")).await.unwrap();

        match store.create_course(&owner, course_fields("  ")).await {
            Err(StoreError::Validation(errors)) => assert_eq!(errors, vec![TITLE_REQUIRED]),
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert!(store.list_courses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_owner_and_id() {
        let store = MemoryStore::new();
        let owner = store.create_user(new_user("sally@jones.com")).await.unwrap();
        let course = store.create_course(&owner, course_fields("Knots")).await.unwrap();

        let updated = store
            .update_course(&course, course_fields("Advanced Knots"))
            .await
            .unwrap();
        assert_eq!(updated.id, course.id);
        assert_eq!(updated.user_id, owner.id);
        assert_eq!(updated.title, "Advanced Knots");
        assert_eq!(store.find_course(course.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn deleting_a_user_removes_their_courses() {
        let store = MemoryStore::new();
        let sally = store.create_user(new_user("sally@jones.com")).await.unwrap();
        let joe = store.create_user(new_user("joe@smith.com")).await.unwrap();
        store.create_course(&sally, course_fields("Knots")).await.unwrap();
        let kept = store.create_course(&joe, course_fields("Sails")).await.unwrap();

        store.delete_user(&sally).await.unwrap();

        assert_eq!(store.list_courses().await.unwrap(), vec![kept]);
        assert!(store.find_user(sally.id).await.unwrap().is_none());
    }
}
