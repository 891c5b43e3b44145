use async_trait::async_trait;
use thiserror::Error;

use crate::auth::password::HashError;
use crate::database::models::{Course, CourseFields, Identity, NewUser, User};

/// Outcome of a failed store call. Handlers never inspect error strings:
/// the normalizer matches on these variants.
#[derive(Debug, Error)]
pub enum StoreError {
    /// One or more field constraints were violated, in field order.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A unique field collided with an existing record.
    #[error("uniqueness conflict: {}", .0.join("; "))]
    Uniqueness(Vec<String>),

    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unclassified(err.into())
    }
}

impl From<HashError> for StoreError {
    fn from(err: HashError) -> Self {
        StoreError::Unclassified(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations the request pipeline depends on.
///
/// Lookups return `Ok(None)` for missing records; existence is always
/// checked explicitly before a mutation, so no mutating method reports
/// "not found".
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap connectivity probe for the health endpoint.
    async fn ping(&self) -> StoreResult<()>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;

    /// Case-insensitive lookup by email address, including the password hash.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<Identity>>;

    async fn create_user(&self, fields: NewUser) -> StoreResult<User>;

    /// Removes the user and every course they own.
    async fn delete_user(&self, user: &User) -> StoreResult<()>;

    async fn list_courses(&self) -> StoreResult<Vec<Course>>;

    async fn find_course(&self, id: i64) -> StoreResult<Option<Course>>;

    async fn create_course(&self, owner: &User, fields: CourseFields) -> StoreResult<Course>;

    async fn update_course(&self, course: &Course, fields: CourseFields) -> StoreResult<Course>;

    async fn delete_course(&self, course: &Course) -> StoreResult<()>;
}
