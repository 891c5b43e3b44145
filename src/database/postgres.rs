use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::course::ValidCourse;
use crate::database::models::user::{IdentityRow, EMAIL_TAKEN};
use crate::database::models::{Course, CourseFields, Identity, NewUser, User};
use crate::database::store::{Store, StoreError, StoreResult};

const USER_COLUMNS: &str = "id, first_name, last_name, email_address, created_at, updated_at";
const COURSE_COLUMNS: &str =
    "id, title, description, estimated_time, materials_needed, user_id, created_at, updated_at";

/// `Store` backed by Postgres through sqlx.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-index violation to a uniqueness conflict; everything else
/// stays unclassified.
fn classify(err: sqlx::Error, conflict: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Uniqueness(vec![conflict.to_string()]);
        }
    }
    err.into()
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE LOWER(email_address) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Identity::from))
    }

    async fn create_user(&self, fields: NewUser) -> StoreResult<User> {
        let valid = fields.validate().await?;
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (first_name, last_name, email_address, password)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&valid.first_name)
        .bind(&valid.last_name)
        .bind(&valid.email_address)
        .bind(&valid.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, EMAIL_TAKEN))
    }

    async fn delete_user(&self, user: &User) -> StoreResult<()> {
        // courses.user_id cascades
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_courses(&self) -> StoreResult<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    async fn find_course(&self, id: i64) -> StoreResult<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(course)
    }

    async fn create_course(&self, owner: &User, fields: CourseFields) -> StoreResult<Course> {
        let ValidCourse {
            title,
            description,
            estimated_time,
            materials_needed,
        } = fields.validate()?;

        let course = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (title, description, estimated_time, materials_needed, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(estimated_time)
        .bind(materials_needed)
        .bind(owner.id)
        .fetch_one(&self.pool)
        .await?;
        Ok(course)
    }

    async fn update_course(&self, course: &Course, fields: CourseFields) -> StoreResult<Course> {
        let ValidCourse {
            title,
            description,
            estimated_time,
            materials_needed,
        } = fields.merge_onto(course)?;

        let updated = sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses
             SET title = $2, description = $3, estimated_time = $4, materials_needed = $5,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(course.id)
        .bind(title)
        .bind(description)
        .bind(estimated_time)
        .bind(materials_needed)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_course(&self, course: &Course) -> StoreResult<()> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
