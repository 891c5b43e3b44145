use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user::required;
use crate::database::StoreError;

pub const TITLE_REQUIRED: &str = "A title is required";
pub const DESCRIPTION_REQUIRED: &str = "A description is required";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable course fields, shared by create and update. The owner is not
/// among them: it comes from the authenticated caller on create and never
/// changes afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
}

/// Course content that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCourse {
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
}

impl CourseFields {
    pub fn validate(self) -> Result<ValidCourse, StoreError> {
        let mut errors = Vec::new();
        let title = required(self.title, TITLE_REQUIRED, &mut errors);
        let description = required(self.description, DESCRIPTION_REQUIRED, &mut errors);

        match (title, description) {
            (Some(title), Some(description)) => Ok(ValidCourse {
                title,
                description,
                estimated_time: self.estimated_time,
                materials_needed: self.materials_needed,
            }),
            _ => Err(StoreError::Validation(errors)),
        }
    }

    /// Overlays the supplied fields on an existing course and validates the
    /// result, so an update may omit fields but may not blank out required
    /// ones.
    pub fn merge_onto(self, course: &Course) -> Result<ValidCourse, StoreError> {
        Self {
            title: Some(self.title.unwrap_or_else(|| course.title.clone())),
            description: Some(self.description.unwrap_or_else(|| course.description.clone())),
            estimated_time: self.estimated_time.or_else(|| course.estimated_time.clone()),
            materials_needed: self.materials_needed.or_else(|| course.materials_needed.clone()),
        }
        .validate()
    }
}
