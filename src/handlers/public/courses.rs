use axum::{extract::State, response::Json};

use crate::api::ApiPath;
use crate::app::AppState;
use crate::database::models::Course;
use crate::error::ApiError;

/// GET /api/courses - List every course
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = state.store().list_courses().await?;
    Ok(Json(courses))
}

/// GET /api/courses/:id - Show one course, 404 when it does not exist
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Course>, ApiError> {
    let course = state.store().find_course(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(course))
}
