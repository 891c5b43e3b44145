use axum::{
    extract::{Extension, State},
    http::StatusCode,
};

use crate::api::{ApiJson, ApiPath, Created};
use crate::app::AppState;
use crate::auth::{self, AuthenticatedContext};
use crate::database::models::{Course, CourseFields};
use crate::error::ApiError;

/// POST /api/courses - Create a course owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedContext>,
    ApiJson(fields): ApiJson<CourseFields>,
) -> Result<Created, ApiError> {
    let course = state.store().create_course(caller.user(), fields).await?;
    tracing::info!(course_id = course.id, user_id = caller.user_id(), "created course");

    Ok(Created::at(
        format!("/courses/{}", course.id),
        "Course successfully created!",
    ))
}

/// PUT /api/courses/:id - Update a course you own
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedContext>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(fields): ApiJson<CourseFields>,
) -> Result<StatusCode, ApiError> {
    let course = owned_course(&state, &caller, id).await?;
    state.store().update_course(&course, fields).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/courses/:id - Delete a course you own
pub async fn destroy(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedContext>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    let course = owned_course(&state, &caller, id).await?;
    state.store().delete_course(&course).await?;
    tracing::info!(course_id = course.id, "deleted course");

    Ok(StatusCode::NO_CONTENT)
}

/// Existence first, then ownership.
async fn owned_course(
    state: &AppState,
    caller: &AuthenticatedContext,
    id: i64,
) -> Result<Course, ApiError> {
    let course = state.store().find_course(id).await?.ok_or(ApiError::NotFound)?;
    auth::authorize(caller, &course)?;
    Ok(course)
}
