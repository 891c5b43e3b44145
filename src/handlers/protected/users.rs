use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
};

use crate::api::ApiPath;
use crate::app::AppState;
use crate::auth::{self, AuthenticatedContext};
use crate::database::models::User;
use crate::error::ApiError;

/// GET /api/users - List users. Password hashes are not part of `User`.
pub async fn list(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedContext>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.store().list_users().await?;
    Ok(Json(users))
}

/// DELETE /api/users/:id - Delete your own account and the courses it owns
pub async fn destroy(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedContext>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    let user = state.store().find_user(id).await?.ok_or(ApiError::NotFound)?;
    auth::authorize(&caller, &user)?;

    state.store().delete_user(&user).await?;
    tracing::info!(user_id = user.id, "deleted account");

    Ok(StatusCode::NO_CONTENT)
}
