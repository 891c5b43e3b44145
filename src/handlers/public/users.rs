use axum::extract::State;

use crate::api::{ApiJson, Created};
use crate::app::AppState;
use crate::database::models::NewUser;
use crate::error::ApiError;

/// POST /api/users - Register a new account
///
/// Validation and duplicate-email failures answer 400 with an `errors`
/// array; anything else propagates to the terminal handler.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(fields): ApiJson<NewUser>,
) -> Result<Created, ApiError> {
    let user = state.store().create_user(fields).await?;
    tracing::info!(user_id = user.id, "created account for {}", user.email_address);

    Ok(Created::at("/", "Account successfully created!"))
}
