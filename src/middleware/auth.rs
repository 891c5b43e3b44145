use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth;
use crate::error::ApiError;

/// Authentication gate for protected routes.
///
/// Verifies the Basic credentials and inserts the resulting
/// `AuthenticatedContext` into the request extensions, where handlers pick it
/// up with `Extension<AuthenticatedContext>`. On failure the wrapped handler
/// never runs and the caller gets 401 `{ "message": "Access Denied" }`.
pub async fn require_credentials(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = auth::verify(state.store(), request.headers()).await?;

    tracing::debug!(
        user_id = context.user_id(),
        "authenticated {}",
        context.user().display_name()
    );

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}
