use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Last line of defense: a panicking handler still answers with the
/// unclassified error shape instead of dropping the connection.
pub fn render_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::unclassified(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}
