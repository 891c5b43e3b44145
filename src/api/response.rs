use axum::{
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// `{ "message": ... }` body used by the greeting and create responses.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// 201 Created with a `Location` header and a message body.
#[derive(Debug)]
pub struct Created {
    location: String,
    message: &'static str,
}

impl Created {
    pub fn at(location: impl Into<String>, message: &'static str) -> Self {
        Self {
            location: location.into(),
            message,
        }
    }
}

impl IntoResponse for Created {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::CREATED, Json(Message { message: self.message })).into_response();
        match HeaderValue::from_str(&self.location) {
            Ok(value) => {
                response.headers_mut().insert(LOCATION, value);
            }
            Err(e) => tracing::error!("Invalid Location header {:?}: {}", self.location, e),
        }
        response
    }
}
