use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    extract::State,
    Router,
};
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::api::Message;
use crate::config::AppConfig;
use crate::database::Store;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{render_panic, require_credentials};

/// Shared by every request: only the store handle, no per-request data.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

/// Full application router with the global layers from `config`.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = router(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

/// Routes plus the terminal error handling, without the optional layers.
///
/// Each path carries its own method fallback, so a known path with an
/// unregistered method is "Route Not Found" and never reaches the auth gate.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root).fallback(route_not_found))
        .route("/health", get(health).fallback(route_not_found))
        .nest("/api", api_routes(state.clone()))
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(render_panic))
        .with_state(state)
}

// Protected methods are registered first and gated with `route_layer`, which
// only wraps the endpoints present at that point. Public methods added after
// it, and the method fallback, stay outside the gate.
fn api_routes(state: AppState) -> Router<AppState> {
    let gate = from_fn_with_state(state, require_credentials);

    Router::new()
        .route(
            "/users",
            get(protected::users::list)
                .route_layer(gate.clone())
                .post(public::users::create)
                .fallback(route_not_found),
        )
        .route(
            "/users/:id",
            delete(protected::users::destroy)
                .route_layer(gate.clone())
                .fallback(route_not_found),
        )
        .route(
            "/courses",
            post(protected::courses::create)
                .route_layer(gate.clone())
                .get(public::courses::list)
                .fallback(route_not_found),
        )
        .route(
            "/courses/:id",
            put(protected::courses::update)
                .delete(protected::courses::destroy)
                .route_layer(gate)
                .get(public::courses::show)
                .fallback(route_not_found),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(AllowOrigin::list(origins))
}

async fn root() -> Json<Message> {
    Json(Message {
        message: "Welcome to the REST API project!",
    })
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
