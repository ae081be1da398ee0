pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use database::store::Store;

/// Shared application state, passed explicitly to every handler.
/// There is no ambient "current database" or "current user" anywhere
/// below the request boundary.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// State backed by the in-memory store. Used by the integration tests
    /// and by `--memory` runs.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(database::memory::MemoryStore::new()),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_routes())
        // Protected API
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn api_routes() -> Router<AppState> {
    use handlers::protected::{ingredients, recipes, tags};

    Router::new()
        .route(
            "/api/ingredients",
            get(ingredients::ingredient_list).post(ingredients::ingredient_create),
        )
        .route("/api/tags", get(tags::tag_list).post(tags::tag_create))
        .route(
            "/api/recipes",
            get(recipes::recipe_list).post(recipes::recipe_create),
        )
        .route("/api/recipes/:id", get(recipes::recipe_detail))
        // Everything under /api requires a valid bearer token
        .route_layer(axum::middleware::from_fn(
            middleware::auth::jwt_auth_middleware,
        ))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Pantry API",
            "version": version,
            "description": "Recipe management backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public - account + token acquisition)",
                "ingredients": "/api/ingredients (protected)",
                "tags": "/api/tags (protected)",
                "recipes": "/api/recipes[/:id] (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}
