//! Newsroom HTTP API
//!
//! Routes requests for topics, articles, comments and users to the
//! repository and renders results and errors as JSON.

pub mod handlers;
pub mod middleware;

use axum::{
    routing::{delete, get},
    Router,
};
use newsroom_common::db::DbPool;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
}

impl AppState {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let api_routes = Router::new()
        .route("/", get(handlers::catalog::get_endpoints))
        .route("/topics", get(handlers::topics::get_topics))
        .route("/users", get(handlers::users::get_users))
        .route("/articles", get(handlers::articles::get_articles))
        .route(
            "/articles/{article_id}",
            get(handlers::articles::get_article).patch(handlers::articles::patch_article),
        )
        .route(
            "/articles/{article_id}/comments",
            get(handlers::comments::get_comments).post(handlers::comments::post_comment),
        )
        .route("/comments/{comment_id}", delete(handlers::comments::delete_comment))
        .method_not_allowed_fallback(handlers::catalog::unknown_route);

    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/api", api_routes)
        .fallback(handlers::catalog::unknown_route)
        .method_not_allowed_fallback(handlers::catalog::unknown_route)
        .layer(axum::middleware::from_fn(middleware::metrics::track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}
