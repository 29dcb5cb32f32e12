//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints:
//! - Post endpoints (CRUD, search, latest)
//! - Tag endpoints
//! - Comment endpoints
//! - Auth endpoints (register, login, logout, profile)
//! - Contact form endpoint

pub mod auth;
pub mod comments;
pub mod contact;
pub mod middleware;
pub mod posts;
pub mod responses;
pub mod tags;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Routes that need a valid session
    let protected_routes = Router::new()
        .nest("/auth", auth::protected_router())
        .route("/posts", post(posts::create_post))
        .route(
            "/posts/{slug}",
            axum::routing::put(posts::update_post).delete(posts::delete_post),
        )
        .route("/posts/{slug}/comments", post(comments::create_comment))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Public routes
    Router::new()
        .route("/posts", get(posts::list_posts))
        .route("/posts/latest", get(posts::latest_posts))
        .route("/posts/{slug}", get(posts::get_post))
        .route("/posts/{slug}/comments", get(comments::get_comments))
        .nest("/tags", tags::router())
        .nest("/auth", auth::public_router())
        .route("/contact", post(contact::send_contact))
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000")),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    Router::new()
        .nest("/api/v1", build_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
