//! Route definitions for the EcoTrace HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_size_bytes as usize;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(request_routes())
        .merge(collection_routes())
        .merge(waste_routes())
        .merge(notification_routes())
        .merge(dashboard_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: login, register, logout, refresh, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/me", get(handlers::auth::me))
}

/// User self-service and directory endpoints
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::user::get_profile))
        .route("/users/me", put(handlers::user::update_profile))
        .route("/users/me/password", put(handlers::user::change_password))
        .route("/users", get(handlers::user::list_users))
}

/// Request intake and approval gate
fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/requests", post(handlers::request::submit))
        .route("/requests", get(handlers::request::list))
        .route("/requests/{id}", get(handlers::request::get))
        .route("/requests/{id}/approve", post(handlers::request::approve))
        .route("/requests/{id}/reject", post(handlers::request::reject))
}

/// Scheduling and the two-phase transport handshake
fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/collections", post(handlers::collection::schedule))
        .route("/collections", get(handlers::collection::list))
        .route("/collections/{id}", get(handlers::collection::get))
        .route(
            "/collections/{id}/transporter",
            put(handlers::collection::assign_transporter),
        )
        .route(
            "/collections/{id}/confirm-reception",
            post(handlers::collection::confirm_reception),
        )
        .route(
            "/collections/{id}/confirm-delivery",
            post(handlers::collection::confirm_delivery),
        )
        .route("/collections/{id}/cancel", post(handlers::collection::cancel))
}

/// Valorization endpoints
fn waste_routes() -> Router<AppState> {
    Router::new()
        .route("/waste-items", get(handlers::waste::list))
        .route("/waste-items/{id}", get(handlers::waste::get))
        .route("/waste-items/{id}/start", post(handlers::waste::start))
        .route("/waste-items/{id}/finalize", post(handlers::waste::finalize))
}

/// Notification endpoints
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list))
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete),
        )
        .route("/notifications", delete(handlers::notification::clear_all))
}

/// Dashboard endpoints
fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard/stats", get(handlers::dashboard::stats))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use http::Method;
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    }

    cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds))
}
