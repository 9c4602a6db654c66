use std::sync::Arc;
use std::time::Duration;

use auth::TokenCodec;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_profile::get_profile;
use super::handlers::list_roles::list_roles;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use crate::domain::auth::service::AuthService;
use crate::outbound::repositories::SqliteProfileReader;
use crate::outbound::repositories::SqliteRoleRepository;
use crate::outbound::repositories::SqliteUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub auth_service:
        Arc<AuthService<SqliteUserRepository, SqliteRoleRepository, SqliteProfileReader>>,
    pub roles: Arc<SqliteRoleRepository>,
    pub token_codec: Arc<TokenCodec>,
}

pub fn create_router(
    auth_service: Arc<
        AuthService<SqliteUserRepository, SqliteRoleRepository, SqliteProfileReader>,
    >,
    roles: Arc<SqliteRoleRepository>,
    token_codec: Arc<TokenCodec>,
) -> Router {
    let state = AppState {
        auth_service,
        roles,
        token_codec,
    };

    let public_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/api/roles", get(list_roles));

    let protected_routes = Router::new().route("/auth/me", get(get_profile)).route_layer(
        middleware::from_fn_with_state(state.clone(), auth_middleware),
    );

    // require_admin runs after authenticate (layers added later run first)
    let admin_routes = Router::new()
        .route("/api/users", get(list_users))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
