use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use thiserror::Error;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::UserId;
use crate::domain::auth::models::ADMIN_ROLE;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Cookie consulted when no Authorization header is supplied.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Request-scoped identity stored in request extensions once the token has
/// been validated.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Why a request failed to authenticate.
///
/// All three map to 401, with distinct detail text so clients can
/// special-case an expired token (re-login prompt) without being able to
/// learn anything else.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("missing access token")]
    NoAccessToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        ApiError::Unauthorized(self.to_string()).into_response()
    }
}

/// Middleware that validates access tokens and exposes [`CurrentUser`] to
/// downstream handlers.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = extract_token(&req)?;

    let claims = state.token_codec.decode(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        match e {
            auth::TokenError::TokenExpired => AuthRejection::TokenExpired,
            _ => AuthRejection::InvalidToken,
        }
    })?;

    let user_id = UserId::from_string(&claims.user_id).map_err(|e| {
        tracing::warn!(error = %e, "Token carries an unparseable user id");
        AuthRejection::InvalidToken
    })?;

    req.extensions_mut().insert(CurrentUser {
        user_id,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Middleware gating a route to admin callers. Must run after
/// [`authenticate`], which populates the extension.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    let current = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AuthRejection::NoAccessToken.into_response())?;

    if !current.is_admin() {
        return Err(
            ApiError::from(AuthError::InsufficientRole(current.role.clone())).into_response(),
        );
    }

    Ok(next.run(req).await)
}

/// Raw token lookup: `Authorization: Bearer <token>` wins, the
/// `access_token` cookie is the fallback.
fn extract_token(req: &Request) -> Result<&str, AuthRejection> {
    let bearer = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = bearer {
        return Ok(token);
    }

    cookie_value(req, ACCESS_TOKEN_COOKIE).ok_or(AuthRejection::NoAccessToken)
}

fn cookie_value<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    let header = req.headers().get(http::header::COOKIE)?.to_str().ok()?;

    header.split(';').map(str::trim).find_map(|pair| {
        pair.strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
    })
}
