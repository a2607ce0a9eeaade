//! Route-level JWT authentication middleware.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use shared::jwt::JwtConfig;

/// Validated token claims stored in request extensions.
#[derive(Debug, Clone)]
pub struct UserAuthData {
    pub user_id: Uuid,
    /// Token id (jti) for log correlation.
    #[allow(dead_code)]
    pub jti: String,
}

impl UserAuthData {
    /// Checks an access token and extracts the caller's identity.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_access_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;
        let user_id = claims
            .user_id()
            .map_err(|_| "Invalid user ID in token".to_string())?;

        Ok(UserAuthData {
            user_id,
            jti: claims.jti,
        })
    }
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Rejects requests without a valid access token.
///
/// On success the [`UserAuthData`] lands in request extensions, where the
/// user extractors pick it up without re-validating the token.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&req) else {
        return unauthorized("Missing or invalid Authorization header");
    };

    match UserAuthData::validate(&state.jwt, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            unauthorized("Invalid or expired token")
        }
    }
}

/// Records the caller's identity when a valid token is present, but lets
/// anonymous requests through untouched.
pub async fn optional_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth) = bearer_token(&req)
        .and_then(|token| UserAuthData::validate(&state.jwt, token).ok())
    {
        req.extensions_mut().insert(auth);
    }

    next.run(req).await
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}
