//! Token-level authentication extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuthData;

/// Claims of a validated access token.
///
/// Cheaper than [`crate::extractors::CurrentUser`] because it never touches
/// the database; handlers that only need the caller's id should prefer it.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// Account id from the token subject claim.
    pub user_id: Uuid,
    /// Token id (jti) for log correlation.
    #[allow(dead_code)]
    pub jti: String,
}

impl From<UserAuthData> for UserAuth {
    fn from(data: UserAuthData) -> Self {
        Self {
            user_id: data.user_id,
            jti: data.jti,
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // The auth middleware may already have validated the token.
        if let Some(auth) = parts.extensions.get::<UserAuthData>() {
            return Ok(auth.clone().into());
        }

        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let auth_data = UserAuthData::validate(&state.jwt, token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(auth_data.into())
    }
}

/// Like [`UserAuth`] but anonymous requests pass through as `None`.
///
/// Used on public endpoints whose behaviour differs for signed-in callers,
/// such as profile view counting.
#[derive(Debug, Clone)]
pub struct OptionalUserAuth(pub Option<UserAuth>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuthData>() {
            return Ok(OptionalUserAuth(Some(auth.clone().into())));
        }

        // A malformed or expired token degrades to anonymous rather than
        // rejecting the request.
        let auth = bearer_token(parts)
            .and_then(|token| UserAuthData::validate(&state.jwt, token).ok())
            .map(UserAuth::from);

        Ok(OptionalUserAuth(auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header("Authorization", value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn bearer_token_strips_scheme() {
        let parts = parts_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let parts = parts_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn missing_header_yields_none() {
        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn user_auth_carries_claims() {
        let data = UserAuthData {
            user_id: Uuid::new_v4(),
            jti: "jti-1".to_string(),
        };
        let auth: UserAuth = data.clone().into();
        assert_eq!(auth.user_id, data.user_id);
        assert_eq!(auth.jti, "jti-1");
    }
}
