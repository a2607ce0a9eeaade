//! Account-loading extractors.
//!
//! These extractors resolve the authenticated token to a full account
//! record and enforce account status before the handler runs.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::user_auth::UserAuth;
use domain::models::User;
use persistence::repositories::UserRepository;

/// The authenticated user's full account record.
///
/// Rejects with 401 when the token is missing or invalid, 404 when the
/// account no longer exists, and 403 when the account is banned or
/// deactivated. Tokens issued before a ban stop working at the next request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = UserAuth::from_request_parts(parts, state).await?;

        let repo = UserRepository::new(state.pool.clone());
        let user: User = repo
            .find_by_id(auth.user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
            .into();

        if !user.can_login() {
            return Err(ApiError::Forbidden("Account is inactive".to_string()));
        }

        Ok(CurrentUser(user))
    }
}

/// The authenticated user's account record, restricted to administrators.
///
/// Identical to [`CurrentUser`] but additionally rejects with 403 when
/// the account does not hold the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(ApiError::Forbidden("Admin privileges required".to_string()));
        }

        Ok(AdminUser(user))
    }
}
