//! Authentication routes for registration, login, and token management.

use axum::{extract::State, http::StatusCode, Json};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use domain::models::{Role, User};
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::AuthError;

/// Request body for user registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Desired username (3-30 chars, letters, digits, underscore)
    #[validate(custom(function = "shared::validation::validate_username"))]
    pub username: String,

    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// User's password (min 8 chars, at least one letter and one digit)
    #[validate(custom(function = "shared::validation::validate_password_strength"))]
    pub password: String,

    /// Account role: brand or influencer
    pub role: String,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address or username
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Extends the refresh token lifetime when true
    #[serde(default)]
    pub remember_me: bool,
}

/// Request body for token refresh.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Request body for the forgot-password flow.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Token information in response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Response body for successful registration, login, or refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub tokens: TokensResponse,
    /// Frontend route the client should land on after authenticating.
    pub dashboard_path: &'static str,
}

/// Generic acknowledgement body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

fn auth_response(result: crate::services::auth::AuthResult) -> AuthResponse {
    AuthResponse {
        user: result.user,
        tokens: TokensResponse {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: result.expires_in,
        },
        dashboard_path: result.dashboard_path,
    }
}

fn map_auth_error(error: AuthError) -> ApiError {
    match error {
        AuthError::EmailAlreadyExists => {
            ApiError::Conflict("Email already registered".to_string())
        }
        AuthError::UsernameAlreadyExists => {
            ApiError::Conflict("Username already taken".to_string())
        }
        AuthError::RoleNotAllowed => ApiError::UnprocessableEntity(
            "Admin accounts cannot be self-registered".to_string(),
        ),
        AuthError::InvalidCredentials => {
            ApiError::Unauthorized("Invalid credentials".to_string())
        }
        AuthError::AccountInactive => ApiError::Forbidden("Account is inactive".to_string()),
        AuthError::InvalidRefreshToken => {
            ApiError::Unauthorized("Invalid refresh token".to_string())
        }
        AuthError::DatabaseError(db_err) => ApiError::from(db_err),
        AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
        AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
    }
}

/// Register a new brand or influencer account.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let role: Role = request
        .role
        .parse()
        .map_err(|_| ApiError::Validation(format!("Invalid role: {}", request.role)))?;

    let result = state
        .auth
        .register(&request.username, &request.email, &request.password, role)
        .await
        .map_err(map_auth_error)?;

    info!(user_id = %result.user.id, role = %result.user.role, "User registered");

    Ok((StatusCode::CREATED, Json(auth_response(result))))
}

/// Login with email or username.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let result = state
        .auth
        .login(&request.identifier, &request.password, request.remember_me)
        .await
        .map_err(map_auth_error)?;

    info!(user_id = %result.user.id, "User logged in");

    Ok(Json(auth_response(result)))
}

/// Exchange a refresh token for a new token pair.
///
/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let result = state
        .auth
        .refresh(&request.refresh_token)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(auth_response(result)))
}

/// Acknowledge a logout.
///
/// Tokens are stateless, so the server has nothing to revoke; the
/// endpoint exists so clients can treat logout as a server round trip.
///
/// POST /api/v1/auth/logout
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out".to_string(),
    })
}

/// Start a password reset.
///
/// Always returns the same acknowledgement whether or not the email is
/// registered, so the endpoint cannot be used to probe for accounts.
///
/// POST /api/v1/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let users = UserRepository::new(state.pool.clone());
    if let Some(entity) = users.find_by_email(&request.email).await? {
        let mut token_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut token_bytes);
        let reset_token = hex::encode(token_bytes);

        if let Err(e) = state
            .email
            .send_password_reset_email(&entity.email, &reset_token)
            .await
        {
            warn!(error = %e, "Failed to send password reset email");
        }
    }

    Ok(Json(MessageResponse {
        message: "If that email is registered, a reset link has been sent".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: "influencer".to_string(),
        }
    }

    #[test]
    fn test_register_request_valid() {
        let request = register_request("creator_jane", "jane@example.com", "sunny1234");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_invalid_email() {
        let request = register_request("creator_jane", "not-an-email", "sunny1234");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_short_username() {
        let request = register_request("ab", "jane@example.com", "sunny1234");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_username_charset() {
        let request = register_request("jane doe", "jane@example.com", "sunny1234");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_short_password() {
        let request = register_request("creator_jane", "jane@example.com", "ab1");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_password_policy_requires_digit() {
        let request = register_request("creator_jane", "jane@example.com", "onlyletters");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_password_policy_requires_letter() {
        let request = register_request("creator_jane", "jane@example.com", "1234567890");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_defaults_remember_me() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"identifier":"jane","password":"pw"}"#).unwrap();
        assert!(!request.remember_me);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_refresh_request_empty_token() {
        let request = RefreshRequest {
            refresh_token: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
