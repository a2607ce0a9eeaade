//! Authentication service for user registration, login, and token management.

use std::sync::Arc;

use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use sqlx::PgPool;
use thiserror::Error;

use domain::models::{Role, User};
use persistence::repositories::UserRepository;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Username already taken")]
    UsernameAlreadyExists,

    #[error("Role cannot be assigned at registration")]
    RoleNotAllowed,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result of a successful registration, login or refresh.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    /// Frontend route the client should land on after authenticating.
    pub dashboard_path: &'static str,
}

/// Authentication service.
///
/// Tokens are stateless: a refresh is honored as long as the refresh JWT
/// verifies and the account is still allowed to log in. Banning or
/// deactivating an account therefore invalidates its refresh tokens at
/// the next use.
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtConfig>,
    access_token_expiry: i64,
}

impl AuthService {
    /// Creates a new AuthService with the given database pool and JWT configuration.
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>, access_token_expiry: i64) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
            access_token_expiry,
        }
    }

    /// Register a new user with username, email, password and role.
    ///
    /// Only brand and influencer accounts can self-register. Admin
    /// accounts are provisioned out of band.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<AuthResult, AuthError> {
        if role == Role::Admin {
            return Err(AuthError::RoleNotAllowed);
        }

        let password_hash = hash_password(password)?;

        // Pre-check duplicates for friendly errors. The unique indexes
        // still back this up under concurrent registration.
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }
        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameAlreadyExists);
        }

        let created = self
            .users
            .create(username, &email.to_lowercase(), &password_hash, role.as_str())
            .await;

        // Unique constraint violation from a concurrent registration
        let entity = match created {
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some("23505") =>
            {
                let constraint = db_err.constraint().unwrap_or_default().to_string();
                if constraint.contains("username") {
                    return Err(AuthError::UsernameAlreadyExists);
                }
                return Err(AuthError::EmailAlreadyExists);
            }
            other => other?,
        };

        let user: User = entity.into();
        self.issue_tokens(user, false)
    }

    /// Login with an identifier (email or username) and password.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        remember: bool,
    ) -> Result<AuthResult, AuthError> {
        let user: User = match self.users.find_by_login_identifier(identifier).await? {
            Some(entity) => entity.into(),
            None => return Err(AuthError::InvalidCredentials),
        };

        // Banned and deactivated accounts get a distinct error so the
        // client can explain the rejection instead of hinting at a typo.
        if !user.can_login() {
            return Err(AuthError::AccountInactive);
        }

        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        let is_valid = verify_password(password, password_hash)?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.users.update_last_login(user.id).await?;

        self.issue_tokens(user, remember)
    }

    /// Exchange a refresh token for a fresh token pair.
    ///
    /// The account's status is re-checked so a ban issued after the
    /// token was minted still takes effect.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResult, AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user_id = claims
            .user_id()
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user: User = match self.users.find_by_id(user_id).await? {
            Some(entity) => entity.into(),
            None => return Err(AuthError::InvalidRefreshToken),
        };

        if !user.can_login() {
            return Err(AuthError::AccountInactive);
        }

        self.issue_tokens(user, false)
    }

    fn issue_tokens(&self, user: User, remember: bool) -> Result<AuthResult, AuthError> {
        let (access_token, _) = self.jwt.generate_access_token(user.id)?;
        let (refresh_token, _) = self.jwt.generate_refresh_token(user.id, remember)?;
        let dashboard_path = user.role.dashboard_path();

        Ok(AuthResult {
            user,
            access_token,
            refresh_token,
            expires_in: self.access_token_expiry,
            dashboard_path,
        })
    }
}
