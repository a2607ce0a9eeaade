//! RS256 token pairs for stateless sessions.
//!
//! A login yields a short-lived access token plus a refresh token whose
//! lifetime depends on the remember-me flag. Token type is carried in the
//! claims so a refresh token can never be replayed as an access token.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const DEFAULT_LEEWAY_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingError(String),

    #[error("Token decoding failed: {0}")]
    DecodingError(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unusable signing key: {0}")]
    InvalidKey(String),
}

/// Claims carried by every CrewUp token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: String,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
    /// Issue time as a Unix timestamp.
    pub iat: i64,
    /// Unique token id, logged for correlation.
    pub jti: String,
    pub token_type: TokenType,
}

impl Claims {
    /// Account id parsed from the subject claim.
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidToken)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Signing keys and token lifetimes.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    pub access_token_expiry_secs: i64,
    /// Refresh expiry when remember-me was set.
    pub refresh_token_expiry_secs: i64,
    /// Refresh expiry for plain session logins.
    pub session_refresh_expiry_secs: i64,
    /// Clock skew tolerance applied during validation.
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of debug output.
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("refresh_token_expiry_secs", &self.refresh_token_expiry_secs)
            .field(
                "session_refresh_expiry_secs",
                &self.session_refresh_expiry_secs,
            )
            .field("leeway_secs", &self.leeway_secs)
            .finish_non_exhaustive()
    }
}

impl JwtConfig {
    /// Builds a config from an RSA key pair in PEM format.
    pub fn new(
        private_key_pem: &str,
        public_key_pem: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
        session_refresh_expiry_secs: i64,
    ) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            access_token_expiry_secs,
            refresh_token_expiry_secs,
            session_refresh_expiry_secs,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        })
    }

    /// Symmetric-key config for unit tests; avoids RSA key generation.
    #[cfg(test)]
    pub fn new_for_testing(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs: 900,
            refresh_token_expiry_secs: 2_592_000,
            session_refresh_expiry_secs: 43_200,
            leeway_secs: 0,
        }
    }

    /// Issues an access token. Returns the token and its jti.
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<(String, String), JwtError> {
        self.issue(user_id, TokenType::Access, self.access_token_expiry_secs)
    }

    /// Issues a refresh token. Returns the token and its jti.
    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
        remember: bool,
    ) -> Result<(String, String), JwtError> {
        let expiry_secs = if remember {
            self.refresh_token_expiry_secs
        } else {
            self.session_refresh_expiry_secs
        };
        self.issue(user_id, TokenType::Refresh, expiry_secs)
    }

    fn issue(
        &self,
        user_id: Uuid,
        token_type: TokenType,
        expiry_secs: i64,
    ) -> Result<(String, String), JwtError> {
        let issued_at = Utc::now();
        let jti = Uuid::new_v4().to_string();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (issued_at + Duration::seconds(expiry_secs)).timestamp(),
            iat: issued_at.timestamp(),
            jti: jti.clone(),
            token_type,
        };

        encode(&Header::new(self.algorithm()), &claims, &self.encoding_key)
            .map(|token| (token, jti))
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates signature and expiry, returning the claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm());
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                ErrorKind::InvalidToken | ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Validates a token and requires it to be an access token.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_typed(token, TokenType::Access)
    }

    /// Validates a token and requires it to be a refresh token.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_typed(token, TokenType::Refresh)
    }

    fn validate_typed(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != expected {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }

    /// Tests use HS256, production uses RS256.
    fn algorithm(&self) -> Algorithm {
        #[cfg(test)]
        {
            Algorithm::HS256
        }
        #[cfg(not(test))]
        {
            Algorithm::RS256
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new_for_testing("unit-test-signing-secret")
    }

    #[test]
    fn access_token_round_trips_claims() {
        let config = config();
        let user_id = Uuid::new_v4();

        let (token, jti) = config.generate_access_token(user_id).unwrap();
        let claims = config.validate_access_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.jti, jti);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn refresh_token_round_trips_claims() {
        let config = config();
        let user_id = Uuid::new_v4();

        let (token, _) = config.generate_refresh_token(user_id, true).unwrap();
        let claims = config.validate_refresh_token(&token).unwrap();

        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn remember_me_selects_longer_expiry() {
        let config = config();
        let user_id = Uuid::new_v4();

        let (remembered, _) = config.generate_refresh_token(user_id, true).unwrap();
        let (session, _) = config.generate_refresh_token(user_id, false).unwrap();

        let remembered = config.validate_refresh_token(&remembered).unwrap();
        let session = config.validate_refresh_token(&session).unwrap();

        assert_eq!(
            remembered.exp - remembered.iat,
            config.refresh_token_expiry_secs
        );
        assert_eq!(session.exp - session.iat, config.session_refresh_expiry_secs);
    }

    #[test]
    fn token_types_are_not_interchangeable() {
        let config = config();
        let user_id = Uuid::new_v4();

        let (access, _) = config.generate_access_token(user_id).unwrap();
        let (refresh, _) = config.generate_refresh_token(user_id, false).unwrap();

        assert!(matches!(
            config.validate_refresh_token(&access),
            Err(JwtError::InvalidToken)
        ));
        assert!(matches!(
            config.validate_access_token(&refresh),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut config = config();
        config.access_token_expiry_secs = -10;

        let (token, _) = config.generate_access_token(Uuid::new_v4()).unwrap();

        assert!(matches!(
            config.validate_access_token(&token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let result = config().validate_token("not.a.token");
        assert!(matches!(
            result,
            Err(JwtError::InvalidToken) | Err(JwtError::DecodingError(_))
        ));
    }

    #[test]
    fn malformed_subject_fails_user_id_parse() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
            token_type: TokenType::Access,
        };
        assert!(matches!(claims.user_id(), Err(JwtError::InvalidToken)));
    }
}
