//! Main token service implementation

use pb_shared::config::AuthConfig;

use crate::domain::token::{Claims, IssuedToken};
use crate::errors::{DomainError, TokenError};

use super::codec::TokenCodec;

/// Service for issuing, validating, and refreshing bearer tokens.
pub struct TokenService {
    codec: TokenCodec,
    config: AuthConfig,
}

impl TokenService {
    /// Creates a new token service. Key material is derived once here;
    /// a bad configuration surfaces at startup, not per call.
    pub fn new(config: AuthConfig) -> Self {
        Self {
            codec: TokenCodec::new(&config),
            config,
        }
    }

    /// Issues a fresh signed token for the given identity.
    ///
    /// `iat` is now, `exp` is now plus the configured TTL, issuer and
    /// audience come from configuration.
    pub fn issue(
        &self,
        username: &str,
        role: &str,
        email: Option<String>,
        mobile_no: Option<String>,
    ) -> Result<IssuedToken, DomainError> {
        let claims = Claims::new(
            username,
            role,
            email,
            mobile_no,
            self.config.token_ttl_minutes,
            &self.config.issuer,
            &self.config.audience,
        );

        let token = self.codec.encode(&claims)?;
        let expires_at = claims.expires_at().ok_or_else(|| DomainError::Internal {
            message: "Invalid expiry timestamp".to_string(),
        })?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies signature, issuer, audience, and expiry.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.codec.decode(token)
    }

    /// Produces a new token from the claims of a valid existing one.
    ///
    /// Rejected when validation fails or when the old claims lack a
    /// username or role. The new token gets a full fresh TTL window: a
    /// still-valid token is sufficient to extend the session indefinitely
    /// (sliding-window policy).
    pub fn refresh(&self, token: &str) -> Result<IssuedToken, DomainError> {
        let claims = self.validate(token)?;

        if claims.username.trim().is_empty() {
            return Err(TokenError::MissingClaim {
                claim: "username".to_string(),
            }
            .into());
        }
        if claims.role.trim().is_empty() {
            return Err(TokenError::MissingClaim {
                claim: "role".to_string(),
            }
            .into());
        }

        self.issue(&claims.username, &claims.role, claims.email, claims.mobile_no)
    }
}
