//! Authentication flows: login, refresh, and machine-to-machine issuance.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::roles::UserRole;
use crate::domain::token::IssuedToken;
use crate::errors::{AuthError, DomainError, ValidationError};
use crate::services::token::TokenService;

use super::credentials::CredentialStore;

/// Orchestrates credential verification and token issuance.
pub struct AuthService<C: CredentialStore> {
    credentials: C,
    tokens: Arc<TokenService>,
    api_key: String,
}

impl<C: CredentialStore> AuthService<C> {
    pub fn new(credentials: C, tokens: Arc<TokenService>, api_key: impl Into<String>) -> Self {
        Self {
            credentials,
            tokens,
            api_key: api_key.into(),
        }
    }

    /// Verifies the credentials and issues a token on success.
    ///
    /// Failure is uniform: unknown username and wrong password produce the
    /// same error so responses cannot be used for user enumeration.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, DomainError> {
        let profile = self
            .credentials
            .verify(username, password)
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        info!(username = %profile.username, "login succeeded");
        self.tokens.issue(
            &profile.username,
            profile.role.as_str(),
            profile.email,
            profile.mobile_no,
        )
    }

    /// Exchanges a valid existing token for a fresh one.
    pub fn refresh(&self, token: &str) -> Result<IssuedToken, DomainError> {
        if token.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "token".to_string(),
            }
            .into());
        }

        self.tokens.refresh(token)
    }

    /// Machine-to-machine issuance gated by the shared API key.
    ///
    /// The key is checked before anything else; field validation only
    /// applies to callers that already hold the secret.
    pub fn generate_token(
        &self,
        username: &str,
        email: &str,
        mobile_no: &str,
        role: &str,
        api_key: &str,
    ) -> Result<IssuedToken, DomainError> {
        if api_key != self.api_key {
            warn!("generate-token rejected: API key mismatch");
            return Err(AuthError::InvalidApiKey.into());
        }

        for (field, value) in [
            ("username", username),
            ("email", email),
            ("mobileNo", mobile_no),
            ("role", role),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::RequiredField {
                    field: field.to_string(),
                }
                .into());
            }
        }

        let role = UserRole::from_str(role).map_err(|_| ValidationError::InvalidRole {
            role: role.to_string(),
        })?;

        self.tokens.issue(
            username,
            role.as_str(),
            Some(email.to_string()),
            Some(mobile_no.to_string()),
        )
    }
}
