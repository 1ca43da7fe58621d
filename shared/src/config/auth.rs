//! Authentication and token-signing configuration

use serde::{Deserialize, Serialize};

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret key for signing tokens (HS256)
    pub secret: String,

    /// Token lifetime in minutes
    pub token_ttl_minutes: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Shared secret gating the machine-to-machine token endpoint
    pub api_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::from("change-me-in-production-pulseboard-secret"),
            token_ttl_minutes: 30,
            issuer: String::from("pulseboard"),
            audience: String::from("pulseboard-client"),
            api_key: String::from("change-me-api-key"),
        }
    }
}

impl AuthConfig {
    /// Create a new configuration with an explicit secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set the token lifetime in minutes
    pub fn with_token_ttl_minutes(mut self, minutes: i64) -> Self {
        self.token_ttl_minutes = minutes;
        self
    }

    /// Set the machine-to-machine API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Check whether the default secret is still in place (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == AuthConfig::default().secret
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            token_ttl_minutes: std::env::var("JWT_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.token_ttl_minutes),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            api_key: std::env::var("API_KEY").unwrap_or(defaults.api_key),
        }
    }
}
