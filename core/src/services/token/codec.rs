//! JWT encode/decode. Pure: no I/O, no clock beyond jsonwebtoken's own
//! expiry check.

use chrono::{TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use pb_shared::config::AuthConfig;

use crate::domain::token::{ClaimSet, Claims};
use crate::errors::TokenError;

/// Encodes and verifies signed bearer tokens.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Builds a codec pinned to the configured secret, issuer, and
    /// audience. Expiry is enforced with zero leeway.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Signs the claims into a token string.
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| TokenError::GenerationFailed)
    }

    /// Verifies signature, issuer, audience, and expiry.
    ///
    /// Expiry is the only failure reported distinctly; every other
    /// verification failure collapses to `TokenError::Invalid`.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

/// Extracts the client-side claim view from a token without verifying the
/// signature. The client holds no signing material; it only needs the
/// identity and expiry embedded in the payload.
///
/// Any failure degrades to the empty `ClaimSet`.
pub fn decode_claim_set(token: &str) -> ClaimSet {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let payload = match decode::<serde_json::Value>(
        token,
        &DecodingKey::from_secret(&[]),
        &validation,
    ) {
        Ok(data) => data.claims,
        Err(_) => return ClaimSet::default(),
    };

    let username = ["username", "sub", "name"]
        .iter()
        .find_map(|key| payload.get(*key))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from);

    let mut roles = Vec::new();
    for key in ["role", "roles"] {
        match payload.get(key) {
            Some(serde_json::Value::String(role)) if !role.is_empty() => {
                roles.push(role.clone());
            }
            Some(serde_json::Value::Array(values)) => {
                roles.extend(
                    values
                        .iter()
                        .filter_map(|v| v.as_str())
                        .filter(|s| !s.is_empty())
                        .map(String::from),
                );
            }
            _ => {}
        }
    }

    let expires_at = payload
        .get("exp")
        .and_then(|v| v.as_i64())
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

    ClaimSet {
        username,
        roles,
        expires_at,
    }
}
