//! Domain-specific error types for authentication and broadcast operations.
//!
//! Validation and verification failures are values, not panics: nothing in
//! this crate throws across a service boundary.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Uniform failure for unknown user and wrong password alike, so the
    /// response does not leak which usernames exist.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid API key")]
    InvalidApiKey,
}

/// Token-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    /// Signature, issuer, audience, or structural failure. Callers treat
    /// this and `Expired` identically at the validation layer; only the
    /// HTTP edge distinguishes them, via the expiry signal header.
    #[error("Invalid token")]
    Invalid,

    #[error("Missing required claim: {claim}")]
    MissingClaim { claim: String },

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Request validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid role: {role}")]
    InvalidRole { role: String },
}

/// Top-level domain error
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}
