//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Default token lifetime in minutes
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Claims structure for the JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    #[serde(default)]
    pub username: String,

    /// Primary role granted to the user
    #[serde(default)]
    pub role: String,

    /// Contact email, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Contact number, if known
    #[serde(
        rename = "mobileNo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mobile_no: Option<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

impl Claims {
    /// Creates new claims with a fresh issuance window.
    pub fn new(
        username: impl Into<String>,
        role: impl Into<String>,
        email: Option<String>,
        mobile_no: Option<String>,
        ttl_minutes: i64,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::minutes(ttl_minutes);

        Self {
            username: username.into(),
            role: role.into(),
            email,
            mobile_no,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.into(),
            aud: audience.into(),
        }
    }

    /// Expiry as a UTC timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Checks whether the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Whether both identity claims required for refresh are present
    pub fn has_identity(&self) -> bool {
        !self.username.trim().is_empty() && !self.role.trim().is_empty()
    }
}

/// Decoded client-side view of a token.
///
/// Extraction is lenient: a token that cannot be parsed yields the empty
/// `ClaimSet` rather than an error, and an absent role means "no role",
/// never "all roles".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSet {
    /// Username, when extractable
    pub username: Option<String>,

    /// All role claims; the first entry is the primary role
    pub roles: Vec<String>,

    /// Expiry instant, always interpreted in UTC
    pub expires_at: Option<DateTime<Utc>>,
}

impl ClaimSet {
    /// Primary role (first role claim), when present
    pub fn primary_role(&self) -> Option<&str> {
        self.roles.first().map(String::as_str)
    }

    /// Case-insensitive exact role match. Not hierarchical: holding
    /// `Admin` does not imply `User`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Whether any of the given roles matches, case-insensitively.
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }

    /// Whether the set carries no extractable identity
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.roles.is_empty()
    }
}

/// Signed token returned to the caller by every issuance path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    /// The signed, opaque token string
    pub token: String,

    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims_window() {
        let claims = Claims::new(
            "admin",
            "Admin",
            Some("admin@example.com".to_string()),
            None,
            30,
            "pulseboard",
            "pulseboard-client",
        );

        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, "Admin");
        assert_eq!(claims.iss, "pulseboard");
        assert_eq!(claims.aud, "pulseboard-client");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
        assert!(!claims.is_expired());
        assert!(claims.has_identity());
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = Claims::new("user", "User", None, None, 30, "iss", "aud");
        claims.exp = Utc::now().timestamp() - 1;

        assert!(claims.is_expired());
    }

    #[test]
    fn test_claims_missing_identity() {
        let claims = Claims::new("", "Admin", None, None, 30, "iss", "aud");
        assert!(!claims.has_identity());

        let claims = Claims::new("admin", "  ", None, None, 30, "iss", "aud");
        assert!(!claims.has_identity());
    }

    #[test]
    fn test_claims_serialization_round_trip() {
        let claims = Claims::new(
            "admin",
            "Admin",
            Some("admin@example.com".to_string()),
            Some("09123456789".to_string()),
            30,
            "pulseboard",
            "pulseboard-client",
        );

        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("mobileNo"));

        let deserialized: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims, deserialized);
    }

    #[test]
    fn test_claim_set_role_match_is_case_insensitive() {
        let claims = ClaimSet {
            username: Some("admin".to_string()),
            roles: vec!["admin".to_string()],
            expires_at: None,
        };

        assert!(claims.has_role("Admin"));
        assert!(claims.has_role("ADMIN"));
        assert!(!claims.has_role("User"));
        assert!(claims.has_any_role(&["SysAdmin", "Admin"]));
        assert!(!claims.has_any_role(&["SysAdmin", "Guest"]));
    }

    #[test]
    fn test_empty_claim_set_grants_nothing() {
        let claims = ClaimSet::default();

        assert!(claims.is_empty());
        assert!(!claims.has_role("Admin"));
        assert!(!claims.has_any_role(&["Admin", "User", "Guest"]));
        assert_eq!(claims.primary_role(), None);
    }

    #[test]
    fn test_issued_token_wire_shape() {
        let issued = IssuedToken {
            token: "signed".to_string(),
            expires_at: Utc::now(),
        };

        let json = serde_json::to_string(&issued).unwrap();
        assert!(json.contains("\"token\""));
        assert!(json.contains("\"expiresAt\""));
    }
}
