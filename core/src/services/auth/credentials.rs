//! Credential store trait and the static allow-list implementation.

use async_trait::async_trait;

use crate::domain::roles::UserRole;

/// Identity attributes resolved for an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub role: UserRole,
    pub email: Option<String>,
    pub mobile_no: Option<String>,
}

/// Seam for credential verification. The production deployment would back
/// this with a real user store; the shipped implementation is a fixed
/// allow-list.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the user's profile when the credentials match, `None`
    /// otherwise. Unknown user and wrong password are indistinguishable.
    async fn verify(&self, username: &str, password: &str) -> Option<UserProfile>;
}

/// Fixed demo allow-list.
#[derive(Debug, Default)]
pub struct StaticCredentials;

#[async_trait]
impl CredentialStore for StaticCredentials {
    async fn verify(&self, username: &str, password: &str) -> Option<UserProfile> {
        match (username, password) {
            ("admin", "1234") => Some(UserProfile {
                username: "admin".to_string(),
                role: UserRole::Admin,
                email: Some("denaro@example.com".to_string()),
                mobile_no: Some("09123456789".to_string()),
            }),
            ("user", "1234") => Some(UserProfile {
                username: "user".to_string(),
                role: UserRole::User,
                email: Some("denaro@example.com".to_string()),
                mobile_no: Some("09123456789".to_string()),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_users_verify() {
        let store = StaticCredentials;

        let admin = store.verify("admin", "1234").await.unwrap();
        assert_eq!(admin.role, UserRole::Admin);

        let user = store.verify("user", "1234").await.unwrap();
        assert_eq!(user.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_bad_credentials_are_uniform() {
        let store = StaticCredentials;

        assert_eq!(store.verify("admin", "wrong").await, None);
        assert_eq!(store.verify("nobody", "1234").await, None);
        assert_eq!(store.verify("", "").await, None);
    }
}
