//! Authentication DTOs. Successful issuance responses reuse
//! `pb_core::IssuedToken`, which already serializes to the
//! `{token, expiresAt}` wire shape.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_deserializes() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"username":"admin","password":"1234"}"#).unwrap();
        assert_eq!(request.username, "admin");
        assert_eq!(request.password, "1234");
    }
}
