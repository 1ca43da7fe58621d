//! Fixed user role set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a token can carry. The set is closed: the machine-to-machine
/// issuance path rejects anything outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    SysAdmin,
    Admin,
    User,
    Guest,
}

impl UserRole {
    /// All valid roles
    pub const ALL: [UserRole; 4] = [
        UserRole::SysAdmin,
        UserRole::Admin,
        UserRole::User,
        UserRole::Guest,
    ];

    /// Canonical claim value for the role
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SysAdmin => "SysAdmin",
            UserRole::Admin => "Admin",
            UserRole::User => "User",
            UserRole::Guest => "Guest",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ();

    /// Exact match against the canonical role names. Client-side role
    /// queries are case-insensitive; this parse, used for validating
    /// issuance requests, is not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SysAdmin" => Ok(UserRole::SysAdmin),
            "Admin" => Ok(UserRole::Admin),
            "User" => Ok(UserRole::User),
            "Guest" => Ok(UserRole::Guest),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_exact() {
        assert_eq!("Admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!("SysAdmin".parse::<UserRole>(), Ok(UserRole::SysAdmin));
        assert!("admin".parse::<UserRole>().is_err());
        assert!("Manager".parse::<UserRole>().is_err());
        assert!("".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for role in UserRole::ALL {
            assert_eq!(role.to_string().parse::<UserRole>(), Ok(role));
        }
    }
}
