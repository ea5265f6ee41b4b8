//! Role table for the console's gated route groups.
//!
//! Mirrors the platform's account model: SYSTEM staff manage the shared
//! catalog (categories, publishers, authors, genres); ISSUER accounts
//! manage their own books and series. Authentication happens upstream;
//! this table only says which verified role may enter which group.

use serde::{Deserialize, Serialize};

/// Platform role carried by the gateway-verified role header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Issuer,
}

impl Role {
    /// Parse the header value the auth gateway injects.
    pub fn from_header_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "system" => Some(Role::System),
            "issuer" => Some(Role::Issuer),
            _ => None,
        }
    }
}

/// Access requirement for a route group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Any authenticated account.
    Authenticated,
    /// Only the listed roles.
    Roles(&'static [Role]),
}

impl RouteAccess {
    pub fn permits(&self, role: Role) -> bool {
        match self {
            RouteAccess::Authenticated => true,
            RouteAccess::Roles(allowed) => allowed.contains(&role),
        }
    }
}

pub const SYSTEM_ONLY: RouteAccess = RouteAccess::Roles(&[Role::System]);
pub const ISSUER_ONLY: RouteAccess = RouteAccess::Roles(&[Role::Issuer]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_parsing_is_case_insensitive() {
        assert_eq!(Role::from_header_value("SYSTEM"), Some(Role::System));
        assert_eq!(Role::from_header_value(" issuer "), Some(Role::Issuer));
        assert_eq!(Role::from_header_value("customer"), None);
    }

    #[test]
    fn system_group_rejects_issuer() {
        assert!(SYSTEM_ONLY.permits(Role::System));
        assert!(!SYSTEM_ONLY.permits(Role::Issuer));
        assert!(RouteAccess::Authenticated.permits(Role::Issuer));
    }
}
