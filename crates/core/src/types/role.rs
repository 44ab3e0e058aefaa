//! User roles as reported by the account profile endpoint.

use serde::{Deserialize, Serialize};

/// A role name attached to a user account.
///
/// The API sends roles as a list of strings. Staff roles (`Admin`,
/// `Restaurant`, `Branch`) may manage delivery fees; everyone else is a
/// customer as far as the storefront is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Restaurant,
    Branch,
    Customer,
    /// Any role the storefront does not act on.
    Other(String),
}

impl Role {
    /// Whether this role grants access to staff screens.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Restaurant | Self::Branch)
    }

    /// The role name as the API spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "Admin",
            Self::Restaurant => "Restaurant",
            Self::Branch => "Branch",
            Self::Customer => "Customer",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Admin" => Self::Admin,
            "Restaurant" => Self::Restaurant,
            "Branch" => Self::Branch,
            "Customer" | "User" => Self::Customer,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether any of the given role names is a staff role.
///
/// Matching is exact and case-sensitive, the same way the API spells roles.
#[must_use]
pub fn has_staff_role<S: AsRef<str>>(roles: &[S]) -> bool {
    roles.iter().any(|r| Role::from(r.as_ref()).is_staff())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_roles() {
        assert!(has_staff_role(&["Admin"]));
        assert!(has_staff_role(&["Customer", "Branch"]));
        assert!(has_staff_role(&["Restaurant".to_string()]));
    }

    #[test]
    fn test_non_staff_roles() {
        assert!(!has_staff_role::<&str>(&[]));
        assert!(!has_staff_role(&["User", "Customer"]));
        // Case matters: the API always sends capitalised names.
        assert!(!has_staff_role(&["admin"]));
    }

    #[test]
    fn test_unknown_role_round_trips() {
        let role: Role = serde_json::from_str("\"Driver\"").unwrap();
        assert_eq!(role, Role::Other("Driver".to_string()));
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"Driver\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(Role::Admin.to_string(), "Admin");
        assert_eq!(Role::from("User"), Role::Customer);
    }
}
