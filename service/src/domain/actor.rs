use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Role of whoever performs a workflow action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Leadership,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Leadership => "leadership",
            Role::Staff => "staff",
        }
    }

    /// Roles allowed to approve, reject or send a topic back for revision
    pub fn is_reviewer(&self) -> bool {
        matches!(self, Role::Admin | Role::Leadership)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "leadership" => Ok(Role::Leadership),
            "staff" => Ok(Role::Staff),
            _ => Err(UnknownRole(value.to_string())),
        }
    }
}

/// Identity performing an action.
///
/// Supplied by the surrounding system; this crate never authenticates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_roles_case_insensitively() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" leadership ".parse::<Role>(), Ok(Role::Leadership));
        assert_eq!("staff".parse::<Role>(), Ok(Role::Staff));
        assert!("editor-in-chief".parse::<Role>().is_err());
    }

    #[test]
    fn unknown_role_names_the_input() {
        let err = "Editor".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("Editor".to_string()));
        assert_eq!(err.to_string(), "unknown role 'Editor'");
    }

    #[test]
    fn only_admin_and_leadership_review() {
        assert!(Role::Admin.is_reviewer());
        assert!(Role::Leadership.is_reviewer());
        assert!(!Role::Staff.is_reviewer());
    }
}
