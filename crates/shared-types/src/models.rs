use serde::{Deserialize, Serialize};
use std::fmt;

/// Authorization level assigned to a user.
///
/// The `user_roles` table only persists `admin` and `user`, but role names
/// such as `attorney` and `client` are routed on as well. Any other string is
/// kept in `Unknown`, trimmed and lowercased, rather than collapsed into a
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Admin,
    User,
    Attorney,
    Client,
    /// Trimmed, lowercased name. Build it with [`UserRole::parse`] so it
    /// compares equal to a resolved role.
    Unknown(String),
}

impl UserRole {
    /// Parse a role name case-insensitively, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "admin" => UserRole::Admin,
            "user" => UserRole::User,
            "attorney" => UserRole::Attorney,
            "client" => UserRole::Client,
            other => UserRole::Unknown(other.to_string()),
        }
    }

    /// Lowercase name as stored in the backend.
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::Attorney => "attorney",
            UserRole::Client => "client",
            UserRole::Unknown(name) => name,
        }
    }
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        UserRole::parse(&s)
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence that a user is currently authenticated. Carries no role
/// information.
///
/// The user id is present exactly when the session is; the two constructors
/// are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    pub fn present(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn absent() -> Self {
        Self { user_id: None }
    }

    pub fn is_present(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

/// A single role assignment for a user, as returned by a role lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub user_id: String,
    pub role: UserRole,
}

impl RoleRecord {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}
