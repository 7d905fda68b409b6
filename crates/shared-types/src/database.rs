//! Row shapes of the hosted backend's tables, as returned by its REST layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{RoleRecord, UserRole};

/// A row of `user_roles`. The column is an enum of `admin`/`user` in the
/// backend, but other names are tolerated on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRoleRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<UserRoleRow> for RoleRecord {
    fn from(row: UserRoleRow) -> Self {
        RoleRecord {
            user_id: row.user_id,
            role: row.role,
        }
    }
}

/// A captured contact-form or newsletter email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRow {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Page or campaign the address came from.
    #[serde(default)]
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A lawyer's public profile awaiting or holding verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawyerProfileRow {
    pub id: Uuid,
    pub user_id: String,
    pub full_name: String,
    #[serde(default)]
    pub bar_number: Option<String>,
    #[serde(default)]
    pub practice_areas: Vec<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
