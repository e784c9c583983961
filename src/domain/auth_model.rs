use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Role {
    #[sqlx(rename = "VOLUNTEER")]
    #[serde(rename = "VOLUNTEER")]
    Volunteer,
    #[sqlx(rename = "COORDINATOR")]
    #[serde(rename = "COORDINATOR")]
    Coordinator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum UserStatus {
    #[sqlx(rename = "ACTIVE")]
    #[serde(rename = "ACTIVE")]
    Active,
    #[sqlx(rename = "INACTIVE")]
    #[serde(rename = "INACTIVE")]
    Inactive,
}

/// Member row as referenced by assignments. Credential fields live with the
/// member-management collaborator, not here.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
}

/// Authenticated identity attached to every request by the auth layer.
/// The core treats it as a capability token and never re-derives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: i64,
    pub role: Role,
}

impl Caller {
    pub fn volunteer(id: i64) -> Self {
        Self {
            id,
            role: Role::Volunteer,
        }
    }

    pub fn coordinator(id: i64) -> Self {
        Self {
            id,
            role: Role::Coordinator,
        }
    }

    pub fn require_coordinator(&self) -> Result<()> {
        if self.role != Role::Coordinator {
            return Err(Error::Forbidden);
        }
        Ok(())
    }
}
