//! User read model.
//!
//! Identity and roles are owned by the authentication collaborator; this
//! core only reads users as assignment targets and for display names.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Organisational role, as assigned by the auth collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Anciano,
    Auxiliar,
    Publicador,
}

impl Role {
    /// Wire representation, matching the stored column values.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Anciano => "anciano",
            Self::Auxiliar => "auxiliar",
            Self::Publicador => "publicador",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a stored role string is unrecognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role {value}")]
pub struct InvalidRole {
    pub value: String,
}

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "anciano" => Ok(Self::Anciano),
            "auxiliar" => Ok(Self::Auxiliar),
            "publicador" => Ok(Self::Publicador),
            other => Err(InvalidRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// A user as read by this core.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub congregation_id: Option<Uuid>,
}

impl User {
    /// Display name shown against assigned territories; falls back to the
    /// email when the name is blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.email.as_str()
        } else {
            self.name.as_str()
        }
    }
}
