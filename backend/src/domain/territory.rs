//! Territory aggregate and its assignment lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Assignment lifecycle status.
///
/// Transitions happen only through the named operations on [`Territory`];
/// there is deliberately no prior-state precondition, so reassigning an
/// already-assigned or completed territory is allowed and repeated calls
/// only refresh timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Available,
    Assigned,
    Completed,
    Returned,
}

impl Default for Status {
    fn default() -> Self {
        Self::Available
    }
}

impl Status {
    /// Wire representation, matching the stored column values.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
            Self::Returned => "returned",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing a status string from a payload or row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status must be one of available, assigned, completed, returned; got {value}")]
pub struct InvalidStatus {
    pub value: String,
}

impl FromStr for Status {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "assigned" => Ok(Self::Assigned),
            "completed" => Ok(Self::Completed),
            "returned" => Ok(Self::Returned),
            other => Err(InvalidStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// A polygonal sub-area of a congregation, assignable to a user.
///
/// Geometry is held as stored: WKT strings in SRID 4326. `boundaries` and
/// `center` are mandatory once a territory exists; the conversion from the
/// wire GeoJSON happens before construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Territory {
    pub id: Uuid,
    pub congregation_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub status: Status,
    /// Unique within the congregation when set; `None` numbers are unlimited.
    pub number: Option<i32>,
    /// WKT `POLYGON((...))`, ring closed.
    pub boundaries: String,
    /// WKT `POINT(lng lat)`.
    pub center: String,
    pub assigned_to_id: Option<Uuid>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Territory {
    /// Assign the territory to a user. Allowed from any prior status.
    pub fn assign(&mut self, user_id: Uuid, now: DateTime<Utc>) {
        self.assigned_to_id = Some(user_id);
        self.assigned_at = Some(now);
        self.status = Status::Assigned;
        self.updated_at = now;
    }

    /// Mark the territory returned.
    ///
    /// `assigned_to_id` is intentionally left in place so a returned
    /// territory still shows who last worked it; see DESIGN.md for the
    /// product question around clearing it.
    pub fn mark_returned(&mut self, now: DateTime<Utc>) {
        self.returned_at = Some(now);
        self.status = Status::Returned;
        self.updated_at = now;
    }

    /// Mark the territory completed. No other field is touched.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.status = Status::Completed;
        self.updated_at = now;
    }

    /// Next auto-assigned number for a congregation: `max + 1`, never
    /// gap-fill, starting at 1 for an empty congregation.
    pub fn next_number(current_max: Option<i32>) -> i32 {
        current_max.unwrap_or(0) + 1
    }

    /// Default name derived from the resolved number.
    pub fn default_name(number: i32) -> String {
        format!("Territory {number}")
    }
}
