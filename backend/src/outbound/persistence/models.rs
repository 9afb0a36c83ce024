//! Diesel row structs and their mappings into domain types.
//!
//! Rows are internal to the persistence layer. Geometry columns arrive as
//! WKT text (selected through `ST_AsText`), so the domain sees exactly the
//! representation it stores.

use chrono::{DateTime, Utc};
use diesel::Queryable;
use uuid::Uuid;

use crate::domain::{Congregation, Role, Status, Territory, User, Zone};

/// A territory row with geometry already rendered to WKT.
#[derive(Debug, Queryable)]
pub struct TerritoryRow {
    pub id: Uuid,
    pub congregation_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub number: Option<i32>,
    pub boundaries: String,
    pub center: String,
    pub assigned_to_id: Option<Uuid>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TerritoryRow> for Territory {
    type Error = String;

    fn try_from(row: TerritoryRow) -> Result<Self, Self::Error> {
        let status: Status = row
            .status
            .parse()
            .map_err(|e| format!("territory {}: {e}", row.id))?;
        Ok(Territory {
            id: row.id,
            congregation_id: row.congregation_id,
            name: row.name,
            description: row.description,
            notes: row.notes,
            status,
            number: row.number,
            boundaries: row.boundaries,
            center: row.center,
            assigned_to_id: row.assigned_to_id,
            assigned_at: row.assigned_at,
            returned_at: row.returned_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A congregation row with the nullable zone pair as WKT.
#[derive(Debug, Queryable)]
pub struct CongregationRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub boundaries: Option<String>,
    pub center: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CongregationRow> for Congregation {
    type Error = String;

    fn try_from(row: CongregationRow) -> Result<Self, Self::Error> {
        let zone = match (row.boundaries, row.center) {
            (Some(boundaries), Some(center)) => Some(Zone { boundaries, center }),
            (None, None) => None,
            _ => {
                return Err(format!(
                    "congregation {}: zone columns out of sync",
                    row.id
                ));
            }
        };
        Ok(Congregation {
            id: row.id,
            name: row.name,
            description: row.description,
            zone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A user row.
#[derive(Debug, Queryable)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub active: bool,
    pub congregation_id: Option<Uuid>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e| format!("user {}: {e}", row.id))?;
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
            active: row.active,
            congregation_id: row.congregation_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn congregation_row(
        boundaries: Option<&str>,
        center: Option<&str>,
    ) -> CongregationRow {
        CongregationRow {
            id: Uuid::new_v4(),
            name: "Centro".to_owned(),
            description: None,
            boundaries: boundaries.map(str::to_owned),
            center: center.map(str::to_owned),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn zone_pair_maps_to_the_composite() {
        let row = congregation_row(
            Some("POLYGON((0 0, 1 0, 1 1, 0 0))"),
            Some("POINT(0.5 0.3)"),
        );
        let congregation = Congregation::try_from(row).expect("maps");
        assert!(congregation.zone.is_some());
    }

    #[test]
    fn absent_zone_maps_to_none() {
        let congregation =
            Congregation::try_from(congregation_row(None, None)).expect("maps");
        assert!(congregation.zone.is_none());
    }

    #[test]
    fn half_present_zone_is_reported() {
        let err = Congregation::try_from(congregation_row(Some("POLYGON((0 0, 1 0, 1 1, 0 0))"), None))
            .expect_err("out of sync rejected");
        assert!(err.contains("out of sync"));
    }

    #[test]
    fn unknown_status_strings_are_reported_with_the_row_id() {
        let row = TerritoryRow {
            id: Uuid::new_v4(),
            congregation_id: Uuid::new_v4(),
            name: "Territory 1".to_owned(),
            description: None,
            notes: None,
            status: "archived".to_owned(),
            number: Some(1),
            boundaries: "POLYGON((0 0, 1 0, 1 1, 0 0))".to_owned(),
            center: "POINT(0.5 0.3)".to_owned(),
            assigned_to_id: None,
            assigned_at: None,
            returned_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let err = Territory::try_from(row).expect_err("bad status rejected");
        assert!(err.contains("archived"));
    }
}
