//! Congregation use-cases: CRUD with the optional main-zone geometry.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::congregation::{Congregation, Zone};
use super::geometry::{wkt_from_point, LngLat, Ring};
use super::ports::{CongregationRepository, TerritoryRepository};
use super::Error;

/// Input for creating a congregation.
#[derive(Debug, Clone, Default)]
pub struct NewCongregation {
    pub name: Option<String>,
    pub description: Option<String>,
    pub boundaries: Option<Ring>,
    pub center: Option<LngLat>,
}

/// Update input for a congregation.
///
/// Name and description are partial (absent leaves them unchanged), but the
/// zone follows the "delete main zone" contract: an update carrying no
/// boundaries clears the stored zone, so callers must always send the full
/// geometry state.
#[derive(Debug, Clone, Default)]
pub struct CongregationUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub boundaries: Option<Ring>,
    pub center: Option<LngLat>,
}

/// Use-case service owning congregations and their cascade.
#[derive(Clone)]
pub struct CongregationService {
    congregations: Arc<dyn CongregationRepository>,
    territories: Arc<dyn TerritoryRepository>,
}

impl CongregationService {
    pub fn new(
        congregations: Arc<dyn CongregationRepository>,
        territories: Arc<dyn TerritoryRepository>,
    ) -> Self {
        Self {
            congregations,
            territories,
        }
    }

    /// All congregations.
    pub async fn list(&self) -> Result<Vec<Congregation>, Error> {
        Ok(self.congregations.list().await?)
    }

    /// Fetch one congregation.
    pub async fn get(&self, id: Uuid) -> Result<Congregation, Error> {
        self.require(id).await
    }

    /// Create a congregation; the main zone is optional but must arrive as a
    /// complete boundaries/center pair.
    pub async fn create(&self, input: NewCongregation) -> Result<Congregation, Error> {
        let mut errors = Vec::new();

        let name = match input.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                errors.push("Name can't be blank".to_owned());
                String::new()
            }
        };
        let zone = match zone_from_parts(input.boundaries, input.center) {
            Ok(zone) => zone,
            Err(message) => {
                errors.push(message);
                None
            }
        };
        if !errors.is_empty() {
            return Err(validation_error(errors));
        }

        let now = Utc::now();
        let congregation = Congregation {
            id: Uuid::new_v4(),
            name,
            description: input.description,
            zone,
            created_at: now,
            updated_at: now,
        };
        self.congregations.insert(&congregation).await?;
        info!(congregation_id = %congregation.id, "congregation created");
        Ok(congregation)
    }

    /// Update a congregation. Absent boundaries clear the stored zone.
    pub async fn update(&self, id: Uuid, update: CongregationUpdate) -> Result<Congregation, Error> {
        let mut congregation = self.require(id).await?;
        let mut errors = Vec::new();

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                errors.push("Name can't be blank".to_owned());
            } else {
                congregation.name = name;
            }
        }
        if let Some(description) = update.description {
            congregation.description = Some(description);
        }
        match zone_from_parts(update.boundaries, update.center) {
            Ok(zone) => congregation.zone = zone,
            Err(message) => errors.push(message),
        }

        if !errors.is_empty() {
            return Err(validation_error(errors));
        }

        congregation.updated_at = Utc::now();
        if !self.congregations.update(&congregation).await? {
            return Err(congregation_not_found(id));
        }
        Ok(congregation)
    }

    /// Delete a congregation, cascading to its territories first.
    pub async fn delete(&self, id: Uuid) -> Result<(), Error> {
        if self.congregations.find_by_id(id).await?.is_none() {
            return Err(congregation_not_found(id));
        }
        let removed = self.territories.delete_by_congregation(id).await?;
        self.congregations.delete(id).await?;
        info!(congregation_id = %id, territories_removed = removed, "congregation deleted");
        Ok(())
    }

    async fn require(&self, id: Uuid) -> Result<Congregation, Error> {
        self.congregations
            .find_by_id(id)
            .await?
            .ok_or_else(|| congregation_not_found(id))
    }
}

/// Assemble the optional zone composite, enforcing both-or-neither.
fn zone_from_parts(
    boundaries: Option<Ring>,
    center: Option<LngLat>,
) -> Result<Option<Zone>, String> {
    match (boundaries, center) {
        (Some(ring), Some(center)) => Ok(Some(Zone {
            boundaries: ring.to_wkt(),
            center: wkt_from_point(center),
        })),
        (None, None) => Ok(None),
        (Some(_), None) => Err("Center must accompany boundaries".to_owned()),
        (None, Some(_)) => Err("Boundaries must accompany center".to_owned()),
    }
}

fn congregation_not_found(id: Uuid) -> Error {
    Error::not_found(format!("congregation {id} not found"))
}

fn validation_error(errors: Vec<String>) -> Error {
    Error::validation_failed("Validation failed").with_details(json!({ "errors": errors }))
}

#[cfg(test)]
mod tests;
