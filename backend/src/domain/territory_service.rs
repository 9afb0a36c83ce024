//! Territory use-cases: CRUD, auto-numbering, and the assignment lifecycle.
//!
//! Validation runs as explicit functions before persistence; there is no
//! implicit callback chain. Geometry arrives already converted to domain
//! types ([`Ring`], [`LngLat`]) by the inbound adapter and leaves as stored
//! WKT.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::geometry::{wkt_from_point, LngLat, Ring};
use super::ports::{CongregationRepository, TerritoryRepository, UserRepository};
use super::territory::{Status, Territory};
use super::Error;

/// Input for creating a territory.
///
/// `congregation_id` is required but optional here so its absence surfaces
/// through the aggregated validation error instead of a deserialisation
/// failure.
#[derive(Debug, Clone, Default)]
pub struct NewTerritory {
    pub congregation_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub status: Option<Status>,
    pub assigned_to_id: Option<Uuid>,
    pub number: Option<i32>,
    pub boundaries: Option<Ring>,
    pub center: Option<LngLat>,
}

/// Partial update for a territory; absent fields stay unchanged.
#[derive(Debug, Clone, Default)]
pub struct TerritoryUpdate {
    pub congregation_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub status: Option<Status>,
    pub assigned_to_id: Option<Uuid>,
    pub number: Option<i32>,
    pub boundaries: Option<Ring>,
    pub center: Option<LngLat>,
}

/// A territory together with its read-time derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TerritoryDetails {
    pub territory: Territory,
    /// Display name of the current assignee, when any.
    pub assigned_to: Option<String>,
}

/// Use-case service owning the territory lifecycle.
#[derive(Clone)]
pub struct TerritoryService {
    territories: Arc<dyn TerritoryRepository>,
    congregations: Arc<dyn CongregationRepository>,
    users: Arc<dyn UserRepository>,
}

impl TerritoryService {
    pub fn new(
        territories: Arc<dyn TerritoryRepository>,
        congregations: Arc<dyn CongregationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            territories,
            congregations,
            users,
        }
    }

    /// All territories, optionally filtered by congregation.
    pub async fn list(&self, congregation_id: Option<Uuid>) -> Result<Vec<TerritoryDetails>, Error> {
        let territories = self.territories.list(congregation_id).await?;
        let names = self.assignee_names(&territories).await?;
        Ok(territories
            .into_iter()
            .map(|territory| {
                let assigned_to = territory
                    .assigned_to_id
                    .and_then(|id| names.get(&id).cloned());
                TerritoryDetails {
                    territory,
                    assigned_to,
                }
            })
            .collect())
    }

    /// Fetch one territory.
    pub async fn get(&self, id: Uuid) -> Result<TerritoryDetails, Error> {
        let territory = self.require(id).await?;
        self.details(territory).await
    }

    /// Create a territory, applying the auto-numbering and auto-naming
    /// policy and validating domain rules before persistence.
    pub async fn create(&self, input: NewTerritory) -> Result<TerritoryDetails, Error> {
        let mut errors = Vec::new();

        let congregation_id = match input.congregation_id {
            Some(id) => match self.congregations.find_by_id(id).await? {
                Some(_) => Some(id),
                None => {
                    errors.push("Congregation must exist".to_owned());
                    None
                }
            },
            None => {
                errors.push("Congregation must exist".to_owned());
                None
            }
        };

        if matches!(&input.name, Some(name) if name.trim().is_empty()) {
            errors.push("Name can't be blank".to_owned());
        }
        if input.boundaries.is_none() {
            errors.push("Boundaries can't be blank".to_owned());
        }
        if input.center.is_none() {
            errors.push("Center can't be blank".to_owned());
        }
        if let Some(user_id) = input.assigned_to_id {
            if self.users.find_by_id(user_id).await?.is_none() {
                errors.push("Assigned to must exist".to_owned());
            }
        }

        // The number pre-check below needs the congregation; bail on the
        // collected messages first when it is missing.
        let Some(congregation_id) = congregation_id else {
            return Err(validation_error(errors));
        };

        // Creation-time policy: resolve the number before the name so an
        // auto-generated name can embed it.
        let number = match input.number {
            Some(number) => {
                if self
                    .territories
                    .number_taken(congregation_id, number, None)
                    .await?
                {
                    errors.push("Number has already been taken".to_owned());
                }
                number
            }
            None => {
                let max = self.territories.max_number(congregation_id).await?;
                Territory::next_number(max)
            }
        };

        if !errors.is_empty() {
            return Err(validation_error(errors));
        }

        let name = match input.name {
            Some(name) => name,
            None => Territory::default_name(number),
        };

        let now = Utc::now();
        let territory = Territory {
            id: Uuid::new_v4(),
            congregation_id,
            name,
            description: input.description,
            notes: input.notes,
            status: input.status.unwrap_or_default(),
            number: Some(number),
            boundaries: input
                .boundaries
                .as_ref()
                .map(Ring::to_wkt)
                .unwrap_or_default(),
            center: input.center.map(wkt_from_point).unwrap_or_default(),
            assigned_to_id: input.assigned_to_id,
            assigned_at: None,
            returned_at: None,
            created_at: now,
            updated_at: now,
        };

        // A concurrent creation may have raced us to this number; the unique
        // index decides and the loser surfaces as a conflict for the client
        // to retry with a fresh number.
        self.territories.insert(&territory).await?;
        info!(territory_id = %territory.id, number, "territory created");
        self.details(territory).await
    }

    /// Partially update a territory.
    pub async fn update(&self, id: Uuid, update: TerritoryUpdate) -> Result<TerritoryDetails, Error> {
        let mut territory = self.require(id).await?;
        let mut errors = Vec::new();

        if let Some(congregation_id) = update.congregation_id {
            if self.congregations.find_by_id(congregation_id).await?.is_none() {
                errors.push("Congregation must exist".to_owned());
            } else {
                territory.congregation_id = congregation_id;
            }
        }
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                errors.push("Name can't be blank".to_owned());
            } else {
                territory.name = name;
            }
        }
        if let Some(description) = update.description {
            territory.description = Some(description);
        }
        if let Some(notes) = update.notes {
            territory.notes = Some(notes);
        }
        if let Some(status) = update.status {
            territory.status = status;
        }
        if let Some(user_id) = update.assigned_to_id {
            if self.users.find_by_id(user_id).await?.is_none() {
                errors.push("Assigned to must exist".to_owned());
            } else {
                territory.assigned_to_id = Some(user_id);
            }
        }
        if let Some(number) = update.number {
            if self
                .territories
                .number_taken(territory.congregation_id, number, Some(territory.id))
                .await?
            {
                errors.push("Number has already been taken".to_owned());
            } else {
                territory.number = Some(number);
            }
        }
        if let Some(boundaries) = update.boundaries {
            territory.boundaries = boundaries.to_wkt();
        }
        if let Some(center) = update.center {
            territory.center = wkt_from_point(center);
        }

        if !errors.is_empty() {
            return Err(validation_error(errors));
        }

        territory.updated_at = Utc::now();
        self.persist(&territory).await?;
        self.details(territory).await
    }

    /// Delete a territory.
    pub async fn delete(&self, id: Uuid) -> Result<(), Error> {
        if !self.territories.delete(id).await? {
            return Err(territory_not_found(id));
        }
        info!(territory_id = %id, "territory deleted");
        Ok(())
    }

    /// Assign the territory to a user. Allowed from any prior status.
    pub async fn assign(&self, id: Uuid, user_id: Uuid) -> Result<TerritoryDetails, Error> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Err(Error::not_found(format!("user {user_id} not found")));
        };
        let mut territory = self.require(id).await?;
        territory.assign(user.id, Utc::now());
        self.persist(&territory).await?;
        info!(territory_id = %id, user_id = %user.id, "territory assigned");
        Ok(TerritoryDetails {
            assigned_to: Some(user.display_name().to_owned()),
            territory,
        })
    }

    /// Mark the territory returned; the assignee stays recorded.
    pub async fn return_territory(&self, id: Uuid) -> Result<TerritoryDetails, Error> {
        let mut territory = self.require(id).await?;
        territory.mark_returned(Utc::now());
        self.persist(&territory).await?;
        info!(territory_id = %id, "territory returned");
        self.details(territory).await
    }

    /// Mark the territory completed.
    pub async fn complete(&self, id: Uuid) -> Result<TerritoryDetails, Error> {
        let mut territory = self.require(id).await?;
        territory.complete(Utc::now());
        self.persist(&territory).await?;
        info!(territory_id = %id, "territory completed");
        self.details(territory).await
    }

    async fn require(&self, id: Uuid) -> Result<Territory, Error> {
        self.territories
            .find_by_id(id)
            .await?
            .ok_or_else(|| territory_not_found(id))
    }

    async fn persist(&self, territory: &Territory) -> Result<(), Error> {
        if !self.territories.update(territory).await? {
            return Err(territory_not_found(territory.id));
        }
        Ok(())
    }

    async fn details(&self, territory: Territory) -> Result<TerritoryDetails, Error> {
        let assigned_to = match territory.assigned_to_id {
            Some(user_id) => self
                .users
                .find_by_id(user_id)
                .await?
                .map(|user| user.display_name().to_owned()),
            None => None,
        };
        Ok(TerritoryDetails {
            territory,
            assigned_to,
        })
    }

    async fn assignee_names(
        &self,
        territories: &[Territory],
    ) -> Result<HashMap<Uuid, String>, Error> {
        let mut names = HashMap::new();
        for territory in territories {
            let Some(user_id) = territory.assigned_to_id else {
                continue;
            };
            if names.contains_key(&user_id) {
                continue;
            }
            if let Some(user) = self.users.find_by_id(user_id).await? {
                names.insert(user_id, user.display_name().to_owned());
            }
        }
        Ok(names)
    }
}

fn territory_not_found(id: Uuid) -> Error {
    Error::not_found(format!("territory {id} not found"))
}

fn validation_error(errors: Vec<String>) -> Error {
    Error::validation_failed("Validation failed").with_details(json!({ "errors": errors }))
}
