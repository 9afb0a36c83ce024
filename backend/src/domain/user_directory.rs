//! Read-only user directory backing the assignment picker.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::ports::{TerritoryRepository, UserRepository};
use super::territory::Status;
use super::user::User;
use super::Error;

/// A user with their per-status assigned-territory counts.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub user: User,
    pub assigned_territories: i64,
    pub available_territories: i64,
    pub completed_territories: i64,
    pub returned_territories: i64,
}

/// Query service listing assignment candidates.
#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
    territories: Arc<dyn TerritoryRepository>,
}

impl UserDirectory {
    pub fn new(users: Arc<dyn UserRepository>, territories: Arc<dyn TerritoryRepository>) -> Self {
        Self { users, territories }
    }

    /// Active users with territory counts grouped by status.
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, Error> {
        let users = self.users.list_active().await?;
        let territories = self.territories.list(None).await?;

        let mut counts: HashMap<Uuid, HashMap<Status, i64>> = HashMap::new();
        for territory in &territories {
            let Some(user_id) = territory.assigned_to_id else {
                continue;
            };
            *counts
                .entry(user_id)
                .or_default()
                .entry(territory.status)
                .or_insert(0) += 1;
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let by_status = counts.remove(&user.id).unwrap_or_default();
                let count = |status: Status| by_status.get(&status).copied().unwrap_or(0);
                UserSummary {
                    assigned_territories: count(Status::Assigned),
                    available_territories: count(Status::Available),
                    completed_territories: count(Status::Completed),
                    returned_territories: count(Status::Returned),
                    user,
                }
            })
            .collect())
    }
}
