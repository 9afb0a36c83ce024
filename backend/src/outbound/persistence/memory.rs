//! In-memory repository adapters.
//!
//! Used when the server runs without a configured database and as the
//! default adapter in tests. The territory store enforces the same unique
//! `(congregation_id, number)` rule as the PostgreSQL index so the
//! numbering-race contract can be exercised without a cluster.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    CongregationRepository, PersistenceError, TerritoryPersistenceError, TerritoryRepository,
    UserRepository,
};
use crate::domain::{Congregation, Territory, User};

fn lock_poisoned<E>(make: impl FnOnce(String) -> E) -> E {
    make("in-memory store lock poisoned".to_owned())
}

/// In-memory [`TerritoryRepository`].
#[derive(Default)]
pub struct InMemoryTerritoryRepository {
    rows: Mutex<HashMap<Uuid, Territory>>,
}

impl InMemoryTerritoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_rows<T>(
        &self,
        f: impl FnOnce(&mut HashMap<Uuid, Territory>) -> T,
    ) -> Result<T, TerritoryPersistenceError> {
        let mut rows = self.rows.lock().map_err(|_| {
            lock_poisoned(|message| TerritoryPersistenceError::Query { message })
        })?;
        Ok(f(&mut rows))
    }

    fn duplicate(
        rows: &HashMap<Uuid, Territory>,
        congregation_id: Uuid,
        number: Option<i32>,
        exclude: Option<Uuid>,
    ) -> bool {
        let Some(number) = number else {
            return false;
        };
        rows.values().any(|row| {
            row.congregation_id == congregation_id
                && row.number == Some(number)
                && Some(row.id) != exclude
        })
    }
}

#[async_trait]
impl TerritoryRepository for InMemoryTerritoryRepository {
    async fn list(
        &self,
        congregation_id: Option<Uuid>,
    ) -> Result<Vec<Territory>, TerritoryPersistenceError> {
        self.with_rows(|rows| {
            let mut territories: Vec<Territory> = rows
                .values()
                .filter(|row| congregation_id.is_none_or(|id| row.congregation_id == id))
                .cloned()
                .collect();
            territories.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.name.cmp(&b.name)));
            territories
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Territory>, TerritoryPersistenceError> {
        self.with_rows(|rows| rows.get(&id).cloned())
    }

    async fn max_number(
        &self,
        congregation_id: Uuid,
    ) -> Result<Option<i32>, TerritoryPersistenceError> {
        self.with_rows(|rows| {
            rows.values()
                .filter(|row| row.congregation_id == congregation_id)
                .filter_map(|row| row.number)
                .max()
        })
    }

    async fn number_taken(
        &self,
        congregation_id: Uuid,
        number: i32,
        exclude: Option<Uuid>,
    ) -> Result<bool, TerritoryPersistenceError> {
        self.with_rows(|rows| Self::duplicate(rows, congregation_id, Some(number), exclude))
    }

    async fn insert(&self, territory: &Territory) -> Result<(), TerritoryPersistenceError> {
        self.with_rows(|rows| {
            if Self::duplicate(rows, territory.congregation_id, territory.number, None) {
                return Err(TerritoryPersistenceError::DuplicateNumber {
                    congregation_id: territory.congregation_id,
                    number: territory.number.unwrap_or_default(),
                });
            }
            rows.insert(territory.id, territory.clone());
            Ok(())
        })?
    }

    async fn update(&self, territory: &Territory) -> Result<bool, TerritoryPersistenceError> {
        self.with_rows(|rows| {
            if !rows.contains_key(&territory.id) {
                return Ok(false);
            }
            if Self::duplicate(
                rows,
                territory.congregation_id,
                territory.number,
                Some(territory.id),
            ) {
                return Err(TerritoryPersistenceError::DuplicateNumber {
                    congregation_id: territory.congregation_id,
                    number: territory.number.unwrap_or_default(),
                });
            }
            rows.insert(territory.id, territory.clone());
            Ok(true)
        })?
    }

    async fn delete(&self, id: Uuid) -> Result<bool, TerritoryPersistenceError> {
        self.with_rows(|rows| rows.remove(&id).is_some())
    }

    async fn delete_by_congregation(
        &self,
        congregation_id: Uuid,
    ) -> Result<u64, TerritoryPersistenceError> {
        self.with_rows(|rows| {
            let before = rows.len();
            rows.retain(|_, row| row.congregation_id != congregation_id);
            (before - rows.len()) as u64
        })
    }
}

/// In-memory [`CongregationRepository`].
#[derive(Default)]
pub struct InMemoryCongregationRepository {
    rows: Mutex<HashMap<Uuid, Congregation>>,
}

impl InMemoryCongregationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_rows<T>(
        &self,
        f: impl FnOnce(&mut HashMap<Uuid, Congregation>) -> T,
    ) -> Result<T, PersistenceError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| lock_poisoned(PersistenceError::query))?;
        Ok(f(&mut rows))
    }
}

#[async_trait]
impl CongregationRepository for InMemoryCongregationRepository {
    async fn list(&self) -> Result<Vec<Congregation>, PersistenceError> {
        self.with_rows(|rows| {
            let mut congregations: Vec<Congregation> = rows.values().cloned().collect();
            congregations.sort_by(|a, b| a.name.cmp(&b.name));
            congregations
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Congregation>, PersistenceError> {
        self.with_rows(|rows| rows.get(&id).cloned())
    }

    async fn insert(&self, congregation: &Congregation) -> Result<(), PersistenceError> {
        self.with_rows(|rows| {
            rows.insert(congregation.id, congregation.clone());
        })
    }

    async fn update(&self, congregation: &Congregation) -> Result<bool, PersistenceError> {
        self.with_rows(|rows| {
            if !rows.contains_key(&congregation.id) {
                return false;
            }
            rows.insert(congregation.id, congregation.clone());
            true
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        self.with_rows(|rows| rows.remove(&id).is_some())
    }
}

/// In-memory [`UserRepository`]; users are seeded, never written through
/// this core.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user (dev fallback and tests).
    pub fn seed(&self, user: User) {
        if let Ok(mut rows) = self.rows.lock() {
            rows.insert(user.id, user);
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, PersistenceError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| lock_poisoned(PersistenceError::query))?;
        Ok(rows.get(&id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<User>, PersistenceError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| lock_poisoned(PersistenceError::query))?;
        let mut users: Vec<User> = rows.values().filter(|u| u.active).cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }
}
