//! Builders selecting repository-backed or in-memory HTTP state.

use std::sync::Arc;

use territories_backend::domain::ports::{
    CongregationRepository, TerritoryRepository, UserRepository,
};
use territories_backend::domain::{CongregationService, TerritoryService, UserDirectory};
use territories_backend::inbound::http::state::HttpState;
use territories_backend::outbound::persistence::{
    DieselCongregationRepository, DieselTerritoryRepository, DieselUserRepository,
    InMemoryCongregationRepository, InMemoryTerritoryRepository, InMemoryUserRepository,
};

use super::ServerConfig;

fn repositories(
    config: &ServerConfig,
) -> (
    Arc<dyn TerritoryRepository>,
    Arc<dyn CongregationRepository>,
    Arc<dyn UserRepository>,
) {
    match &config.db_pool {
        Some(pool) => (
            Arc::new(DieselTerritoryRepository::new(pool.clone())),
            Arc::new(DieselCongregationRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool.clone())),
        ),
        None => (
            Arc::new(InMemoryTerritoryRepository::new()),
            Arc::new(InMemoryCongregationRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        ),
    }
}

/// Wire the domain services over whichever repositories the config selects.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    let (territories, congregations, users) = repositories(config);
    HttpState::new(
        Arc::new(TerritoryService::new(
            territories.clone(),
            congregations.clone(),
            users.clone(),
        )),
        Arc::new(CongregationService::new(congregations, territories.clone())),
        Arc::new(UserDirectory::new(users, territories)),
    )
}
