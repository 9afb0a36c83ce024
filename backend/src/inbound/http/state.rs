//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::{CongregationService, TerritoryService, UserDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub territories: Arc<TerritoryService>,
    pub congregations: Arc<CongregationService>,
    pub users: Arc<UserDirectory>,
}

impl HttpState {
    pub fn new(
        territories: Arc<TerritoryService>,
        congregations: Arc<CongregationService>,
        users: Arc<UserDirectory>,
    ) -> Self {
        Self {
            territories,
            congregations,
            users,
        }
    }
}
