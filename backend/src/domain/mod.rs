//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: keep the territory lifecycle, geometry conversion, and derived
//! geometry free of transport and persistence concerns. Inbound adapters
//! translate HTTP payloads into the types here; outbound adapters implement
//! the ports in [`ports`].
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`] — transport-agnostic failure envelope.
//! - [`geometry`] — ring/GeoJSON/WKT conversion layer.
//! - [`area`] — derived polygon area (read-time, SRID 4326 geodesic).
//! - [`Territory`] / [`Status`] — aggregate plus its lifecycle operations.
//! - [`Congregation`] / [`Zone`] — owning unit with an optional main zone.
//! - [`TerritoryService`] / [`CongregationService`] / [`UserDirectory`] —
//!   use-case services consumed by the HTTP adapter.

pub mod area;
pub mod congregation;
pub mod congregation_service;
pub mod error;
pub mod geometry;
pub mod ports;
pub mod territory;
pub mod territory_service;
pub mod user;
pub mod user_directory;

pub use self::congregation::{Congregation, Zone};
pub use self::congregation_service::{CongregationService, CongregationUpdate, NewCongregation};
pub use self::error::{Error, ErrorCode};
pub use self::geometry::{GeometryError, LngLat, Ring};
pub use self::territory::{Status, Territory};
pub use self::territory_service::{
    NewTerritory, TerritoryDetails, TerritoryService, TerritoryUpdate,
};
pub use self::user::{Role, User};
pub use self::user_directory::{UserDirectory, UserSummary};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
