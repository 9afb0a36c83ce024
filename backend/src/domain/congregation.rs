//! Congregation aggregate.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The demarcated main zone of a congregation: an overall boundary polygon
/// and its centre point.
///
/// Modelled as a single composite so that boundaries and centre are present
/// or absent together; "no main zone demarcated yet" is simply `None` on
/// [`Congregation::zone`], and clearing one always clears the other.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    /// WKT `POLYGON((...))`, ring closed, SRID 4326.
    pub boundaries: String,
    /// WKT `POINT(lng lat)`.
    pub center: String,
}

/// An organisational unit owning a set of territories.
#[derive(Debug, Clone, PartialEq)]
pub struct Congregation {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub zone: Option<Zone>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
