//! Geometry conversion between drawing-tool rings, GeoJSON, and WKT.
//!
//! Three representations flow through the system: the ordered `[lng, lat]`
//! vertex list produced by the map drawing tool, GeoJSON `Polygon`/`Point`
//! geometries on the wire, and WKT strings in the spatial store. Every
//! conversion here is pure and deterministic. Malformed input surfaces a
//! [`GeometryError`]; nothing is silently coerced.

use std::collections::HashSet;

use geojson::Value as GeoJsonValue;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error as ThisError;
use utoipa::ToSchema;
use wkt::TryFromWkt;

use super::Error;

/// SRID used for every stored geometry (WGS84 longitude/latitude).
pub const SRID: i32 = 4326;

/// Failures converting between geometry representations.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum GeometryError {
    /// The GeoJSON geometry is not a `Polygon`.
    #[error("expected a GeoJSON Polygon, got {found}")]
    NotAPolygon { found: String },
    /// The polygon carries no rings at all.
    #[error("polygon coordinates must contain at least one ring")]
    EmptyCoordinates,
    /// A position is not a finite `[lng, lat]` pair.
    #[error("coordinate at index {index} is not a finite [lng, lat] pair")]
    InvalidCoordinate { index: usize },
    /// Fewer than three distinct vertices remain after closure.
    #[error("polygon ring needs at least 3 distinct vertices, got {distinct}")]
    TooFewVertices { distinct: usize },
    /// A stored WKT string failed to parse.
    #[error("stored geometry is not valid WKT: {message}")]
    UnparseableWkt { message: String },
    /// A stored WKT string parsed to an unexpected geometry kind.
    #[error("stored geometry is not a {expected}")]
    UnexpectedWktType { expected: &'static str },
}

impl GeometryError {
    /// Promote the conversion failure to a domain error carrying the name of
    /// the offending payload field.
    pub fn into_field_error(self, field: &'static str) -> Error {
        Error::invalid_geometry(self.to_string()).with_details(json!({ "field": field }))
    }
}

/// A longitude/latitude pair, serialised as `{ "lng": ..., "lat": ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    /// Construct a pair, rejecting non-finite components.
    pub fn new(lng: f64, lat: f64) -> Result<Self, GeometryError> {
        if !lng.is_finite() || !lat.is_finite() {
            return Err(GeometryError::InvalidCoordinate { index: 0 });
        }
        Ok(Self { lng, lat })
    }
}

/// An ordered polygon ring of `[lng, lat]` vertices.
///
/// The ring is stored exactly as received (open or closed). The closure
/// policy lives in [`Ring::closed_points`]: the duplicated closing vertex is
/// appended on the way to WKT, never earlier, so the in-memory vertex list
/// keeps the drawing tool's shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring(Vec<LngLat>);

impl Ring {
    /// Build a ring from raw vertices, validating finiteness and that at
    /// least three distinct vertices remain once the closing duplicate is
    /// ignored.
    pub fn new(points: Vec<LngLat>) -> Result<Self, GeometryError> {
        for (index, point) in points.iter().enumerate() {
            if !point.lng.is_finite() || !point.lat.is_finite() {
                return Err(GeometryError::InvalidCoordinate { index });
            }
        }
        let distinct = distinct_vertices(&points);
        if distinct < 3 {
            return Err(GeometryError::TooFewVertices { distinct });
        }
        Ok(Self(points))
    }

    /// Extract the exterior ring of a GeoJSON `Polygon` geometry.
    ///
    /// Interior rings (holes) are not supported by the drawing tool and are
    /// rejected implicitly: only the exterior ring is read.
    pub fn from_geojson(geometry: &geojson::Geometry) -> Result<Self, GeometryError> {
        let rings = match &geometry.value {
            GeoJsonValue::Polygon(rings) => rings,
            other => {
                return Err(GeometryError::NotAPolygon {
                    found: other.type_name().to_owned(),
                });
            }
        };
        let exterior = rings.first().ok_or(GeometryError::EmptyCoordinates)?;
        let mut points = Vec::with_capacity(exterior.len());
        for (index, position) in exterior.iter().enumerate() {
            let (Some(lng), Some(lat)) = (position.first(), position.get(1)) else {
                return Err(GeometryError::InvalidCoordinate { index });
            };
            if !lng.is_finite() || !lat.is_finite() {
                return Err(GeometryError::InvalidCoordinate { index });
            }
            points.push(LngLat {
                lng: *lng,
                lat: *lat,
            });
        }
        Self::new(points)
    }

    /// The vertices exactly as received.
    pub fn points(&self) -> &[LngLat] {
        &self.0
    }

    /// The vertices with the closing duplicate appended when missing.
    pub fn closed_points(&self) -> Vec<LngLat> {
        let mut points = self.0.clone();
        match (points.first().copied(), points.last()) {
            (Some(first), Some(last)) if *last != first => points.push(first),
            _ => {}
        }
        points
    }

    /// Emit the closed ring as `POLYGON((lng lat, ..., lng lat))`.
    pub fn to_wkt(&self) -> String {
        let coords: Vec<String> = self
            .closed_points()
            .iter()
            .map(|p| format!("{} {}", p.lng, p.lat))
            .collect();
        format!("POLYGON(({}))", coords.join(", "))
    }

    /// Arithmetic mean of the vertices, excluding the duplicated closing
    /// vertex.
    ///
    /// This is the simple centroid approximation the original map client
    /// computes, biased toward vertex-dense stretches of the outline. It is
    /// kept verbatim for compatibility, not corrected to an area-weighted
    /// centroid.
    pub fn center(&self) -> LngLat {
        let points = self.points();
        let len = match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() > 1 && first == last => points.len() - 1,
            _ => points.len(),
        };
        let mut lng = 0.0;
        let mut lat = 0.0;
        for point in &points[..len] {
            lng += point.lng;
            lat += point.lat;
        }
        LngLat {
            lng: lng / len as f64,
            lat: lat / len as f64,
        }
    }
}

/// Emit a point as `POINT(lng lat)`.
pub fn wkt_from_point(point: LngLat) -> String {
    format!("POINT({} {})", point.lng, point.lat)
}

/// Parse a stored polygon WKT back into a GeoJSON `Polygon` geometry.
pub fn geojson_from_polygon_wkt(wkt: &str) -> Result<geojson::Geometry, GeometryError> {
    let polygon: geo_types::Polygon<f64> =
        geo_types::Polygon::try_from_wkt_str(wkt).map_err(|e| GeometryError::UnparseableWkt {
            message: e.to_string(),
        })?;
    let exterior: Vec<Vec<f64>> = polygon
        .exterior()
        .coords()
        .map(|c| vec![c.x, c.y])
        .collect();
    Ok(geojson::Geometry::new(GeoJsonValue::Polygon(vec![exterior])))
}

/// Parse a stored point WKT back into a GeoJSON `Point` geometry.
pub fn geojson_from_point_wkt(wkt: &str) -> Result<geojson::Geometry, GeometryError> {
    let point = point_from_wkt(wkt)?;
    Ok(geojson::Geometry::new(GeoJsonValue::Point(vec![
        point.lng, point.lat,
    ])))
}

/// Parse a stored point WKT into a [`LngLat`].
pub fn point_from_wkt(wkt: &str) -> Result<LngLat, GeometryError> {
    let point: geo_types::Point<f64> =
        geo_types::Point::try_from_wkt_str(wkt).map_err(|e| GeometryError::UnparseableWkt {
            message: e.to_string(),
        })?;
    Ok(LngLat {
        lng: point.x(),
        lat: point.y(),
    })
}

/// Parse a stored polygon WKT back into a [`Ring`] (closing vertex kept).
pub fn ring_from_wkt(wkt: &str) -> Result<Ring, GeometryError> {
    let polygon: geo_types::Polygon<f64> =
        geo_types::Polygon::try_from_wkt_str(wkt).map_err(|e| GeometryError::UnparseableWkt {
            message: e.to_string(),
        })?;
    let points = polygon
        .exterior()
        .coords()
        .map(|c| LngLat { lng: c.x, lat: c.y })
        .collect();
    Ring::new(points)
}

fn distinct_vertices(points: &[LngLat]) -> usize {
    let mut seen = HashSet::new();
    for point in points {
        seen.insert((point.lng.to_bits(), point.lat.to_bits()));
    }
    seen.len()
}
