//! Derived geometry: polygon area from stored WKT.
//!
//! Areas are computed on read, never persisted, so every serialisation pays
//! the (cheap, vertex-bounded) computation cost. The geographic SRID 4326
//! area comes from the `geo` crate's geodesic algorithm, the equivalent of
//! the GEOS-backed computation the spatial store offers.

use geo::GeodesicArea;
use wkt::TryFromWkt;

use super::geometry::GeometryError;

/// Square meters per acre, inverted: the factor applied to m² to get acres.
const ACRES_PER_SQ_METER: f64 = 0.000_247_105;

/// Geodesic area in square meters for a stored polygon, `None` when no
/// boundaries exist.
pub fn area_in_sq_meters(wkt: Option<&str>) -> Result<Option<f64>, GeometryError> {
    let Some(wkt) = wkt else {
        return Ok(None);
    };
    let polygon: geo_types::Polygon<f64> =
        geo_types::Polygon::try_from_wkt_str(wkt).map_err(|e| GeometryError::UnparseableWkt {
            message: e.to_string(),
        })?;
    Ok(Some(polygon.geodesic_area_unsigned()))
}

/// Area in acres rounded to two decimal places; `None` propagates.
pub fn area_in_acres(wkt: Option<&str>) -> Result<Option<f64>, GeometryError> {
    Ok(area_in_sq_meters(wkt)?.map(|sq_meters| round2(sq_meters * ACRES_PER_SQ_METER)))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    // Roughly 1.11 km x 1.11 km at the equator.
    const EQUATOR_SQUARE: &str = "POLYGON((0 0, 0.01 0, 0.01 0.01, 0 0.01, 0 0))";

    #[test]
    fn absent_boundaries_yield_no_area() {
        assert_eq!(area_in_sq_meters(None).expect("ok"), None);
        assert_eq!(area_in_acres(None).expect("ok"), None);
    }

    #[test]
    fn equator_square_area_lands_in_the_expected_range() {
        let area = area_in_sq_meters(Some(EQUATOR_SQUARE))
            .expect("parses")
            .expect("some area");
        // One degree at the equator is ~111.32 km, so the square is ~1.23 km².
        assert!(area > 1.20e6, "area too small: {area}");
        assert!(area < 1.26e6, "area too large: {area}");
    }

    #[test]
    fn acres_are_rounded_to_two_decimals() {
        let acres = area_in_acres(Some(EQUATOR_SQUARE))
            .expect("parses")
            .expect("some area");
        assert_eq!((acres * 100.0).round() / 100.0, acres, "already rounded");
        // ~1.23 km² is ~305 acres.
        assert!(acres > 295.0 && acres < 315.0, "unexpected acreage: {acres}");
    }

    #[test]
    fn unparseable_wkt_is_an_error() {
        let err = area_in_sq_meters(Some("POLYGON(")).expect_err("rejected");
        assert!(matches!(err, GeometryError::UnparseableWkt { .. }));
    }
}
