//! Coordinate conversion module
//!
//! Maps geographic coordinates (latitude/longitude) onto the spherical
//! Mercator tile grid used by web map tile servers, and back.

mod types;

pub use types::{
    Axis, CoordError, GeoBounds, GeoPoint, TileIndex, MAX_ZOOM, MERCATOR_MAX_LAT, TILE_SIZE,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to the tile index containing them.
///
/// This is the Mercator pixel quantization used by Google-style tile
/// servers: the point is projected to global pixel space at `zoom` and the
/// pixel is divided by the tile size with flooring.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees, strictly within (-90, 90)
/// * `lon` - Longitude in degrees
/// * `zoom` - Zoom level (0 to 23)
///
/// # Errors
///
/// - [`CoordError::Singularity`] for latitudes at or beyond a pole
/// - [`CoordError::InvalidZoom`] above [`MAX_ZOOM`]
/// - [`CoordError::OutsideGrid`] when the projected pixel is negative
///
/// Indices past the eastern or southern grid edge (`>= 2^zoom`) are
/// returned as computed; keeping inputs inside the grid is up to the caller.
#[inline]
pub fn tile_index_for(lat: f64, lon: f64, zoom: u8) -> Result<TileIndex, CoordError> {
    if !lat.is_finite() || lat.abs() >= 90.0 {
        return Err(CoordError::Singularity { lat });
    }
    if !lon.is_finite() {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let tile_size = TILE_SIZE as f64;
    let num_tiles = 2.0_f64.powi(zoom as i32);

    let pixel_x = (tile_size / 2.0 + lon * tile_size / 360.0) * num_tiles;

    let sin_lat = (lat * (PI / 180.0)).sin();
    let pixel_y = (tile_size / 2.0
        + 0.5 * ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() * -(tile_size / (2.0 * PI)))
        * num_tiles;

    // sin() rounds to exactly ±1 a hair short of the poles
    if !pixel_y.is_finite() {
        return Err(CoordError::Singularity { lat });
    }

    let x = quantize(pixel_x, Axis::X)?;
    let y = quantize(pixel_y, Axis::Y)?;

    Ok(TileIndex { x, y, zoom })
}

/// Floors a global pixel coordinate down to its tile index.
fn quantize(pixel: f64, axis: Axis) -> Result<u32, CoordError> {
    let index = (pixel / TILE_SIZE as f64).floor();
    if index < 0.0 || index > u32::MAX as f64 {
        return Err(CoordError::OutsideGrid { axis, pixel });
    }
    Ok(index as u32)
}

/// Converts a tile index back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileIndex) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.x as f64 / n * 360.0 - 180.0;

    // Inverse Web Mercator
    let y = tile.y as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    (lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_york_city_at_zoom_16() {
        // New York City: 40.7128°N, 74.0060°W
        let tile = tile_index_for(40.7128, -74.0060, 16).unwrap();
        assert_eq!(tile.x, 19295);
        assert_eq!(tile.y, 24640);
        assert_eq!(tile.zoom, 16);
    }

    #[test]
    fn test_origin_lands_on_grid_center() {
        for zoom in 1..=MAX_ZOOM {
            let tile = tile_index_for(0.0, 0.0, zoom).unwrap();
            let center = 1u32 << (zoom - 1);
            assert_eq!(tile, TileIndex::new(center, center, zoom));
        }
    }

    #[test]
    fn test_zoom_zero_is_single_tile() {
        let tile = tile_index_for(45.0, 120.0, 0).unwrap();
        assert_eq!(tile, TileIndex::new(0, 0, 0));
    }

    #[test]
    fn test_reference_corners_at_zoom_20() {
        let nw = tile_index_for(38.540285, -120.615499, 20).unwrap();
        let se = tile_index_for(38.521378, -120.603025, 20).unwrap();

        assert!(nw.x < se.x, "west corner must have the smaller x");
        assert!(nw.y < se.y, "north corner must have the smaller y");
        // ~0.0125° of longitude at z20 is a few dozen tiles
        assert!(se.x - nw.x > 10 && se.x - nw.x < 100);
        assert!(se.y - nw.y > 10 && se.y - nw.y < 200);
    }

    #[test]
    fn test_poles_are_singular() {
        for lat in [90.0, -90.0, 91.0, -135.0] {
            assert!(matches!(
                tile_index_for(lat, 0.0, 10),
                Err(CoordError::Singularity { .. })
            ));
        }
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        assert!(matches!(
            tile_index_for(f64::NAN, 0.0, 10),
            Err(CoordError::Singularity { .. })
        ));
        assert!(matches!(
            tile_index_for(10.0, f64::INFINITY, 10),
            Err(CoordError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_invalid_zoom() {
        assert_eq!(
            tile_index_for(0.0, 0.0, 24),
            Err(CoordError::InvalidZoom(24))
        );
    }

    #[test]
    fn test_above_mercator_limit_is_outside_grid() {
        let result = tile_index_for(89.0, 0.0, 5);
        assert!(matches!(
            result,
            Err(CoordError::OutsideGrid { axis: Axis::Y, .. })
        ));
    }

    #[test]
    fn test_west_of_antimeridian_is_outside_grid() {
        let result = tile_index_for(0.0, -181.0, 5);
        assert!(matches!(
            result,
            Err(CoordError::OutsideGrid { axis: Axis::X, .. })
        ));
    }

    #[test]
    fn test_east_overflow_passes_through_unvalidated() {
        let tile = tile_index_for(0.0, 200.0, 3).unwrap();
        assert!(!tile.is_in_grid());
        assert!(tile.x >= 8);
    }

    #[test]
    fn test_tile_to_lat_lon_northwest_corner() {
        let tile = TileIndex::new(19295, 24640, 16);
        let (lat, lon) = tile_to_lat_lon(&tile);

        assert!((lat - 40.713).abs() < 0.01);
        assert!((lon - (-74.007)).abs() < 0.01);
    }

    #[test]
    fn test_bounds_contain_source_point() {
        let (lat, lon) = (51.5074, -0.1278);
        let tile = tile_index_for(lat, lon, 14).unwrap();
        let bounds = tile.bounds();

        assert!(bounds.south <= lat && lat <= bounds.north);
        assert!(bounds.west <= lon && lon <= bounds.east);
    }

    #[test]
    fn test_geo_point_delegates() {
        let point = GeoPoint::new(40.7128, -74.0060);
        assert_eq!(
            point.tile_index(16).unwrap(),
            tile_index_for(40.7128, -74.0060, 16).unwrap()
        );
    }

    #[test]
    fn test_tile_index_display() {
        assert_eq!(TileIndex::new(3, 4, 5).to_string(), "5/3/4");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_tile_index_in_bounds(
                lat in -85.05..85.05_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=MAX_ZOOM
            ) {
                let tile = tile_index_for(lat, lon, zoom)?;
                let max_tile = 1u64 << zoom;
                prop_assert!((tile.x as u64) < max_tile, "x {} >= {}", tile.x, max_tile);
                prop_assert!((tile.y as u64) < max_tile, "y {} >= {}", tile.y, max_tile);
                prop_assert_eq!(tile.zoom, zoom);
            }

            #[test]
            fn test_deterministic(
                lat in -89.9..89.9_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=MAX_ZOOM
            ) {
                prop_assert_eq!(tile_index_for(lat, lon, zoom), tile_index_for(lat, lon, zoom));
            }

            #[test]
            fn test_longitude_monotonic(
                lat in -85.0..85.0_f64,
                lon_a in -180.0..180.0_f64,
                lon_b in -180.0..180.0_f64,
                zoom in 0u8..=MAX_ZOOM
            ) {
                let (west, east) = if lon_a <= lon_b { (lon_a, lon_b) } else { (lon_b, lon_a) };
                let tile_west = tile_index_for(lat, west, zoom)?;
                let tile_east = tile_index_for(lat, east, zoom)?;
                prop_assert!(
                    tile_west.x <= tile_east.x,
                    "lon {} (x {}) vs lon {} (x {})",
                    west, tile_west.x, east, tile_east.x
                );
            }

            #[test]
            fn test_roundtrip_within_one_tile(
                lat in -85.0..85.0_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=18
            ) {
                let tile = tile_index_for(lat, lon, zoom)?;
                let (corner_lat, corner_lon) = tile_to_lat_lon(&tile);
                let tile_degrees = 360.0 / 2.0_f64.powi(zoom as i32);

                prop_assert!((corner_lat - lat).abs() < tile_degrees);
                prop_assert!((corner_lon - lon).abs() < tile_degrees);
            }
        }
    }
}
