//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use tilestitch::coord::GeoPoint;
use tilestitch::provider::TileLayer;
use tilestitch::scan::EdgePolicy;

/// Map layer selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LayerArg {
    /// Standard road map
    Roadmap,
    /// Terrain with labels
    Terrain,
    /// Road map variant
    AlteredRoadmap,
    /// Satellite imagery only
    Satellite,
    /// Terrain shading only
    TerrainOnly,
    /// Satellite imagery with labels
    Hybrid,
}

impl From<LayerArg> for TileLayer {
    fn from(arg: LayerArg) -> Self {
        match arg {
            LayerArg::Roadmap => TileLayer::Roadmap,
            LayerArg::Terrain => TileLayer::Terrain,
            LayerArg::AlteredRoadmap => TileLayer::AlteredRoadmap,
            LayerArg::Satellite => TileLayer::Satellite,
            LayerArg::TerrainOnly => TileLayer::TerrainOnly,
            LayerArg::Hybrid => TileLayer::Hybrid,
        }
    }
}

/// Edge sub-grid sizing for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum EdgeArg {
    /// Trim edge sub-grids to the requested area
    Clip,
    /// Keep every sub-grid full size, fetching past the area
    Overrun,
}

impl From<EdgeArg> for EdgePolicy {
    fn from(arg: EdgeArg) -> Self {
        match arg {
            EdgeArg::Clip => EdgePolicy::Clip,
            EdgeArg::Overrun => EdgePolicy::Overrun,
        }
    }
}

/// Parses `LAT,LON` in decimal degrees.
pub fn parse_lat_lon(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got '{}'", s))?;

    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {} is outside -90..90", lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {} is outside -180..180", lon));
    }

    Ok(GeoPoint::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_lat_lon() {
        let p = parse_lat_lon("38.540285,-120.615499").unwrap();
        assert_eq!(p.lat, 38.540285);
        assert_eq!(p.lon, -120.615499);

        let p = parse_lat_lon(" -33.9 , 18.4 ").unwrap();
        assert_eq!((p.lat, p.lon), (-33.9, 18.4));
    }

    #[test]
    fn test_parse_lat_lon_rejects_bad_input() {
        assert!(parse_lat_lon("38.5").is_err());
        assert!(parse_lat_lon("north,west").is_err());
        assert!(parse_lat_lon("91,0").is_err());
        assert!(parse_lat_lon("0,181").is_err());
        assert!(parse_lat_lon("NaN,0").is_err());
    }

    #[test]
    fn test_layer_arg_matches_library_names() {
        for arg in LayerArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(TileLayer::from(*arg).name(), name);
        }
    }

    proptest! {
        #[test]
        fn prop_parse_lat_lon_round_trips(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let p = parse_lat_lon(&format!("{},{}", lat, lon)).unwrap();
            prop_assert_eq!(p.lat, lat);
            prop_assert_eq!(p.lon, lon);
        }
    }
}
