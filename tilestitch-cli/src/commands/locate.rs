//! Locate command - show the tile covering a point.

use clap::Args;
use tilestitch::config::ConfigFile;
use tilestitch::coord::{GeoPoint, TileIndex, MERCATOR_MAX_LAT};

use super::common::parse_lat_lon;
use crate::error::CliError;

/// Arguments for `tilestitch locate`.
#[derive(Debug, Args)]
pub struct LocateArgs {
    /// Point as LAT,LON
    #[arg(value_parser = parse_lat_lon, allow_hyphen_values = true)]
    pub point: GeoPoint,

    /// Zoom level (0-23) [config: scan.zoom]
    #[arg(short, long)]
    pub zoom: Option<u8>,
}

/// Run the locate command.
pub fn run(args: LocateArgs, config: &ConfigFile) -> Result<(), CliError> {
    let zoom = args.zoom.unwrap_or(config.scan.zoom);
    let tile = args.point.tile_index(zoom)?;

    for line in describe(&args.point, &tile) {
        println!("{}", line);
    }
    Ok(())
}

fn describe(point: &GeoPoint, tile: &TileIndex) -> Vec<String> {
    let mut lines = vec![
        format!("Point:  {}", point),
        format!("Tile:   {}", tile),
        format!("Name:   {}-{}", tile.x, tile.y),
        format!("Bounds: {}", tile.bounds()),
    ];
    if point.lat.abs() > MERCATOR_MAX_LAT {
        lines.push(format!(
            "Note:   latitude is beyond the Mercator limit of ±{:.4}°",
            MERCATOR_MAX_LAT
        ));
    }
    if !tile.is_in_grid() {
        lines.push(format!(
            "Note:   index lies outside the {}x{} grid",
            tile.grid_size(),
            tile.grid_size()
        ));
    }
    lines
}
