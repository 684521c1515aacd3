//! Coordinate types and errors

use std::fmt;

use thiserror::Error;

/// Edge length of a single map tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Highest zoom level served by the tile endpoint.
pub const MAX_ZOOM: u8 = 23;

/// Latitude limit of the square Web Mercator grid (degrees).
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

/// Errors produced by the coordinate mapper.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude at or beyond a pole, or a non-finite input.
    ///
    /// The Mercator `ln((1+sin)/(1-sin))` term diverges at ±90°.
    #[error("latitude {lat} hits the Mercator singularity (must be strictly within -90..90)")]
    Singularity { lat: f64 },

    /// Longitude is not a finite number.
    #[error("longitude {0} is not finite")]
    InvalidLongitude(f64),

    /// Zoom level above [`MAX_ZOOM`].
    #[error("zoom level {0} exceeds maximum {MAX_ZOOM}")]
    InvalidZoom(u8),

    /// The projected pixel is negative and has no unsigned tile index.
    #[error("projected {axis} pixel {pixel} lies outside the tile grid")]
    OutsideGrid { axis: Axis, pixel: f64 },
}

/// Grid axis, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// A geographic position in degrees.
///
/// No range checks happen here; [`super::tile_index_for`] rejects the
/// inputs it cannot project.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Tile containing this point at `zoom`.
    pub fn tile_index(&self, zoom: u8) -> Result<TileIndex, CoordError> {
        super::tile_index_for(self.lat, self.lon, zoom)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// One addressable tile in the global `2^zoom × 2^zoom` grid.
///
/// - `x` increases eastward (prime meridian ≈ 2^(zoom-1))
/// - `y` increases southward (equator ≈ 2^(zoom-1))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
}

impl TileIndex {
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Number of tiles along one axis at this zoom level.
    #[inline]
    pub fn grid_size(&self) -> u64 {
        1u64 << self.zoom
    }

    /// Whether both indices lie inside the addressable grid.
    pub fn is_in_grid(&self) -> bool {
        (self.x as u64) < self.grid_size() && (self.y as u64) < self.grid_size()
    }

    /// Tile shifted by `(dx, dy)` at the same zoom.
    pub fn offset(&self, dx: u32, dy: u32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            zoom: self.zoom,
        }
    }

    /// Geographic footprint of this tile.
    pub fn bounds(&self) -> GeoBounds {
        let (north, west) = super::tile_to_lat_lon(self);
        let (south, east) = super::tile_to_lat_lon(&self.offset(1, 1));
        GeoBounds {
            north,
            west,
            south,
            east,
        }
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Geographic rectangle in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub north: f64,
    pub west: f64,
    pub south: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Smallest rectangle covering both bounds.
    pub fn union(&self, other: &GeoBounds) -> GeoBounds {
        GeoBounds {
            north: self.north.max(other.north),
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
        }
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N {:.6} W {:.6} S {:.6} E {:.6}",
            self.north, self.west, self.south, self.east
        )
    }
}
