//! Map layer selection.

use std::fmt;
use std::str::FromStr;

/// Map layer requested from the tile server.
///
/// Each variant maps to the `lyrs` token of the tile endpoint. The layer
/// is passed through untouched and has no effect on tile geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileLayer {
    Roadmap,
    Terrain,
    AlteredRoadmap,
    #[default]
    Satellite,
    TerrainOnly,
    Hybrid,
}

impl TileLayer {
    /// All layers, in wire-token order.
    pub const ALL: [TileLayer; 6] = [
        TileLayer::Roadmap,
        TileLayer::Terrain,
        TileLayer::AlteredRoadmap,
        TileLayer::Satellite,
        TileLayer::TerrainOnly,
        TileLayer::Hybrid,
    ];

    /// The `lyrs=` token understood by the tile server.
    pub fn wire_token(&self) -> &'static str {
        match self {
            TileLayer::Roadmap => "v",
            TileLayer::Terrain => "p",
            TileLayer::AlteredRoadmap => "r",
            TileLayer::Satellite => "s",
            TileLayer::TerrainOnly => "t",
            TileLayer::Hybrid => "y",
        }
    }

    /// Kebab-case name used in configuration and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            TileLayer::Roadmap => "roadmap",
            TileLayer::Terrain => "terrain",
            TileLayer::AlteredRoadmap => "altered-roadmap",
            TileLayer::Satellite => "satellite",
            TileLayer::TerrainOnly => "terrain-only",
            TileLayer::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for TileLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a layer name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tile layer '{0}'")]
pub struct ParseLayerError(pub String);

impl FromStr for TileLayer {
    type Err = ParseLayerError;

    /// Accepts either the layer name or its single-letter wire token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        TileLayer::ALL
            .into_iter()
            .find(|layer| layer.name() == needle || layer.wire_token() == needle)
            .ok_or_else(|| ParseLayerError(s.to_string()))
    }
}
