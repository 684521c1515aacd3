//! Partitioning of a tile span into sub-grids.

use std::fmt;

use crate::coord::{CoordError, GeoPoint, TileIndex};
use crate::mosaic::SubGrid;
use crate::provider::TileLayer;

use super::report::ScanError;

/// Half-open rectangle of tile indices `[x_min, x_max) × [y_min, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpan {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
    pub zoom: u8,
}

impl TileSpan {
    /// Maps both corners to tile indices and spans the rectangle between
    /// them. Corner order does not matter.
    pub fn from_corners(a: GeoPoint, b: GeoPoint, zoom: u8) -> Result<Self, CoordError> {
        let ta = a.tile_index(zoom)?;
        let tb = b.tile_index(zoom)?;
        Ok(Self::from_tiles(ta, tb))
    }

    /// Spans the rectangle between two tiles of the same zoom.
    pub fn from_tiles(a: TileIndex, b: TileIndex) -> Self {
        Self {
            x_min: a.x.min(b.x),
            x_max: a.x.max(b.x),
            y_min: a.y.min(b.y),
            y_max: a.y.max(b.y),
            zoom: a.zoom,
        }
    }

    pub fn width(&self) -> u32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> u32 {
        self.y_max - self.y_min
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn tile_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }
}

impl fmt::Display for TileSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x {}..{}, y {}..{} @ z{}",
            self.x_min, self.x_max, self.y_min, self.y_max, self.zoom
        )
    }
}

/// How the last sub-grid of each row and column is sized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Trim edge sub-grids to the span.
    #[default]
    Clip,
    /// Keep every sub-grid `step × step`, fetching past the span edge.
    Overrun,
}

impl EdgePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            EdgePolicy::Clip => "clip",
            EdgePolicy::Overrun => "overrun",
        }
    }
}

impl fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EdgePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clip" => Ok(EdgePolicy::Clip),
            "overrun" => Ok(EdgePolicy::Overrun),
            other => Err(format!("unknown edge policy '{}' (expected clip or overrun)", other)),
        }
    }
}

/// Row-major sequence of sub-grids covering a [`TileSpan`].
#[derive(Debug, Clone)]
pub struct SubGridPlan {
    span: TileSpan,
    step: u32,
    edge: EdgePolicy,
    layer: TileLayer,
}

impl SubGridPlan {
    /// # Errors
    ///
    /// [`ScanError::InvalidStep`] when `step` is zero.
    pub fn new(
        span: TileSpan,
        step: u32,
        edge: EdgePolicy,
        layer: TileLayer,
    ) -> Result<Self, ScanError> {
        if step == 0 {
            return Err(ScanError::InvalidStep(step));
        }
        Ok(Self {
            span,
            step,
            edge,
            layer,
        })
    }

    pub fn span(&self) -> &TileSpan {
        &self.span
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn edge(&self) -> EdgePolicy {
        self.edge
    }

    fn columns(&self) -> usize {
        self.span.width().div_ceil(self.step) as usize
    }

    fn rows(&self) -> usize {
        self.span.height().div_ceil(self.step) as usize
    }

    /// Number of sub-grids, `ceil(w/step) · ceil(h/step)`.
    pub fn len(&self) -> usize {
        self.columns() * self.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sub-grids in scan order: y outer, x inner.
    pub fn iter(&self) -> impl Iterator<Item = SubGrid> + '_ {
        let step = self.step as usize;
        let span = self.span;
        (span.y_min..span.y_max)
            .step_by(step)
            .flat_map(move |y| {
                (span.x_min..span.x_max)
                    .step_by(step)
                    .map(move |x| self.sub_grid_at(x, y))
            })
    }

    fn sub_grid_at(&self, x: u32, y: u32) -> SubGrid {
        let (width, height) = match self.edge {
            EdgePolicy::Overrun => (self.step, self.step),
            EdgePolicy::Clip => (
                self.step.min(self.span.x_max - x),
                self.step.min(self.span.y_max - y),
            ),
        };
        SubGrid::new(
            TileIndex::new(x, y, self.span.zoom),
            width,
            height,
            self.layer,
        )
    }
}
