//! Mosaic types and errors

use std::fmt;
use std::time::Duration;

use image::RgbImage;
use thiserror::Error;

use crate::coord::{GeoBounds, TileIndex, TILE_SIZE};
use crate::provider::{ProviderError, TileLayer};

/// A rectangular batch of tiles fetched into one mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubGrid {
    /// Top-left tile (carries the zoom level).
    pub origin: TileIndex,
    /// Width in tiles (at least 1).
    pub width: u32,
    /// Height in tiles (at least 1).
    pub height: u32,
    /// Map layer requested for every tile.
    pub layer: TileLayer,
}

impl SubGrid {
    /// Creates a sub-grid. Zero dimensions are raised to 1.
    pub fn new(origin: TileIndex, width: u32, height: u32, layer: TileLayer) -> Self {
        Self {
            origin,
            width: width.max(1),
            height: height.max(1),
            layer,
        }
    }

    /// Output name derived from the origin, `"{x}-{y}"`.
    pub fn name(&self) -> String {
        format!("{}-{}", self.origin.x, self.origin.y)
    }

    /// Number of tiles in the sub-grid.
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Mosaic dimensions in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width * TILE_SIZE, self.height * TILE_SIZE)
    }

    /// Every tile with its `(i, j)` offset from the origin, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32, TileIndex)> + '_ {
        (0..self.height).flat_map(move |j| {
            (0..self.width).map(move |i| (i, j, self.origin.offset(i, j)))
        })
    }

    /// Geographic footprint of the whole sub-grid.
    pub fn bounds(&self) -> GeoBounds {
        let last = self.origin.offset(self.width - 1, self.height - 1);
        self.origin.bounds().union(&last.bounds())
    }
}

impl fmt::Display for SubGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}×{} tiles, {})",
            self.origin, self.width, self.height, self.layer
        )
    }
}

/// A stitched raster covering one [`SubGrid`].
#[derive(Debug, Clone)]
pub struct Mosaic {
    sub_grid: SubGrid,
    image: RgbImage,
}

impl Mosaic {
    /// Blank (black) mosaic sized for the sub-grid.
    pub(crate) fn blank(sub_grid: SubGrid) -> Self {
        let (width, height) = sub_grid.pixel_size();
        Self {
            sub_grid,
            image: RgbImage::new(width, height),
        }
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }

    /// The sub-grid this mosaic was built from.
    pub fn sub_grid(&self) -> &SubGrid {
        &self.sub_grid
    }

    /// Pixel buffer.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consumes the mosaic, returning the pixel buffer.
    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

/// Why a tile could not be placed into the mosaic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchCause {
    /// The provider returned an error (after any retries).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// No response within the per-tile timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The response body was not a decodable image.
    #[error("undecodable image: {0}")]
    Decode(String),
}

/// A tile fetch failure that aborted a mosaic build.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to fetch tile {tile}: {cause}")]
pub struct FetchError {
    /// The tile that failed.
    pub tile: TileIndex,
    /// What went wrong.
    #[source]
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(tile: TileIndex, cause: impl Into<FetchCause>) -> Self {
        Self {
            tile,
            cause: cause.into(),
        }
    }

    /// Whether the failure was a timeout, at either the builder or the
    /// HTTP client.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self.cause,
            FetchCause::Timeout(_) | FetchCause::Provider(ProviderError::Timeout { .. })
        )
    }
}
