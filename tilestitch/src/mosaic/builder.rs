//! Fetch-and-composite of a single sub-grid.

use std::time::{Duration, Instant};

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use image::{imageops, RgbImage};
use tracing::{debug, info, warn};

use super::retry::RetryPolicy;
use super::types::{FetchCause, FetchError, Mosaic, SubGrid};
use crate::coord::{TileIndex, TILE_SIZE};
use crate::provider::{TileLayer, TileSource, DEFAULT_TIMEOUT_SECS};

/// Default number of tile fetches in flight per sub-grid.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Tuning for [`MosaicBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicConfig {
    /// Upper bound on one fetch attempt.
    pub tile_timeout: Duration,

    /// Maximum concurrent fetches within one sub-grid.
    pub concurrency: usize,

    /// Retry behavior for transient failures.
    pub retry: RetryPolicy,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            tile_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
        }
    }
}

impl MosaicConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-attempt tile timeout.
    pub fn with_tile_timeout(mut self, timeout: Duration) -> Self {
        self.tile_timeout = timeout;
        self
    }

    /// Set the fetch concurrency (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Builds [`Mosaic`]s by fetching and stitching every tile of a sub-grid.
///
/// Tiles are fetched with bounded concurrency and pasted as they arrive.
/// Each tile owns a disjoint 256×256 rectangle of the output, so arrival
/// order never changes the result. The first tile that fails aborts the
/// build; fetches still in flight are dropped and no mosaic is returned.
pub struct MosaicBuilder<S: TileSource> {
    source: S,
    config: MosaicConfig,
}

impl<S: TileSource> MosaicBuilder<S> {
    /// Creates a builder with the default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, MosaicConfig::default())
    }

    /// Creates a builder with a custom configuration.
    pub fn with_config(source: S, config: MosaicConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &MosaicConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches every tile of `sub_grid` and composites them.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`] of the first tile that could not be
    /// fetched or decoded.
    pub async fn build(&self, sub_grid: &SubGrid) -> Result<Mosaic, FetchError> {
        let started = Instant::now();
        let layer = sub_grid.layer;
        let mut mosaic = Mosaic::blank(*sub_grid);

        let mut tiles = stream::iter(sub_grid.tiles())
            .map(|(i, j, tile)| async move {
                let image = self.fetch_image(tile, layer).await?;
                Ok::<_, FetchError>((i, j, image))
            })
            .buffer_unordered(self.config.concurrency.max(1));

        while let Some(result) = tiles.next().await {
            let (i, j, tile_image) = result?;
            imageops::replace(
                mosaic.image_mut(),
                &tile_image,
                (i * TILE_SIZE) as i64,
                (j * TILE_SIZE) as i64,
            );
        }

        info!(
            x = sub_grid.origin.x,
            y = sub_grid.origin.y,
            zoom = sub_grid.origin.zoom,
            tiles = sub_grid.tile_count(),
            bounds = %sub_grid.bounds(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Mosaic built"
        );

        Ok(mosaic)
    }

    /// Fetches one tile and decodes it to RGB.
    async fn fetch_image(&self, tile: TileIndex, layer: TileLayer) -> Result<RgbImage, FetchError> {
        let bytes = self.fetch_with_retry(tile, layer).await?;

        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| FetchError::new(tile, FetchCause::Decode(e.to_string())))?
            .to_rgb8();

        if decoded.dimensions() != (TILE_SIZE, TILE_SIZE) {
            warn!(
                x = tile.x,
                y = tile.y,
                width = decoded.width(),
                height = decoded.height(),
                "Tile is not {}px square; pasting clipped",
                TILE_SIZE
            );
        }

        Ok(decoded)
    }

    async fn fetch_with_retry(&self, tile: TileIndex, layer: TileLayer) -> Result<Bytes, FetchError> {
        let timeout = self.config.tile_timeout;
        let mut attempt = 1u32;

        loop {
            let error = match tokio::time::timeout(timeout, self.source.fetch_tile(tile, layer)).await
            {
                Ok(Ok(bytes)) => {
                    debug!(x = tile.x, y = tile.y, bytes = bytes.len(), attempt, "Tile fetched");
                    return Ok(bytes);
                }
                Ok(Err(e)) => FetchError::new(tile, e),
                Err(_) => FetchError::new(tile, FetchCause::Timeout(timeout)),
            };

            let transient = match &error.cause {
                FetchCause::Provider(e) => e.is_transient(),
                FetchCause::Timeout(_) => true,
                FetchCause::Decode(_) => false,
            };

            match self.config.retry.delay_for_attempt(attempt) {
                Some(delay) if transient => {
                    warn!(
                        x = tile.x,
                        y = tile.y,
                        attempt,
                        max_attempts = self.config.retry.max_attempts(),
                        delay_ms = delay.as_millis() as u64,
                        error = %error.cause,
                        "Tile fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                _ => return Err(error),
            }
        }
    }
}
