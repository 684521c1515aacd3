//! Scriptable in-memory tile source for tests.

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::time::Duration;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use parking_lot::Mutex;

use crate::coord::{TileIndex, TILE_SIZE};
use crate::provider::{ProviderError, TileLayer, TileSource};

/// Pixel value the mock serves at `(px, py)` inside `tile`.
pub fn tile_color(tile: TileIndex, px: u32, py: u32) -> Rgb<u8> {
    Rgb([
        (tile.x % 251) as u8,
        (tile.y % 241) as u8,
        ((px / 16 + py / 16 + tile.x + tile.y) % 256) as u8,
    ])
}

/// PNG encoding of the mock tile.
pub fn tile_png(tile: TileIndex) -> Bytes {
    let image = RgbImage::from_fn(TILE_SIZE, TILE_SIZE, |px, py| tile_color(tile, px, py));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("PNG encoding of an in-memory image");
    Bytes::from(buf)
}

/// Tile source serving generated PNGs with per-tile failure injection.
#[derive(Default)]
pub struct MockTileSource {
    failures: HashMap<TileIndex, ProviderError>,
    transient: Mutex<HashMap<TileIndex, u32>>,
    hang: HashSet<TileIndex>,
    garbage: HashSet<TileIndex>,
    delays: HashMap<TileIndex, Duration>,
    requests: Mutex<Vec<TileIndex>>,
}

impl MockTileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always fail `tile` with `error`.
    pub fn with_failure(mut self, tile: TileIndex, error: ProviderError) -> Self {
        self.failures.insert(tile, error);
        self
    }

    /// Fail `tile` with HTTP 503 for the first `count` requests.
    pub fn with_transient_failures(self, tile: TileIndex, count: u32) -> Self {
        self.transient.lock().insert(tile, count);
        self
    }

    /// Never answer requests for `tile`.
    pub fn with_hang(mut self, tile: TileIndex) -> Self {
        self.hang.insert(tile);
        self
    }

    /// Answer `tile` with bytes that are not an image.
    pub fn with_garbage(mut self, tile: TileIndex) -> Self {
        self.garbage.insert(tile);
        self
    }

    /// Delay the answer for `tile`.
    pub fn with_delay(mut self, tile: TileIndex, delay: Duration) -> Self {
        self.delays.insert(tile, delay);
        self
    }

    /// Every requested tile, in request order.
    pub fn requests(&self) -> Vec<TileIndex> {
        self.requests.lock().clone()
    }

    /// How many times `tile` was requested.
    pub fn request_count(&self, tile: TileIndex) -> usize {
        self.requests.lock().iter().filter(|t| **t == tile).count()
    }
}

impl TileSource for MockTileSource {
    async fn fetch_tile(&self, tile: TileIndex, _layer: TileLayer) -> Result<Bytes, ProviderError> {
        self.requests.lock().push(tile);

        if let Some(delay) = self.delays.get(&tile) {
            tokio::time::sleep(*delay).await;
        }
        if self.hang.contains(&tile) {
            std::future::pending::<()>().await;
        }
        if let Some(err) = self.failures.get(&tile) {
            return Err(err.clone());
        }
        if self.garbage.contains(&tile) {
            return Ok(Bytes::from_static(b"<html>not a tile</html>"));
        }

        let transient = {
            let mut remaining = self.transient.lock();
            match remaining.get_mut(&tile) {
                Some(n) if *n > 0 => {
                    *n -= 1;
                    true
                }
                _ => false,
            }
        };
        if transient {
            return Err(ProviderError::HttpStatus {
                status: 503,
                url: format!("mock://{}", tile),
            });
        }

        Ok(tile_png(tile))
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
