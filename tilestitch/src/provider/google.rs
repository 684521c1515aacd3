//! Google Maps public tile server.
//!
//! Tiles are requested from the unauthenticated `vt` endpoint:
//!
//! ```text
//! https://mt0.google.com/vt?lyrs={layer}&x={x}&y={y}&z={zoom}
//! ```
//!
//! The endpoint uses standard Web Mercator XYZ addressing, so tile
//! indices from [`crate::coord`] map directly onto `x`/`y`/`z`.
//! The response body is an encoded raster (JPEG or PNG depending on the
//! layer).

use bytes::Bytes;
use tracing::debug;

use crate::coord::TileIndex;
use crate::provider::{HttpClient, ProviderError, TileLayer, TileSource};

/// Default tile endpoint.
pub const GOOGLE_TILE_URL: &str = "https://mt0.google.com/vt";

/// Google Maps tile source.
///
/// # Example
///
/// ```no_run
/// use tilestitch::provider::{GoogleTileSource, ReqwestClient};
///
/// let client = ReqwestClient::new().unwrap();
/// let source = GoogleTileSource::new(client);
/// ```
pub struct GoogleTileSource<C: HttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: HttpClient> GoogleTileSource<C> {
    /// Creates a source against the public endpoint.
    pub fn new(http_client: C) -> Self {
        Self::with_base_url(http_client, GOOGLE_TILE_URL)
    }

    /// Creates a source against a different host serving the same
    /// query interface (mirrors, local test servers).
    pub fn with_base_url(http_client: C, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Builds the request URL for a tile.
    pub fn build_url(&self, tile: TileIndex, layer: TileLayer) -> String {
        format!(
            "{}?lyrs={}&x={}&y={}&z={}",
            self.base_url,
            layer.wire_token(),
            tile.x,
            tile.y,
            tile.zoom
        )
    }
}

impl<C: HttpClient> TileSource for GoogleTileSource<C> {
    async fn fetch_tile(&self, tile: TileIndex, layer: TileLayer) -> Result<Bytes, ProviderError> {
        let url = self.build_url(tile, layer);
        debug!(x = tile.x, y = tile.y, zoom = tile.zoom, %url, "Requesting tile");
        self.http_client.get(&url).await
    }

    fn name(&self) -> &str {
        "Google Maps"
    }
}
