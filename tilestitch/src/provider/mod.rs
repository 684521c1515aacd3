//! Tile imagery provider abstraction
//!
//! This module provides the [`TileSource`] trait the mosaic builder fetches
//! from, the HTTP client it is built on, and the Google Maps tile server
//! implementation.
//!
//! ```ignore
//! use tilestitch::provider::{GoogleTileSource, ReqwestClient, TileLayer, TileSource};
//!
//! let source = GoogleTileSource::new(ReqwestClient::new()?);
//! let bytes = source.fetch_tile(tile, TileLayer::Satellite).await?;
//! ```

mod google;
mod http;
mod layer;
mod types;

pub use google::{GoogleTileSource, GOOGLE_TILE_URL};
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use layer::{ParseLayerError, TileLayer};
pub use types::{ProviderError, TileSource};

#[cfg(test)]
pub use http::tests::MockHttpClient;
