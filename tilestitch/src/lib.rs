//! tilestitch - Web map tiles stitched into large rasters
//!
//! Maps a geographic bounding box to the spherical Mercator tiles covering
//! it, fetches those tiles from a tile server and composites them into
//! grid-aligned mosaics, one per fixed-size sub-grid.
//!
//! ```no_run
//! use std::sync::Arc;
//! use tilestitch::coord::GeoPoint;
//! use tilestitch::mosaic::MosaicBuilder;
//! use tilestitch::provider::{GoogleTileSource, ReqwestClient, TileLayer};
//! use tilestitch::scan::{ScanConfig, ScanRequest, Scanner};
//! use tilestitch::sink::PngDirectorySink;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let source = GoogleTileSource::new(ReqwestClient::new()?);
//! let scanner = Scanner::new(MosaicBuilder::new(source), ScanConfig::default());
//! let request = ScanRequest::new(
//!     GeoPoint::new(38.540285, -120.615499),
//!     GeoPoint::new(38.521378, -120.603025),
//!     20,
//!     TileLayer::Satellite,
//! );
//! let report = scanner
//!     .scan(&request, Arc::new(PngDirectorySink::new("out")))
//!     .await?;
//! println!("{} mosaics saved", report.saved());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coord;
pub mod logging;
pub mod mosaic;
pub mod provider;
pub mod scan;
pub mod sink;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
