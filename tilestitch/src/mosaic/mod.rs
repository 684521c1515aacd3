//! Tile mosaic building
//!
//! Fetches every tile of a [`SubGrid`] from a [`TileSource`] and stitches
//! them into one contiguous raster.
//!
//! ```text
//!  SubGrid (w × h tiles)
//!      │
//!      ▼
//!  ┌─────────────────────┐   up to `concurrency` in flight
//!  │ fetch + timeout     │──────────────┐
//!  │ + retry per tile    │              │
//!  └─────────────────────┘              ▼
//!                            decode → paste at (i·256, j·256)
//!                                       │
//!                                       ▼
//!                             Mosaic (256w × 256h px)
//! ```
//!
//! [`TileSource`]: crate::provider::TileSource

mod builder;
mod retry;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use builder::{MosaicBuilder, MosaicConfig, DEFAULT_CONCURRENCY};
pub use retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use types::{FetchCause, FetchError, Mosaic, SubGrid};
