//! Scan driver
//!
//! Maps a pair of corners to a tile span, partitions the span into
//! sub-grids and builds each one in order, handing finished mosaics to an
//! [`ImageSink`](crate::sink::ImageSink).
//!
//! ```text
//!  corners ──► TileSpan ──► SubGridPlan (row-major, `step` apart)
//!                                 │
//!               ┌─────────────────┘
//!               ▼
//!   progress ─► skip? ─► MosaicBuilder::build ─► sink.save("{x}-{y}")
//!                              │
//!                              └─ failure ─► FailurePolicy
//! ```

mod plan;
mod report;
mod scanner;

pub use plan::{EdgePolicy, SubGridPlan, TileSpan};
pub use report::{OutcomeStatus, ScanError, ScanReport, SubGridOutcome};
pub use scanner::{
    FailurePolicy, ProgressCallback, ScanConfig, ScanProgress, ScanRequest, Scanner, DEFAULT_STEP,
};
