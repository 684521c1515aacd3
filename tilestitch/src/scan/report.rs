//! Scan outcomes and errors.

use thiserror::Error;

use crate::coord::CoordError;
use crate::mosaic::{FetchError, SubGrid};
use crate::sink::SinkError;

use super::plan::TileSpan;

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A corner could not be mapped to a tile index.
    #[error("invalid corner: {0}")]
    Coord(#[from] CoordError),

    /// The sub-grid step must be at least one tile.
    #[error("invalid step {0}: must be at least 1")]
    InvalidStep(u32),

    /// A sub-grid could not be built (fail-fast only).
    #[error("sub-grid {name} failed: {source}")]
    Fetch {
        name: String,
        #[source]
        source: FetchError,
    },

    /// A mosaic could not be saved (fail-fast only).
    #[error("saving {name} failed: {source}")]
    Save {
        name: String,
        #[source]
        source: SinkError,
    },
}

/// What happened to one sub-grid.
#[derive(Debug)]
pub enum OutcomeStatus {
    /// Built and handed to the sink.
    Saved,
    /// Within the skip count; neither built nor saved.
    Skipped,
    /// A tile could not be fetched; nothing was saved.
    FetchFailed(FetchError),
    /// Built, but the sink rejected it.
    SaveFailed(SinkError),
}

impl OutcomeStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, OutcomeStatus::FetchFailed(_) | OutcomeStatus::SaveFailed(_))
    }
}

#[derive(Debug)]
pub struct SubGridOutcome {
    pub sub_grid: SubGrid,
    pub status: OutcomeStatus,
}

/// Summary of a completed (or cancelled) scan.
#[derive(Debug)]
pub struct ScanReport {
    /// Tile range covered by the scan.
    pub span: TileSpan,
    /// Number of planned sub-grids.
    pub total: usize,
    /// One entry per sub-grid reached, in scan order.
    pub outcomes: Vec<SubGridOutcome>,
    /// Whether the scan stopped early on cancellation.
    pub cancelled: bool,
}

impl ScanReport {
    pub(crate) fn new(span: TileSpan, total: usize) -> Self {
        Self {
            span,
            total,
            outcomes: Vec::new(),
            cancelled: false,
        }
    }

    pub(crate) fn record(&mut self, sub_grid: SubGrid, status: OutcomeStatus) {
        self.outcomes.push(SubGridOutcome { sub_grid, status });
    }

    pub fn saved(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Saved))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(OutcomeStatus::is_failure)
    }

    /// True when every planned sub-grid was reached and none failed.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failed() == 0 && self.outcomes.len() == self.total
    }

    /// Failed outcomes, in scan order.
    pub fn failures(&self) -> impl Iterator<Item = &SubGridOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failure())
    }

    fn count(&self, pred: impl Fn(&OutcomeStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}
