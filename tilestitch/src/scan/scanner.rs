//! Sequential scan driver.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::plan::{EdgePolicy, SubGridPlan, TileSpan};
use super::report::{OutcomeStatus, ScanError, ScanReport};
use crate::coord::GeoPoint;
use crate::mosaic::{Mosaic, MosaicBuilder, SubGrid};
use crate::provider::{TileLayer, TileSource};
use crate::sink::{ImageSink, SinkError};

/// Default sub-grid edge length in tiles.
pub const DEFAULT_STEP: u32 = 10;

/// What the scan does when a sub-grid fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and move on to the next sub-grid.
    #[default]
    Continue,
    /// Stop at the first failure and return it.
    FailFast,
}

/// Scan parameters independent of the area being scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Sub-grid edge length in tiles.
    pub step: u32,
    /// Number of leading sub-grids to skip entirely.
    pub skip: usize,
    pub edge: EdgePolicy,
    pub failure: FailurePolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            skip: 0,
            edge: EdgePolicy::default(),
            failure: FailurePolicy::default(),
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_edge(mut self, edge: EdgePolicy) -> Self {
        self.edge = edge;
        self
    }

    pub fn with_failure_policy(mut self, failure: FailurePolicy) -> Self {
        self.failure = failure;
        self
    }
}

/// The area and imagery to scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanRequest {
    pub corner_a: GeoPoint,
    pub corner_b: GeoPoint,
    pub zoom: u8,
    pub layer: TileLayer,
}

impl ScanRequest {
    pub fn new(corner_a: GeoPoint, corner_b: GeoPoint, zoom: u8, layer: TileLayer) -> Self {
        Self {
            corner_a,
            corner_b,
            zoom,
            layer,
        }
    }
}

/// Reported once per sub-grid, before it is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    /// 1-based position in the scan.
    pub current: usize,
    pub total: usize,
    pub sub_grid: SubGrid,
}

/// Callback for scan progress.
pub type ProgressCallback = Box<dyn Fn(ScanProgress) + Send + Sync>;

/// Walks a sub-grid plan, building each mosaic and handing it to a sink.
///
/// Sub-grids are processed strictly in scan order. Only the tiles within
/// one sub-grid are fetched concurrently.
pub struct Scanner<S: TileSource> {
    builder: MosaicBuilder<S>,
    config: ScanConfig,
    progress: Option<ProgressCallback>,
    cancel: CancellationToken,
}

impl<S: TileSource> Scanner<S> {
    pub fn new(builder: MosaicBuilder<S>, config: ScanConfig) -> Self {
        Self {
            builder,
            config,
            progress: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Set a progress callback.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Use an external cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels this scanner.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn builder(&self) -> &MosaicBuilder<S> {
        &self.builder
    }

    /// Maps the request corners to a tile span and scans it.
    ///
    /// # Errors
    ///
    /// [`ScanError::Coord`] for unmappable corners, [`ScanError::InvalidStep`]
    /// for a zero step, and under [`FailurePolicy::FailFast`] the first
    /// fetch or save failure.
    pub async fn scan(
        &self,
        request: &ScanRequest,
        sink: Arc<dyn ImageSink>,
    ) -> Result<ScanReport, ScanError> {
        let span = TileSpan::from_corners(request.corner_a, request.corner_b, request.zoom)?;
        debug!(
            from = %request.corner_a,
            to = %request.corner_b,
            zoom = request.zoom,
            "Corners mapped to {}",
            span
        );
        self.scan_span(span, request.layer, sink).await
    }

    /// Scans an explicit tile span.
    pub async fn scan_span(
        &self,
        span: TileSpan,
        layer: TileLayer,
        sink: Arc<dyn ImageSink>,
    ) -> Result<ScanReport, ScanError> {
        let plan = SubGridPlan::new(span, self.config.step, self.config.edge, layer)?;
        let total = plan.len();
        let mut report = ScanReport::new(span, total);

        info!(
            span = %span,
            step = self.config.step,
            edge = %self.config.edge,
            sub_grids = total,
            skip = self.config.skip,
            "Starting scan"
        );

        for (index, sub_grid) in plan.iter().enumerate() {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let current = index + 1;
            if let Some(callback) = &self.progress {
                callback(ScanProgress {
                    current,
                    total,
                    sub_grid,
                });
            }

            if current <= self.config.skip {
                debug!(x = sub_grid.origin.x, y = sub_grid.origin.y, current, "Sub-grid skipped");
                report.record(sub_grid, OutcomeStatus::Skipped);
                continue;
            }

            let name = sub_grid.name();
            let built = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                result = self.builder.build(&sub_grid) => Some(result),
            };

            let mosaic = match built {
                None => {
                    warn!(
                        x = sub_grid.origin.x,
                        y = sub_grid.origin.y,
                        "Scan cancelled, discarding sub-grid"
                    );
                    report.cancelled = true;
                    break;
                }
                Some(Ok(mosaic)) => mosaic,
                Some(Err(e)) => {
                    warn!(
                        x = sub_grid.origin.x,
                        y = sub_grid.origin.y,
                        error = %e,
                        "Sub-grid build failed"
                    );
                    if self.config.failure == FailurePolicy::FailFast {
                        return Err(ScanError::Fetch { name, source: e });
                    }
                    report.record(sub_grid, OutcomeStatus::FetchFailed(e));
                    continue;
                }
            };

            match save(Arc::clone(&sink), name.clone(), mosaic).await {
                Ok(()) => report.record(sub_grid, OutcomeStatus::Saved),
                Err(e) => {
                    warn!(name = %name, error = %e, "Saving mosaic failed");
                    if self.config.failure == FailurePolicy::FailFast {
                        return Err(ScanError::Save { name, source: e });
                    }
                    report.record(sub_grid, OutcomeStatus::SaveFailed(e));
                }
            }
        }

        info!(
            saved = report.saved(),
            skipped = report.skipped(),
            failed = report.failed(),
            cancelled = report.cancelled,
            "Scan finished"
        );

        Ok(report)
    }
}

/// Runs the sink on the blocking pool.
async fn save(sink: Arc<dyn ImageSink>, name: String, mosaic: Mosaic) -> Result<(), SinkError> {
    tokio::task::spawn_blocking(move || sink.save(&name, mosaic))
        .await
        .map_err(|e| SinkError::Task(e.to_string()))?
}
