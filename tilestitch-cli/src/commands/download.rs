//! Download command - fetch a bounding box as stitched PNG mosaics.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tilestitch::config::ConfigFile;
use tilestitch::coord::{GeoPoint, MAX_ZOOM};
use tilestitch::mosaic::{MosaicBuilder, MosaicConfig, RetryPolicy};
use tilestitch::provider::{GoogleTileSource, ReqwestClient, TileLayer, TileSource};
use tilestitch::scan::{
    FailurePolicy, OutcomeStatus, ScanConfig, ScanProgress, ScanReport, ScanRequest, Scanner,
    SubGridPlan, TileSpan,
};
use tilestitch::sink::PngDirectorySink;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::common::{parse_lat_lon, EdgeArg, LayerArg};
use crate::error::CliError;

/// Arguments for `tilestitch download`.
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// First corner as LAT,LON
    #[arg(long, value_parser = parse_lat_lon, allow_hyphen_values = true)]
    pub from: GeoPoint,

    /// Opposite corner as LAT,LON
    #[arg(long, value_parser = parse_lat_lon, allow_hyphen_values = true)]
    pub to: GeoPoint,

    /// Zoom level (0-23) [config: scan.zoom]
    #[arg(short, long)]
    pub zoom: Option<u8>,

    /// Map layer [config: scan.layer]
    #[arg(short, long, value_enum)]
    pub layer: Option<LayerArg>,

    /// Sub-grid edge length in tiles [config: scan.step]
    #[arg(short, long)]
    pub step: Option<u32>,

    /// Skip the first N sub-grids without downloading them
    #[arg(long, default_value_t = 0)]
    pub skip: usize,

    /// Output directory [config: output.directory]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Per-tile timeout in seconds [config: download.timeout]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Concurrent tile fetches per sub-grid [config: download.parallel]
    #[arg(long)]
    pub parallel: Option<usize>,

    /// Attempts per tile including the first [config: download.max_retries]
    #[arg(long)]
    pub retries: Option<u32>,

    /// Sizing of sub-grids at the area edge [config: scan.edge]
    #[arg(long, value_enum)]
    pub edge: Option<EdgeArg>,

    /// Stop at the first failed sub-grid [config: scan.fail_fast]
    #[arg(long)]
    pub fail_fast: bool,
}

/// Fully resolved download settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPlan {
    pub request: ScanRequest,
    pub scan: ScanConfig,
    pub mosaic: MosaicConfig,
    pub output: PathBuf,
}

impl DownloadArgs {
    /// Merges arguments over the config file. Arguments win.
    pub fn resolve(&self, config: &ConfigFile) -> Result<DownloadPlan, CliError> {
        let zoom = self.zoom.unwrap_or(config.scan.zoom);
        if zoom > MAX_ZOOM {
            return Err(CliError::Config(format!(
                "zoom {} is above the maximum of {}",
                zoom, MAX_ZOOM
            )));
        }
        let layer = self.layer.map(TileLayer::from).unwrap_or(config.scan.layer);

        let mut scan = config.scan_config().with_skip(self.skip);
        if let Some(step) = self.step {
            scan = scan.with_step(step);
        }
        if let Some(edge) = self.edge {
            scan = scan.with_edge(edge.into());
        }
        if self.fail_fast {
            scan = scan.with_failure_policy(FailurePolicy::FailFast);
        }

        let mut mosaic = config.mosaic_config();
        if let Some(secs) = self.timeout {
            mosaic = mosaic.with_tile_timeout(Duration::from_secs(secs.max(1)));
        }
        if let Some(parallel) = self.parallel {
            mosaic = mosaic.with_concurrency(parallel);
        }
        if let Some(retries) = self.retries {
            mosaic = mosaic.with_retry(RetryPolicy::exponential(retries));
        }

        Ok(DownloadPlan {
            request: ScanRequest::new(self.from, self.to, zoom, layer),
            scan,
            mosaic,
            output: self
                .output
                .clone()
                .unwrap_or_else(|| config.output.directory.clone()),
        })
    }
}

/// Run the download command.
pub fn run(args: DownloadArgs, config: &ConfigFile) -> Result<(), CliError> {
    let plan = args.resolve(config)?;
    let request = plan.request;

    let span = TileSpan::from_corners(request.corner_a, request.corner_b, request.zoom)?;
    let total = SubGridPlan::new(span, plan.scan.step, plan.scan.edge, request.layer)?.len();

    let client = ReqwestClient::with_timeout(plan.mosaic.tile_timeout)?;
    let source = GoogleTileSource::new(client);

    println!("Provider:  {}", source.name());
    println!("Area:      {} to {}", request.corner_a, request.corner_b);
    println!("Tiles:     {} ({} tiles)", span, span.tile_count());
    println!("Layer:     {}", request.layer);
    println!(
        "Sub-grids: {} of up to {}x{} tiles ({} edge)",
        total, plan.scan.step, plan.scan.step, plan.scan.edge
    );
    println!("Output:    {}", plan.output.display());
    println!();
    println!("Press Ctrl+C to stop after the current sub-grid");
    println!();

    info!(
        zoom = request.zoom,
        layer = %request.layer,
        sub_grids = total,
        output = %plan.output.display(),
        "Download starting"
    );

    let cancel = CancellationToken::new();
    install_interrupt_handler(cancel.clone())?;

    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let bar = progress.clone();
    let scanner = Scanner::new(MosaicBuilder::with_config(source, plan.mosaic), plan.scan)
        .with_cancellation(cancel)
        .with_progress(Box::new(move |p| {
            bar.set_position((p.current - 1) as u64);
            bar.set_message(format!("{} {}", p.sub_grid.name(), p.sub_grid.bounds()));
            bar.suspend(|| {
                for line in progress_lines(&p) {
                    println!("{}", line);
                }
            });
        }));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let sink = Arc::new(PngDirectorySink::new(&plan.output));
    let result = runtime.block_on(scanner.scan(&request, sink));
    progress.finish_and_clear();

    let report = result?;
    print_summary(&report);

    if report.cancelled {
        return Err(CliError::Cancelled);
    }
    if report.failed() > 0 {
        return Err(CliError::Incomplete {
            failed: report.failed(),
            total: report.total,
        });
    }
    Ok(())
}

/// Cancels `token` on Ctrl+C.
fn install_interrupt_handler(token: CancellationToken) -> Result<(), CliError> {
    ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("Received interrupt, stopping...");
        token.cancel();
    })
    .map_err(|e| CliError::Signal(e.to_string()))
}

/// Lines written to stdout before each sub-grid.
fn progress_lines(progress: &ScanProgress) -> [String; 2] {
    [
        format!(
            "Downloading {} {}",
            progress.sub_grid.origin.x, progress.sub_grid.origin.y
        ),
        format!("Progress {}/{}", progress.current, progress.total),
    ]
}

fn print_summary(report: &ScanReport) {
    println!();
    println!("Download Summary");
    println!("────────────────");
    println!("  Saved:   {}", style(report.saved()).green());
    if report.skipped() > 0 {
        println!("  Skipped: {}", report.skipped());
    }
    if report.failed() > 0 {
        println!("  Failed:  {}", style(report.failed()).red());
        for outcome in report.failures() {
            let reason = match &outcome.status {
                OutcomeStatus::FetchFailed(e) => e.to_string(),
                OutcomeStatus::SaveFailed(e) => e.to_string(),
                OutcomeStatus::Saved | OutcomeStatus::Skipped => continue,
            };
            println!("    {}: {}", outcome.sub_grid.name(), reason);
        }
    }
    if report.cancelled {
        println!(
            "  {} after {}/{} sub-grids",
            style("Cancelled").yellow(),
            report.outcomes.len(),
            report.total
        );
    }
}
