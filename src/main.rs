use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};

use raw_precision_audit::audit_pipeline::{
    AnalysisConfig, AuditConfig, BatchAuditor, BatchOutcome, CancelToken, CfaTiffReader,
    JsonReportWriter, PrecisionWindow, RawLoaderReader, ReportWriter, SensorGridReader,
};
use raw_precision_audit::logger;

use tracing::{error, info};

/// Input decoder used for every file of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Vendor RAW files (CR2, NEF, ARW, DNG, ...)
    Raw,
    /// Single-channel TIFFs holding an undemosaiced mosaic
    Tiff,
}

/// Audit raw captures for sensor quantization artifacts at a precision boundary
#[derive(Debug, Parser)]
#[command(name = "raw-precision-audit", version, about, long_about = None)]
struct Cli {
    /// Directory holding the captures to audit
    #[arg(long)]
    source: PathBuf,

    /// Classification label stamped on every report
    #[arg(long, default_value = "REAL")]
    label: String,

    /// Highlight colour forwarded to the renderer
    #[arg(long, default_value = "blue")]
    color: String,

    /// Directory reports are written to
    #[arg(long)]
    output: PathBuf,

    /// File extensions to audit (repeatable); defaults depend on --format
    #[arg(long = "ext")]
    extensions: Vec<String>,

    #[arg(long, value_enum, default_value_t = InputFormat::Raw)]
    format: InputFormat,

    /// Bit depth whose upper limit anchors the fine window (10 => 1024)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=16))]
    boundary_bits: u32,

    /// Width of each fine bucket above the boundary
    #[arg(long, default_value_t = PrecisionWindow::DEFAULT_BUCKET_WIDTH)]
    bucket_width: u32,

    /// Number of fine buckets above the boundary
    #[arg(long, default_value_t = PrecisionWindow::DEFAULT_BUCKET_COUNT)]
    bucket_count: usize,

    /// Pretty-print the JSON reports
    #[arg(long)]
    pretty: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run_batch<R, W>(auditor: BatchAuditor<R, W>) -> anyhow::Result<BatchOutcome>
where
    R: SensorGridReader + Sync,
    W: ReportWriter + Sync,
{
    let outcome = auditor
        .run(&CancelToken::new())
        .with_context(|| format!("auditing {}", auditor.config().source_path.display()))?;
    Ok(outcome)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    info!("Starting raw precision audit...");

    let window = PrecisionWindow::for_bit_depth(cli.boundary_bits)
        .with_bucket_width(cli.bucket_width)
        .with_bucket_count(cli.bucket_count);
    let analysis = AnalysisConfig::builder()
        .window(window)
        .build()
        .context("invalid fine bucket window")?;

    let extensions = if cli.extensions.is_empty() {
        match cli.format {
            InputFormat::Raw => vec!["cr2".to_string()],
            InputFormat::Tiff => vec!["tif".to_string(), "tiff".to_string()],
        }
    } else {
        cli.extensions
    };

    let config = AuditConfig::builder()
        .source_path(cli.source)
        .label(cli.label)
        .highlight_color(cli.color)
        .output_path(cli.output)
        .extensions(extensions)
        .analysis(analysis)
        .build();

    info!("Label: {}", config.label);
    info!("Fine window: {}", config.analysis.fine);

    let writer = JsonReportWriter { pretty: cli.pretty };
    let outcome = match cli.format {
        InputFormat::Raw => run_batch(BatchAuditor::with_custom(RawLoaderReader, writer, config))?,
        InputFormat::Tiff => {
            run_batch(BatchAuditor::with_custom(CfaTiffReader::default(), writer, config))?
        }
    };

    for report in outcome.reports() {
        println!("{}\n", report);
    }
    for (path, err) in outcome.failures() {
        error!("{}: {}", path.display(), err);
    }

    let summary = outcome.summary();
    println!("{}", summary);

    if summary.total > 0 && summary.completed == 0 {
        bail!("no file could be audited");
    }

    Ok(())
}
