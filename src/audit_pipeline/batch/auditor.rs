use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::audit_pipeline::{
    analysis::PrecisionAuditPipeline,
    batch::{AuditConfig, BatchOutcome, CancelToken, FileOutcome},
    common::error::{AuditError, Result},
    output::{JsonReportWriter, RenderStyle, ReportWriter, report_path},
    raw::{RawLoaderReader, SensorGridReader},
    report::AuditReport,
};

/// Reads, audits and writes every matching file of one source directory.
pub struct BatchAuditor<R: SensorGridReader, W: ReportWriter> {
    reader: R,
    writer: W,
    pipeline: PrecisionAuditPipeline,
    config: AuditConfig,
}

impl BatchAuditor<RawLoaderReader, JsonReportWriter> {
    pub fn new(config: AuditConfig) -> Self {
        Self::with_custom(RawLoaderReader, JsonReportWriter::default(), config)
    }
}

impl<R, W> BatchAuditor<R, W>
where
    R: SensorGridReader + Sync,
    W: ReportWriter + Sync,
{
    pub fn with_custom(reader: R, writer: W, config: AuditConfig) -> Self {
        Self {
            reader,
            writer,
            pipeline: PrecisionAuditPipeline::new(config.analysis.clone()),
            config,
        }
    }

    fn render_style(&self) -> RenderStyle {
        RenderStyle {
            highlight_color: self.config.highlight_color.clone(),
            marker: self.config.analysis.window.marker(),
        }
    }

    /// Matching files in the source directory, sorted by path.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let source = &self.config.source_path;
        if !source.is_dir() {
            return Err(AuditError::SourceNotFound(source.clone()));
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(source)? {
            let path = entry?.path();
            let accepted = path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| self.config.accepts_extension(e));
            if accepted {
                files.push(path);
            }
        }
        files.sort();

        debug!("Found {} matching files in {}", files.len(), source.display());
        Ok(files)
    }

    /// Decodes and analyzes in-memory file contents.
    pub fn audit_bytes(&self, filename: &str, data: &[u8]) -> Result<AuditReport> {
        let grid = {
            let _span = tracing::info_span!("decode_grid", input_size = data.len()).entered();
            self.reader.read_grid(data)?
        };
        self.pipeline.analyze(filename, &self.config.label, &grid)
    }

    /// Audits one file and writes its report, returning the report path.
    #[instrument(skip(self, path), fields(file = %path.display()))]
    pub fn process_file(&self, path: &Path) -> Result<(AuditReport, PathBuf)> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(path).map_err(|e| {
                AuditError::InputReadError(format!("{}: {}", path.display(), e))
            })?
        };

        let report = self.audit_bytes(&filename, &input_data)?;

        let output_path = report_path(
            &self.config.output_path,
            &self.config.label,
            &filename,
            self.writer.extension(),
        );
        {
            let _span = tracing::info_span!("write_report").entered();
            let file = File::create(&output_path).map_err(|e| {
                AuditError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
            let mut output = BufWriter::new(file);
            self.writer.write_report(&report, &mut output, &self.render_style())?;
            output.flush().map_err(|e| {
                AuditError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?;
        }

        Ok((report, output_path))
    }

    /// Audits the whole source directory in parallel.
    ///
    /// Only directory-level problems (missing source, unwritable output
    /// directory) fail the batch. Per-file errors are returned inside the
    /// outcome for the caller to act on.
    #[instrument(skip(self, cancel), fields(label = %self.config.label))]
    pub fn run(&self, cancel: &CancelToken) -> Result<BatchOutcome> {
        let files = self.scan()?;

        std::fs::create_dir_all(&self.config.output_path).map_err(|e| {
            AuditError::OutputWriteError(format!("{}: {}", self.config.output_path.display(), e))
        })?;

        info!(
            source = %self.config.source_path.display(),
            output = %self.config.output_path.display(),
            files = files.len(),
            "Starting batch audit"
        );

        let outcomes: Vec<FileOutcome> = files
            .into_par_iter()
            .map(|path| {
                if cancel.is_cancelled() {
                    return FileOutcome::Cancelled { path };
                }
                match self.process_file(&path) {
                    Ok((report, output)) => FileOutcome::Completed { path, report, output },
                    Err(error) => {
                        warn!("Skipping {}: {}", path.display(), error);
                        FileOutcome::Failed { path, error }
                    }
                }
            })
            .collect();

        let outcome = BatchOutcome::new(outcomes);
        info!("Batch audit finished: {}", outcome.summary());
        Ok(outcome)
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &PrecisionAuditPipeline {
        &self.pipeline
    }
}
