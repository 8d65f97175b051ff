//! Per-grid audit pipeline: extraction, composition, bucketing, assembly.

use tracing::{debug, info, instrument};

use crate::audit_pipeline::{
    buckets::{BucketEngine, BucketSpec, PrecisionWindow},
    channels::ChannelExtractor,
    common::error::{AuditError, Result},
    luminance::{LuminanceCompositor, LuminancePlane},
    raw::SensorGrid,
    report::AuditReport,
};

/// Smallest grid holding one complete CFA tile.
pub const MIN_GRID_SIDE: usize = 2;

/// Bucket specs used by the core.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Uniform overview histogram over the full sample domain.
    pub coarse: BucketSpec,
    /// Irregular window around the precision boundary.
    pub fine: BucketSpec,
    /// Boundary the fine window is anchored at, kept for renderers.
    pub window: PrecisionWindow,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            coarse: BucketSpec::coarse(),
            fine: BucketSpec::fine(),
            window: PrecisionWindow::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }
}

/// Builder for AnalysisConfig
#[derive(Default)]
pub struct AnalysisConfigBuilder {
    coarse: Option<BucketSpec>,
    window: Option<PrecisionWindow>,
}

impl AnalysisConfigBuilder {
    pub fn coarse(mut self, spec: BucketSpec) -> Self {
        self.coarse = Some(spec);
        self
    }
    
    pub fn window(mut self, window: PrecisionWindow) -> Self {
        self.window = Some(window);
        self
    }
    
    /// Fails if the precision window cannot produce a valid spec.
    pub fn build(self) -> Result<AnalysisConfig> {
        let default = AnalysisConfig::default();
        let (fine, window) = match self.window {
            Some(window) => (window.spec()?, window),
            None => (default.fine, default.window),
        };
        Ok(AnalysisConfig {
            coarse: self.coarse.unwrap_or(default.coarse),
            fine,
            window,
        })
    }
}

/// Turns a [`SensorGrid`] into an [`AuditReport`]. Holds no per-file state,
/// so one instance can serve many grids concurrently.
#[derive(Debug, Clone, Default)]
pub struct PrecisionAuditPipeline {
    config: AnalysisConfig,
}

impl PrecisionAuditPipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    fn validate_dimensions(&self, grid: &SensorGrid) -> Result<()> {
        if grid.width() < MIN_GRID_SIDE || grid.height() < MIN_GRID_SIDE {
            return Err(AuditError::InvalidDimensions(grid.width(), grid.height()));
        }
        Ok(())
    }

    /// Every luminance value is a weighted mean of samples, so it stays inside
    /// the coarse domain whenever the smallest and largest samples do.
    fn validate_sample_domain(&self, grid: &SensorGrid) -> Result<()> {
        let coarse = &self.config.coarse;
        let extremes = grid
            .data()
            .iter()
            .fold(None, |acc: Option<(u16, u16)>, &v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            });

        if let Some((lo, hi)) = extremes {
            for value in [lo, hi] {
                if coarse.bucket_index(value as f64).is_none() {
                    return Err(AuditError::SampleOutOfDomain {
                        value,
                        bits_per_sample: grid.bits_per_sample(),
                        lower: coarse.lower(),
                        upper: coarse.upper(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Extracts the subchannels and composes the luminance plane.
    pub fn luminance(&self, grid: &SensorGrid) -> Result<LuminancePlane> {
        {
            let _span = tracing::info_span!("validate_dimensions",
                width = grid.width(),
                height = grid.height()
            ).entered();
            self.validate_dimensions(grid)?;
        }

        {
            let _span = tracing::info_span!("validate_sample_domain",
                bits_per_sample = grid.bits_per_sample()
            ).entered();
            self.validate_sample_domain(grid)?;
        }

        let channels = {
            let _span = tracing::info_span!("extract_channels").entered();
            ChannelExtractor::extract(grid)
        };

        let _span = tracing::info_span!("compose_luminance").entered();
        Ok(LuminanceCompositor::compose(&channels))
    }

    #[instrument(skip(self, grid), fields(width = grid.width(), height = grid.height()))]
    pub fn analyze(&self, filename: &str, label: &str, grid: &SensorGrid) -> Result<AuditReport> {
        let luminance = self.luminance(grid)?;

        let (coarse, fine) = {
            let _span = tracing::info_span!("bucket_luminance", pixels = luminance.len()).entered();
            (
                BucketEngine::count(luminance.values(), &self.config.coarse),
                BucketEngine::count(luminance.values(), &self.config.fine),
            )
        };
        debug!(
            fine_total = fine.total(),
            coarse_outside = coarse.outside(),
            "Bucketing complete"
        );

        let report = AuditReport::assemble(
            filename,
            label,
            (grid.height(), grid.width()).into(),
            luminance.dimensions().into(),
            coarse,
            fine,
        );

        info!(
            pixels = report.pixel_count(),
            boundary_count = report.fine().buckets().first().map_or(0, |b| b.count),
            "Audit complete"
        );
        Ok(report)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.config = config;
    }
}

#[cfg(test)]
mod tests;
