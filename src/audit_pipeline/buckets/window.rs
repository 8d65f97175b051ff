use serde::Serialize;

use crate::audit_pipeline::buckets::spec::{BucketSpec, LastBucket};
use crate::audit_pipeline::common::error::{AuditError, Result};

/// Label prefix used for fine buckets.
pub const LEVEL_LABEL_PREFIX: &str = "Lvl ";

/// Shape of the fine diagnostic window around a precision boundary.
///
/// The window starts with one narrow bucket `[boundary - straddle,
/// boundary + straddle)` isolating the transition, followed by
/// `bucket_count` buckets of `bucket_width` levels each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrecisionWindow {
    pub boundary: u32,
    pub straddle: u32,
    pub bucket_width: u32,
    pub bucket_count: usize,
}

impl Default for PrecisionWindow {
    /// The 10-bit to 14-bit transition at 1024.
    fn default() -> Self {
        Self::for_bit_depth(10)
    }
}

impl PrecisionWindow {
    pub const DEFAULT_STRADDLE: u32 = 1;
    pub const DEFAULT_BUCKET_WIDTH: u32 = 32;
    pub const DEFAULT_BUCKET_COUNT: usize = 8;

    /// Window anchored at the first value a `bits`-deep readout cannot hold.
    ///
    /// A depth of 32 or more has no such value in `u32`; the boundary is then
    /// left at 0 and [`PrecisionWindow::spec`] rejects the window.
    pub fn for_bit_depth(bits: u32) -> Self {
        Self {
            boundary: 1u32.checked_shl(bits).unwrap_or(0),
            straddle: Self::DEFAULT_STRADDLE,
            bucket_width: Self::DEFAULT_BUCKET_WIDTH,
            bucket_count: Self::DEFAULT_BUCKET_COUNT,
        }
    }

    pub fn with_bucket_width(mut self, width: u32) -> Self {
        self.bucket_width = width;
        self
    }

    pub fn with_bucket_count(mut self, count: usize) -> Self {
        self.bucket_count = count;
        self
    }

    /// Where an external renderer should draw the boundary marker.
    pub fn marker(&self) -> f64 {
        self.boundary as f64 - 0.5
    }

    /// Exclusive upper end of the window.
    pub fn upper(&self) -> u32 {
        self.bucket_width
            .saturating_mul(self.bucket_count as u32)
            .saturating_add(self.straddle)
            .saturating_add(self.boundary)
    }

    fn validate(&self) -> Result<()> {
        if self.boundary == 0 {
            return Err(AuditError::InvalidBucketSpec(
                "precision boundary must be positive".to_string(),
            ));
        }
        if self.straddle == 0 || self.straddle > self.boundary {
            return Err(AuditError::InvalidBucketSpec(format!(
                "straddle {} does not fit below boundary {}",
                self.straddle, self.boundary
            )));
        }
        if self.bucket_count > 0 && self.bucket_width == 0 {
            return Err(AuditError::InvalidBucketSpec(
                "fine bucket width must be non-zero".to_string(),
            ));
        }
        let fits = u32::try_from(self.bucket_count)
            .ok()
            .and_then(|count| self.bucket_width.checked_mul(count))
            .and_then(|span| span.checked_add(self.straddle))
            .and_then(|span| span.checked_add(self.boundary));
        if fits.is_none() {
            return Err(AuditError::InvalidBucketSpec(format!(
                "window of {} x {} levels above {} overflows the sample range",
                self.bucket_count, self.bucket_width, self.boundary
            )));
        }
        Ok(())
    }

    /// Edge list of the window. Only meaningful for a validated window.
    pub(crate) fn edges(&self) -> Vec<u32> {
        let start = self.boundary - self.straddle;
        let first_upper = self.boundary + self.straddle;

        let mut edges = Vec::with_capacity(self.bucket_count + 2);
        edges.push(start);
        edges.push(first_upper);
        for i in 1..=self.bucket_count as u32 {
            edges.push(first_upper + i * self.bucket_width);
        }
        edges
    }

    pub fn spec(&self) -> Result<BucketSpec> {
        self.validate()?;
        Ok(BucketSpec::new(self.edges(), LastBucket::HalfOpen)?.with_label_prefix(LEVEL_LABEL_PREFIX))
    }
}
