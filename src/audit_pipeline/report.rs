//! Per-file audit report.

use std::fmt;

use serde::Serialize;

use crate::audit_pipeline::buckets::BucketCounts;

/// Column headings of the fine-bucket table.
pub const RANGE_COLUMN: &str = "Sensor Range";
pub const COUNT_COLUMN: &str = "Pixel Count";

/// (height, width) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub height: usize,
    pub width: usize,
}

impl From<(usize, usize)> for Dimensions {
    fn from((height, width): (usize, usize)) -> Self {
        Self { height, width }
    }
}

/// Identity plus both groupings for one analyzed capture.
///
/// Built once by [`AuditReport::assemble`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    filename: String,
    label: String,
    grid: Dimensions,
    luminance: Dimensions,
    pixel_count: u64,
    coarse: BucketCounts,
    fine: BucketCounts,
}

impl AuditReport {
    pub fn assemble(
        filename: impl Into<String>,
        label: impl Into<String>,
        grid: Dimensions,
        luminance: Dimensions,
        coarse: BucketCounts,
        fine: BucketCounts,
    ) -> Self {
        let pixel_count = (luminance.height * luminance.width) as u64;
        Self {
            filename: filename.into(),
            label: label.into(),
            grid,
            luminance,
            pixel_count,
            coarse,
            fine,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn grid_dimensions(&self) -> Dimensions {
        self.grid
    }

    pub fn luminance_dimensions(&self) -> Dimensions {
        self.luminance
    }

    pub fn pixel_count(&self) -> u64 {
        self.pixel_count
    }

    /// Overview histogram, meant for a log-scaled plot.
    pub fn coarse(&self) -> &BucketCounts {
        &self.coarse
    }

    /// Boundary table.
    pub fn fine(&self) -> &BucketCounts {
        &self.fine
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.filename, self.label)?;
        writeln!(f, "{:-<36}", "")?;
        writeln!(f, "{:<20} {:>15}", RANGE_COLUMN, COUNT_COLUMN)?;
        writeln!(f, "{:-<36}", "")?;
        for (label, count) in self.fine.iter() {
            writeln!(f, "{:<20} {:>15}", label, count)?;
        }
        write!(f, "{:-<36}", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit_pipeline::buckets::{BucketEngine, BucketSpec};

    fn sample_report() -> AuditReport {
        let values = [1023.0, 1024.0, 1030.0, 0.0];
        AuditReport::assemble(
            "IMG_0001.CR2",
            "REAL",
            Dimensions { height: 4, width: 4 },
            Dimensions { height: 2, width: 2 },
            BucketEngine::count(&values, &BucketSpec::coarse()),
            BucketEngine::count(&values, &BucketSpec::fine()),
        )
    }

    #[test]
    fn test_assemble_packages_inputs() {
        let report = sample_report();
        assert_eq!(report.filename(), "IMG_0001.CR2");
        assert_eq!(report.label(), "REAL");
        assert_eq!(report.pixel_count(), 4);
        assert_eq!(report.grid_dimensions(), Dimensions { height: 4, width: 4 });
        assert_eq!(report.coarse().total(), 4);
        assert_eq!(report.fine().get("Lvl 1023-1024"), Some(2));
    }

    #[test]
    fn test_display_renders_fine_table() {
        let text = sample_report().to_string();
        assert!(text.starts_with("IMG_0001.CR2 [REAL]"));
        assert!(text.contains("Sensor Range"));
        assert!(text.contains("Lvl 1249-1280"));
        let row = text.lines().find(|l| l.starts_with("Lvl 1025-1056")).unwrap();
        assert!(row.trim_end().ends_with('1'));
    }
}
