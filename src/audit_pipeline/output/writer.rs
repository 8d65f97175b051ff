use std::io::Write;
use std::path::{Path, PathBuf};

use crate::audit_pipeline::common::error::Result;
use crate::audit_pipeline::report::AuditReport;

/// Presentation hints forwarded to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub highlight_color: String,
    /// Position of the vertical boundary marker on the histogram.
    pub marker: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            highlight_color: "blue".to_string(),
            marker: 1023.5,
        }
    }
}

pub trait ReportWriter {
    /// File extension of the written documents, without the dot.
    fn extension(&self) -> &'static str;

    fn write_report(&self, report: &AuditReport, output: &mut dyn Write, style: &RenderStyle) -> Result<()>;
}

/// `{output_dir}/{label}_DATA_{file stem}.{extension}`
pub fn report_path(output_dir: &Path, label: &str, filename: &str, extension: &str) -> PathBuf {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    output_dir.join(format!("{}_DATA_{}.{}", label, stem, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_path() {
        let path = report_path(Path::new("/tmp/out"), "REAL", "IMG_0042.CR2", "json");
        assert_eq!(path, PathBuf::from("/tmp/out/REAL_DATA_IMG_0042.json"));
    }

    #[test]
    fn test_report_path_keeps_inner_dots() {
        let path = report_path(Path::new("out"), "JONAS_CLOUD", "shot.v2.cr2", "json");
        assert_eq!(path, PathBuf::from("out/JONAS_CLOUD_DATA_shot.v2.json"));
    }
}
