use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::audit_pipeline::buckets::Bucket;
use crate::audit_pipeline::common::error::Result;
use crate::audit_pipeline::output::writer::{RenderStyle, ReportWriter};
use crate::audit_pipeline::report::{AuditReport, COUNT_COLUMN, Dimensions, RANGE_COLUMN};

/// Writes a render document as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportWriter {
    pub pretty: bool,
}

#[derive(Serialize)]
struct RenderDocument<'a> {
    title: String,
    filename: &'a str,
    label: &'a str,
    grid: Dimensions,
    luminance: Dimensions,
    pixel_count: u64,
    histogram: HistogramSection<'a>,
    table: TableSection<'a>,
}

#[derive(Serialize)]
struct HistogramSection<'a> {
    x_label: String,
    y_label: &'static str,
    log_scale: bool,
    color: &'a str,
    marker: f64,
    outside: u64,
    buckets: &'a [Bucket],
}

#[derive(Serialize)]
struct TableSection<'a> {
    columns: [&'static str; 2],
    rows: Vec<(&'a str, u64)>,
}

impl<'a> RenderDocument<'a> {
    fn new(report: &'a AuditReport, style: &'a RenderStyle) -> Self {
        let domain_end = report.coarse().buckets().last().map_or(0, |b| b.upper);
        let max_level = domain_end.saturating_sub(1);
        let bits = u32::BITS - max_level.leading_zeros();

        Self {
            title: format!("{}-Bit Linear Audit: {} [{}]", bits, report.filename(), report.label()),
            filename: report.filename(),
            label: report.label(),
            grid: report.grid_dimensions(),
            luminance: report.luminance_dimensions(),
            pixel_count: report.pixel_count(),
            histogram: HistogramSection {
                x_label: format!("Signal Intensity (0-{})", max_level),
                y_label: "Pixel Frequency (Log)",
                log_scale: true,
                color: &style.highlight_color,
                marker: style.marker,
                outside: report.coarse().outside(),
                buckets: report.coarse().buckets(),
            },
            table: TableSection {
                columns: [RANGE_COLUMN, COUNT_COLUMN],
                rows: report.fine().iter().collect(),
            },
        }
    }
}

impl ReportWriter for JsonReportWriter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write_report(&self, report: &AuditReport, output: &mut dyn Write, style: &RenderStyle) -> Result<()> {
        debug!("Encoding render document for {}", report.filename());

        let document = RenderDocument::new(report, style);
        if self.pretty {
            serde_json::to_writer_pretty(&mut *output, &document)?;
        } else {
            serde_json::to_writer(&mut *output, &document)?;
        }
        output.write_all(b"\n")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit_pipeline::analysis::PrecisionAuditPipeline;
    use crate::audit_pipeline::raw::SensorGrid;

    fn render(style: &RenderStyle) -> serde_json::Value {
        let report = PrecisionAuditPipeline::default()
            .analyze("IMG_0001.CR2", "REAL", &SensorGrid::filled(4, 4, 1024))
            .unwrap();
        let mut buffer = Vec::new();
        JsonReportWriter { pretty: true }
            .write_report(&report, &mut buffer, style)
            .unwrap();
        serde_json::from_slice(&buffer).unwrap()
    }

    #[test]
    fn test_document_layout() {
        let doc = render(&RenderStyle::default());

        assert_eq!(doc["title"], "14-Bit Linear Audit: IMG_0001.CR2 [REAL]");
        assert_eq!(doc["pixel_count"], 4);
        assert_eq!(doc["histogram"]["x_label"], "Signal Intensity (0-16383)");
        assert_eq!(doc["histogram"]["log_scale"], true);
        assert_eq!(doc["histogram"]["marker"], 1023.5);
        assert_eq!(doc["histogram"]["buckets"].as_array().unwrap().len(), 1024);
        assert_eq!(doc["table"]["columns"][0], "Sensor Range");
        assert_eq!(doc["table"]["rows"][0][0], "Lvl 1023-1024");
        assert_eq!(doc["table"]["rows"][0][1], 4);
        assert_eq!(doc["table"]["rows"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn test_highlight_color_is_forwarded() {
        let style = RenderStyle {
            highlight_color: "red".to_string(),
            marker: 1023.5,
        };
        assert_eq!(render(&style)["histogram"]["color"], "red");
    }
}
