//! Report output module
//!
//! Hands finished reports to a renderer. Drawing is not done here: the JSON
//! document carries everything an external plotter needs.

mod writer;
mod json_writer;

pub use writer::{RenderStyle, ReportWriter, report_path};
pub use json_writer::JsonReportWriter;
