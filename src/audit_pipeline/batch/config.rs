//! Batch audit configuration types

use std::path::PathBuf;

use crate::audit_pipeline::analysis::AnalysisConfig;

/// Configuration for one labelled batch of captures.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Directory scanned (non-recursively) for captures
    pub source_path: PathBuf,
    /// Classification label stamped on every report, e.g. "REAL"
    pub label: String,
    /// Colour the renderer should draw this batch's histograms in
    pub highlight_color: String,
    /// Directory reports are written to, created if missing
    pub output_path: PathBuf,
    /// Lowercase file extensions to pick up
    pub extensions: Vec<String>,
    /// Bucket specs handed to the core
    pub analysis: AnalysisConfig,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("."),
            label: "REAL".to_string(),
            highlight_color: "blue".to_string(),
            output_path: PathBuf::from("audit_reports"),
            extensions: vec!["cr2".to_string()],
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AuditConfig {
    pub fn builder() -> AuditConfigBuilder {
        AuditConfigBuilder::default()
    }

    /// Whether `extension` (any case) is one this batch accepts.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.extensions.iter().any(|e| e.to_lowercase() == extension)
    }
}

/// Builder for AuditConfig
#[derive(Default)]
pub struct AuditConfigBuilder {
    source_path: Option<PathBuf>,
    label: Option<String>,
    highlight_color: Option<String>,
    output_path: Option<PathBuf>,
    extensions: Option<Vec<String>>,
    analysis: Option<AnalysisConfig>,
}

impl AuditConfigBuilder {
    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }
    
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
    
    pub fn highlight_color(mut self, color: impl Into<String>) -> Self {
        self.highlight_color = Some(color.into());
        self
    }
    
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }
    
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }
    
    pub fn analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = Some(analysis);
        self
    }
    
    pub fn build(self) -> AuditConfig {
        let default = AuditConfig::default();
        AuditConfig {
            source_path: self.source_path.unwrap_or(default.source_path),
            label: self.label.unwrap_or(default.label),
            highlight_color: self.highlight_color.unwrap_or(default.highlight_color),
            output_path: self.output_path.unwrap_or(default.output_path),
            extensions: self.extensions.unwrap_or(default.extensions),
            analysis: self.analysis.unwrap_or(default.analysis),
        }
    }
}
