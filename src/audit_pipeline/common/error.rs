use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),
    
    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),
    
    #[error("Failed to decode sensor data: {0}")]
    DecodeError(String),
    
    #[error("Invalid grid dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),
    
    #[error("Non-rectangular sensor grid: expected {expected} samples, got {actual}")]
    NonRectangular { expected: usize, actual: usize },
    
    #[error("Row {row} has {actual} samples, expected {expected}")]
    RaggedRow { row: usize, expected: usize, actual: usize },
    
    #[error("Sample {value} of a {bits_per_sample}-bit grid is outside the histogram domain [{lower}, {upper}]")]
    SampleOutOfDomain { value: u16, bits_per_sample: u32, lower: u32, upper: u32 },
    
    #[error("Invalid bucket spec: {0}")]
    InvalidBucketSpec(String),
    
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    
    #[error("Failed to serialize report: {0}")]
    SerializeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
