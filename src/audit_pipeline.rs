//! Sensor precision audit pipeline
//!
//! Splits a raw Bayer mosaic into its CFA subchannels, composes a luminance
//! plane and summarizes it with a coarse overview histogram and a fine
//! histogram around the 10-bit precision boundary. Genuine sensor readouts
//! cluster characteristically at that boundary; regenerated images do not.

pub mod analysis;
pub mod batch;
pub mod buckets;
pub mod channels;
pub mod common;
pub mod luminance;
pub mod output;
pub mod raw;
pub mod report;

pub use common::{
    AuditError,
    Result,
};

pub use raw::{
    SensorGrid,
    SensorGridReader,
    RawLoaderReader,
    CfaTiffReader,
};

pub use channels::{ChannelExtractor, ChannelSet, Plane};
pub use luminance::{LuminanceCompositor, LuminancePlane};

pub use buckets::{
    Bucket,
    BucketCounts,
    BucketEngine,
    BucketSpec,
    LastBucket,
    PrecisionWindow,
};

pub use report::{AuditReport, Dimensions};

pub use analysis::{
    AnalysisConfig,
    AnalysisConfigBuilder,
    PrecisionAuditPipeline,
};

pub use output::{
    JsonReportWriter,
    RenderStyle,
    ReportWriter,
};

pub use batch::{
    AuditConfig,
    AuditConfigBuilder,
    BatchAuditor,
    BatchOutcome,
    BatchSummary,
    CancelToken,
    FileOutcome,
};
