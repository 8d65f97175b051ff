//! Histogram bucketing module
//!
//! Two groupings of the luminance values are produced: a uniform coarse
//! histogram over the whole sample domain and a fine, irregular one anchored
//! at a precision boundary.

mod counts;
mod spec;
mod window;

pub use counts::{Bucket, BucketCounts, BucketEngine};
pub use spec::{BucketSpec, LastBucket};
pub use window::PrecisionWindow;
