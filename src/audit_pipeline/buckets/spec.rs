use std::fmt;

use serde::Serialize;

use crate::audit_pipeline::common::error::{AuditError, Result};
use crate::audit_pipeline::buckets::window::{LEVEL_LABEL_PREFIX, PrecisionWindow};

/// Upper edge of a full 14-bit sample domain.
pub const FULL_DOMAIN_END: u32 = 1 << 14;
/// Width of a coarse overview bucket.
pub const COARSE_STEP: u32 = 16;

/// Whether the last bucket also includes its upper edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LastBucket {
    /// `[edge[n-1], edge[n]]`
    Closed,
    /// `[edge[n-1], edge[n])`
    HalfOpen,
}

/// Strictly increasing bucket edges. Bucket `i` is `[edges[i], edges[i + 1])`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSpec {
    edges: Vec<u32>,
    last_bucket: LastBucket,
    label_prefix: String,
}

impl BucketSpec {
    pub fn new(edges: Vec<u32>, last_bucket: LastBucket) -> Result<Self> {
        if edges.len() < 2 {
            return Err(AuditError::InvalidBucketSpec(format!(
                "need at least 2 edges, got {}",
                edges.len()
            )));
        }

        if let Some(pair) = edges.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(AuditError::InvalidBucketSpec(format!(
                "edges must be strictly increasing, found {} followed by {}",
                pair[0], pair[1]
            )));
        }

        Ok(Self {
            edges,
            last_bucket,
            label_prefix: String::new(),
        })
    }

    /// Edges `start, start + step, ...` up to and including `end`.
    pub fn uniform(start: u32, end: u32, step: u32, last_bucket: LastBucket) -> Result<Self> {
        if step == 0 {
            return Err(AuditError::InvalidBucketSpec("uniform step must be non-zero".to_string()));
        }

        let edges = (start..=end).step_by(step as usize).collect();
        Self::new(edges, last_bucket)
    }

    /// 1024 buckets of width 16 spanning the 14-bit domain, last bucket closed.
    pub fn coarse() -> Self {
        Self {
            edges: (0..=FULL_DOMAIN_END).step_by(COARSE_STEP as usize).collect(),
            last_bucket: LastBucket::Closed,
            label_prefix: String::new(),
        }
    }

    /// The default precision window around the 10-bit boundary:
    /// `[1023, 1025, 1057, ..., 1281]`.
    pub fn fine() -> Self {
        Self {
            edges: PrecisionWindow::default().edges(),
            last_bucket: LastBucket::HalfOpen,
            label_prefix: LEVEL_LABEL_PREFIX.to_string(),
        }
    }

    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }

    pub fn edges(&self) -> &[u32] {
        &self.edges
    }

    pub fn last_bucket(&self) -> LastBucket {
        self.last_bucket
    }

    pub fn bucket_count(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn lower(&self) -> u32 {
        self.edges[0]
    }

    pub fn upper(&self) -> u32 {
        self.edges[self.edges.len() - 1]
    }

    /// Index of the bucket holding `value`, if any.
    pub fn bucket_index(&self, value: f64) -> Option<usize> {
        let lower = self.lower() as f64;
        let upper = self.upper() as f64;

        if value.is_nan() || value < lower || value > upper {
            return None;
        }

        if value == upper {
            return match self.last_bucket {
                LastBucket::Closed => Some(self.bucket_count() - 1),
                LastBucket::HalfOpen => None,
            };
        }

        Some(self.edges.partition_point(|&edge| edge as f64 <= value) - 1)
    }

    /// Label of bucket `index`, naming the integer levels it holds,
    /// e.g. `"Lvl 1023-1024"` for `[1023, 1025)`.
    pub fn label(&self, index: usize) -> String {
        let lower = self.edges[index];
        let upper = self.edges[index + 1];
        let last_level = if index + 1 == self.bucket_count() && self.last_bucket == LastBucket::Closed {
            upper
        } else {
            upper - 1
        };
        format!("{}{}-{}", self.label_prefix, lower, last_level)
    }

    pub fn labels(&self) -> Vec<String> {
        (0..self.bucket_count()).map(|i| self.label(i)).collect()
    }
}

impl fmt::Display for BucketSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let closing = match self.last_bucket {
            LastBucket::Closed => ']',
            LastBucket::HalfOpen => ')',
        };
        write!(
            f,
            "{} buckets over [{}, {}{}",
            self.bucket_count(),
            self.lower(),
            self.upper(),
            closing
        )
    }
}
