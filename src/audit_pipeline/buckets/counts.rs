use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::audit_pipeline::buckets::spec::BucketSpec;

/// Below this many values counting stays on the calling thread.
const PARALLEL_THRESHOLD: usize = 65_536;
const CHUNK_SIZE: usize = 16_384;

/// One labelled bucket and its tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub lower: u32,
    pub upper: u32,
    pub count: u64,
}

/// Ordered bucket tallies for one spec.
///
/// `outside` counts the values no bucket accepted, so
/// `total() + outside()` always equals the number of values counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    buckets: Vec<Bucket>,
    outside: u64,
}

impl BucketCounts {
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.buckets.iter().map(|b| b.count).collect()
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.buckets.iter().find(|b| b.label == label).map(|b| b.count)
    }

    /// (label, count) pairs in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.buckets.iter().map(|b| (b.label.as_str(), b.count))
    }

    /// Sum over all buckets.
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn outside(&self) -> u64 {
        self.outside
    }
}

/// Tallies values into the buckets of a [`BucketSpec`].
pub struct BucketEngine;

impl BucketEngine {
    /// Counts every value against `spec` with a single linear pass.
    ///
    /// Tallies are integer sums, so the result is identical whether the pass
    /// runs sequentially or split across threads.
    pub fn count(values: &[f64], spec: &BucketSpec) -> BucketCounts {
        let bucket_count = spec.bucket_count();

        let (tallies, outside) = if values.len() >= PARALLEL_THRESHOLD {
            values
                .par_chunks(CHUNK_SIZE)
                .fold(
                    || (vec![0u64; bucket_count], 0u64),
                    |acc, chunk| tally_into(acc, chunk, spec),
                )
                .reduce(
                    || (vec![0u64; bucket_count], 0u64),
                    |(mut a, a_out), (b, b_out)| {
                        for (x, y) in a.iter_mut().zip(b) {
                            *x += y;
                        }
                        (a, a_out + b_out)
                    },
                )
        } else {
            tally_into((vec![0u64; bucket_count], 0), values, spec)
        };

        let edges = spec.edges();
        let buckets = tallies
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bucket {
                label: spec.label(i),
                lower: edges[i],
                upper: edges[i + 1],
                count,
            })
            .collect();

        debug!(values = values.len(), outside, spec = %spec, "Bucketed values");

        BucketCounts { buckets, outside }
    }
}

fn tally_into(
    (mut tallies, mut outside): (Vec<u64>, u64),
    values: &[f64],
    spec: &BucketSpec,
) -> (Vec<u64>, u64) {
    for &value in values {
        match spec.bucket_index(value) {
            Some(index) => tallies[index] += 1,
            None => outside += 1,
        }
    }
    (tallies, outside)
}
