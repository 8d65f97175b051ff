//! Sensor grid types

use crate::audit_pipeline::common::error::{AuditError, Result};

/// A decoded single-channel sensor mosaic, stored row-major.
///
/// The grid only guarantees that it is rectangular. Whether it is large enough
/// to analyze is checked by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorGrid {
    width: usize,
    height: usize,
    data: Vec<u16>,
    bits_per_sample: u32,
}

impl SensorGrid {
    /// Bit depth assumed when the decoder does not report one.
    pub const DEFAULT_BITS_PER_SAMPLE: u32 = 14;

    pub fn new(width: usize, height: usize, data: Vec<u16>, bits_per_sample: u32) -> Result<Self> {
        let expected = width * height;
        if data.len() != expected {
            return Err(AuditError::NonRectangular {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
            bits_per_sample,
        })
    }

    /// Builds a grid from explicit rows. Every row must have the same length.
    pub fn from_rows<R: AsRef<[u16]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());

        let mut data = Vec::with_capacity(width * height);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(AuditError::RaggedRow {
                    row: index,
                    expected: width,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Self::new(width, height, data, Self::DEFAULT_BITS_PER_SAMPLE)
    }

    /// A grid where every sample holds `value`.
    pub fn filled(width: usize, height: usize, value: u16) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
            bits_per_sample: Self::DEFAULT_BITS_PER_SAMPLE,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u16] {
        &self.data
    }

    pub fn bits_per_sample(&self) -> u32 {
        self.bits_per_sample
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u16> {
        if row < self.height && col < self.width {
            Some(self.data[row * self.width + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[u16] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u16) {
        self.data[row * self.width + col] = value;
    }
}
