//! Sensor grid reader backed by the rawloader library.
//!
//! Supports the vendor RAW formats rawloader can decode (CR2, ARW, NEF, DNG, ...).
//! Only the undemosaiced mosaic is kept; no colour processing happens here.

use std::io::Cursor;

use tracing::debug;
use rawloader::RawImageData as RawloaderImageData;
use crate::audit_pipeline::common::error::{Result, AuditError};
use crate::audit_pipeline::raw::types::SensorGrid;
use crate::audit_pipeline::raw::reader::SensorGridReader;

/// Reader that decodes vendor RAW files into a [`SensorGrid`].
pub struct RawLoaderReader;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

impl SensorGridReader for RawLoaderReader {
    /// Decodes a RAW file and returns its visible mosaic.
    ///
    /// The bit depth is derived from the sensor's white level, e.g. a white
    /// level of 16383 (0x3FFF) yields 14 bits. Float sensor data is rescaled
    /// to the integer range implied by that white level.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use raw_precision_audit::audit_pipeline::{RawLoaderReader, SensorGridReader};
    ///
    /// let raw_bytes = std::fs::read("IMG_0001.CR2").unwrap();
    /// let grid = RawLoaderReader.read_grid(&raw_bytes).unwrap();
    /// ```
    fn read_grid(&self, data: &[u8]) -> Result<SensorGrid> {
        debug!("Decoding RAW image, {} bytes", data.len());
        
        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| AuditError::DecodeError(e.to_string()))?;
        
        if decoded.cpp != 1 {
            return Err(AuditError::UnsupportedFormat(format!(
                "expected a single-component CFA mosaic, got {} components per pixel",
                decoded.cpp
            )));
        }
        
        let width = decoded.width;
        let height = decoded.height;
        debug!("Decoded mosaic: {}x{}", width, height);
        
        let max_white_level = decoded.whitelevels.iter().max().copied().unwrap_or(0);
        let bits_per_sample = if max_white_level == 0 {
            SensorGrid::DEFAULT_BITS_PER_SAMPLE
        } else {
            U16_BITS - max_white_level.leading_zeros()
        };
        
        let samples: Vec<u16> = match decoded.data {
            RawloaderImageData::Integer(values) => values,
            // Float data is normalized to 0.0-1.0
            RawloaderImageData::Float(values) => {
                let scale = ((1u32 << bits_per_sample) - 1) as f32;
                values
                    .iter()
                    .map(|&v| (v.clamp(0.0, 1.0) * scale).round() as u16)
                    .collect()
            }
        };
        
        debug!("Calculated bits_per_sample: {} (max white level: {})", bits_per_sample, max_white_level);
        
        SensorGrid::new(width, height, samples, bits_per_sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_input_is_decode_error() {
        let result = RawLoaderReader.read_grid(b"definitely not a raw file");
        assert!(matches!(result, Err(AuditError::DecodeError(_))));
    }
}
