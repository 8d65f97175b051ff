use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::audit_pipeline::common::error::{AuditError, Result};
use crate::audit_pipeline::raw::reader::SensorGridReader;
use crate::audit_pipeline::raw::types::SensorGrid;

/// Reads a grayscale TIFF that stores an undemosaiced Bayer mosaic, such as
/// the output of a RAW-to-TIFF conversion run without debayering.
#[derive(Debug, Clone, Copy, Default)]
pub struct CfaTiffReader {
    /// Bit depth recorded on the grid. TIFF has no white level, so when unset
    /// the depth is the smallest one holding the largest sample.
    pub bits_per_sample: Option<u32>,
}

/// Bits needed to hold `max_sample`, or the default depth for an all-zero mosaic.
fn bits_for_max_sample(max_sample: u16) -> u32 {
    if max_sample == 0 {
        SensorGrid::DEFAULT_BITS_PER_SAMPLE
    } else {
        u16::BITS - max_sample.leading_zeros()
    }
}

impl SensorGridReader for CfaTiffReader {
    fn read_grid(&self, data: &[u8]) -> Result<SensorGrid> {
        debug!("Decoding CFA TIFF, {} bytes", data.len());

        let mut decoder = Decoder::new(Cursor::new(data))
            .map_err(|e| AuditError::DecodeError(e.to_string()))?;

        let colortype = decoder
            .colortype()
            .map_err(|e| AuditError::DecodeError(e.to_string()))?;
        if !matches!(colortype, ColorType::Gray(8) | ColorType::Gray(16)) {
            return Err(AuditError::UnsupportedFormat(format!(
                "expected a single-channel 8 or 16 bit mosaic, got {:?}",
                colortype
            )));
        }

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| AuditError::DecodeError(e.to_string()))?;
        debug!("TIFF mosaic: {}x{} ({:?})", width, height, colortype);

        let samples = match decoder
            .read_image()
            .map_err(|e| AuditError::DecodeError(e.to_string()))?
        {
            DecodingResult::U16(values) => values,
            DecodingResult::U8(values) => values.into_iter().map(u16::from).collect(),
            _ => {
                return Err(AuditError::UnsupportedFormat(
                    "unexpected TIFF sample type".to_string(),
                ));
            }
        };

        let bits_per_sample = match self.bits_per_sample {
            Some(bits) => bits,
            None => bits_for_max_sample(samples.iter().copied().max().unwrap_or(0)),
        };
        debug!("Recorded bits_per_sample: {}", bits_per_sample);

        SensorGrid::new(width as usize, height as usize, samples, bits_per_sample)
    }
}
