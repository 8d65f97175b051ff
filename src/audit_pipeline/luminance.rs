//! Luminance composite of the four CFA subchannels.

use crate::audit_pipeline::channels::ChannelSet;

/// Rec. 601 luma weights, scaled to integers so that integer samples are
/// combined without rounding before the final division.
const RED_WEIGHT: f64 = 299.0;
const GREEN_WEIGHT: f64 = 587.0;
const BLUE_WEIGHT: f64 = 114.0;
const WEIGHT_SCALE: f64 = 1000.0;

/// Single-channel brightness plane with the shape of the aligned subchannels.
#[derive(Debug, Clone, PartialEq)]
pub struct LuminancePlane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>,
}

impl LuminancePlane {
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The samples flattened in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.data
    }
}

/// Computes `R*0.299 + ((Gr + Gb) / 2)*0.587 + B*0.114` per position.
pub struct LuminanceCompositor;

impl LuminanceCompositor {
    pub fn compose(channels: &ChannelSet) -> LuminancePlane {
        let (height, width) = channels.dimensions();

        let data = channels
            .r
            .data
            .iter()
            .zip(&channels.gr.data)
            .zip(&channels.gb.data)
            .zip(&channels.b.data)
            .map(|(((&r, &gr), &gb), &b)| luma(r, gr, gb, b))
            .collect();

        LuminancePlane { width, height, data }
    }
}

/// Greens are averaged first and weighted once.
#[inline]
pub fn luma(r: f32, gr: f32, gb: f32, b: f32) -> f64 {
    let green = (gr as f64 + gb as f64) / 2.0;
    (r as f64 * RED_WEIGHT + green * GREEN_WEIGHT + b as f64 * BLUE_WEIGHT) / WEIGHT_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit_pipeline::channels::{ChannelExtractor, Plane};
    use crate::audit_pipeline::raw::SensorGrid;

    fn plane(values: &[f32]) -> Plane {
        Plane {
            width: values.len(),
            height: 1,
            data: values.to_vec(),
        }
    }

    #[test]
    fn test_constant_input_is_preserved() {
        for k in [0u16, 1, 1023, 1024, 1025, 1281, 8191, 16383] {
            let grid = SensorGrid::filled(6, 4, k);
            let lum = LuminanceCompositor::compose(&ChannelExtractor::extract(&grid));
            assert_eq!(lum.dimensions(), (2, 3));
            assert!(lum.values().iter().all(|&v| v == k as f64), "k = {}", k);
        }
    }

    #[test]
    fn test_weights() {
        assert!((luma(1000.0, 0.0, 0.0, 0.0) - 299.0).abs() < 1e-9);
        assert!((luma(0.0, 1000.0, 1000.0, 0.0) - 587.0).abs() < 1e-9);
        assert!((luma(0.0, 0.0, 0.0, 1000.0) - 114.0).abs() < 1e-9);
    }

    #[test]
    fn test_greens_are_averaged() {
        // Gr=2000, Gb=0 averages to 1000 before weighting.
        assert!((luma(0.0, 2000.0, 0.0, 0.0) - 587.0).abs() < 1e-9);
        assert_eq!(luma(0.0, 2000.0, 0.0, 0.0), luma(0.0, 0.0, 2000.0, 0.0));
    }

    #[test]
    fn test_compose_is_elementwise() {
        let channels = ChannelSet {
            r: plane(&[1000.0, 0.0]),
            gr: plane(&[0.0, 1000.0]),
            gb: plane(&[0.0, 1000.0]),
            b: plane(&[0.0, 0.0]),
        };
        let lum = LuminanceCompositor::compose(&channels);
        assert_eq!(lum.dimensions(), (1, 2));
        assert!((lum.data[0] - 299.0).abs() < 1e-9);
        assert!((lum.data[1] - 587.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_channels_give_empty_plane() {
        let lum = LuminanceCompositor::compose(&ChannelExtractor::extract(&SensorGrid::filled(1, 1, 5)));
        assert!(lum.is_empty());
        assert_eq!(lum.dimensions(), (0, 0));
    }
}
