//! Colour-filter-array subchannel extraction.
//!
//! A Bayer mosaic is split into four half-resolution planes, one per 2x2 tile
//! position. No interpolation happens: each plane holds the raw samples of its
//! site only.

use tracing::debug;

use crate::audit_pipeline::raw::SensorGrid;

/// A row-major 2D plane of floating samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl Plane {
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Keeps the top-left `height` x `width` region. Never grows the plane.
    pub fn crop(&self, height: usize, width: usize) -> Plane {
        let height = height.min(self.height);
        let width = width.min(self.width);
        if height == self.height && width == self.width {
            return self.clone();
        }

        let mut data = Vec::with_capacity(height * width);
        for row in 0..height {
            let start = row * self.width;
            data.extend_from_slice(&self.data[start..start + width]);
        }

        Plane { width, height, data }
    }
}

/// Position of a colour site inside the 2x2 CFA tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfaSite {
    Red,
    GreenRed,
    GreenBlue,
    Blue,
}

impl CfaSite {
    /// (row, column) offset of the site for an RGGB tile.
    pub fn offset(self) -> (usize, usize) {
        match self {
            CfaSite::Red => (0, 0),
            CfaSite::GreenRed => (0, 1),
            CfaSite::GreenBlue => (1, 0),
            CfaSite::Blue => (1, 1),
        }
    }
}

/// The four subchannel planes of a mosaic, cropped to a common shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSet {
    pub r: Plane,
    pub gr: Plane,
    pub gb: Plane,
    pub b: Plane,
}

impl ChannelSet {
    /// Common (height, width) of all four planes.
    pub fn dimensions(&self) -> (usize, usize) {
        self.r.dimensions()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }
}

/// Splits an RGGB mosaic into its R, Gr, Gb and B planes.
pub struct ChannelExtractor;

impl ChannelExtractor {
    /// Samples every second row and column from each site's offset, then crops
    /// all planes to the smallest height and width among them.
    ///
    /// Odd dimensions are truncated, so an H x W grid always yields
    /// `(H / 2, W / 2)` planes. Grids smaller than 2x2 produce empty planes.
    pub fn extract(grid: &SensorGrid) -> ChannelSet {
        let r = Self::sample_site(grid, CfaSite::Red);
        let gr = Self::sample_site(grid, CfaSite::GreenRed);
        let gb = Self::sample_site(grid, CfaSite::GreenBlue);
        let b = Self::sample_site(grid, CfaSite::Blue);

        let min_h = r.height.min(gr.height).min(gb.height).min(b.height);
        let min_w = r.width.min(gr.width).min(gb.width).min(b.width);
        debug!(
            grid_width = grid.width(),
            grid_height = grid.height(),
            plane_width = min_w,
            plane_height = min_h,
            "Extracted CFA subchannels"
        );

        if min_h == 0 || min_w == 0 {
            return ChannelSet {
                r: Plane::empty(),
                gr: Plane::empty(),
                gb: Plane::empty(),
                b: Plane::empty(),
            };
        }

        ChannelSet {
            r: r.crop(min_h, min_w),
            gr: gr.crop(min_h, min_w),
            gb: gb.crop(min_h, min_w),
            b: b.crop(min_h, min_w),
        }
    }

    fn sample_site(grid: &SensorGrid, site: CfaSite) -> Plane {
        let (row_offset, col_offset) = site.offset();
        let height = (grid.height().saturating_sub(row_offset) + 1) / 2;
        let width = (grid.width().saturating_sub(col_offset) + 1) / 2;

        let mut data = Vec::with_capacity(height * width);
        for row in (row_offset..grid.height()).step_by(2) {
            let samples = grid.row(row);
            for col in (col_offset..grid.width()).step_by(2) {
                data.push(samples[col] as f32);
            }
        }

        Plane { width, height, data }
    }
}
