//! Sensor grid reading module
//!
//! This module turns encoded capture files into format-agnostic [`SensorGrid`]s.

mod reader;
mod rawloader_reader;
mod tiff_reader;
pub mod types;

pub use reader::SensorGridReader;
pub use rawloader_reader::RawLoaderReader;
pub use tiff_reader::CfaTiffReader;
pub use types::SensorGrid;
