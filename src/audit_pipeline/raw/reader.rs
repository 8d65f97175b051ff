use crate::audit_pipeline::common::error::Result;
use crate::audit_pipeline::raw::types::SensorGrid;

pub trait SensorGridReader {
    fn read_grid(&self, data: &[u8]) -> Result<SensorGrid>;
}
