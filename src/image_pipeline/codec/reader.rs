use crate::image_pipeline::codec::types::CodecConfig;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::RasterBuffer;

pub trait RasterReader {
    fn read_raster(&self, data: &[u8], config: &CodecConfig) -> Result<RasterBuffer>;
}
