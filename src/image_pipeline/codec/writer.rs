use std::io::Write;

use crate::image_pipeline::codec::gamma::GammaCurve;
use crate::image_pipeline::codec::types::CodecConfig;
use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::raster::RasterBuffer;

pub const RGB_CHANNELS: usize = 3;

pub trait RasterWriter {
    fn write_raster(
        &self,
        image: &RasterBuffer,
        output: &mut dyn Write,
        config: &CodecConfig,
    ) -> Result<()>;
}

/// Clamp, gamma-encode and quantize an RGB buffer to interleaved 8-bit
/// samples. The source buffer is left untouched.
pub(crate) fn quantize_rgb8(image: &RasterBuffer, gamma: &GammaCurve) -> Result<Vec<u8>> {
    if image.channels() != RGB_CHANNELS {
        return Err(ProcessingError::UnsupportedFormat(format!(
            "expected {} channels for RGB output, got {}",
            RGB_CHANNELS,
            image.channels()
        )));
    }
    Ok(image.samples().iter().map(|&v| gamma.encode_u8(v)).collect())
}
