//! PNG codec backed by the `image` crate.
//!
//! Reading goes through `image::load_from_memory`, so any format the crate is
//! built with (PNG, JPEG) is accepted and converted to RGB. Writing always
//! produces an 8-bit RGB PNG.

use std::io::Write;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::debug;

use crate::image_pipeline::codec::reader::RasterReader;
use crate::image_pipeline::codec::types::CodecConfig;
use crate::image_pipeline::codec::writer::{RGB_CHANNELS, RasterWriter, quantize_rgb8};
use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::raster::RasterBuffer;

pub struct PngCodec;

impl RasterReader for PngCodec {
    fn read_raster(&self, data: &[u8], config: &CodecConfig) -> Result<RasterBuffer> {
        debug!("Decoding image, {} bytes", data.len());
        let gamma = config.gamma_curve()?;

        let rgb = image::load_from_memory(data)
            .map_err(|e| ProcessingError::DecodeError(e.to_string()))?
            .to_rgb32f();

        let width = rgb.width() as usize;
        let height = rgb.height() as usize;
        debug!("Decoded image: {}x{}", width, height);

        let samples = rgb.into_raw().into_iter().map(|v| gamma.decode(v)).collect();
        RasterBuffer::from_samples(height, width, RGB_CHANNELS, samples)
    }
}

impl RasterWriter for PngCodec {
    fn write_raster(
        &self,
        image: &RasterBuffer,
        output: &mut dyn Write,
        config: &CodecConfig,
    ) -> Result<()> {
        debug!("Encoding PNG image: {}x{}", image.width(), image.height());
        let gamma = config.gamma_curve()?;
        let data = quantize_rgb8(image, &gamma)?;

        PngEncoder::new(output)
            .write_image(
                &data,
                image.width() as u32,
                image.height() as u32,
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| ProcessingError::EncodeError(e.to_string()))?;

        debug!("PNG encoding complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_in_memory() {
        let config = CodecConfig::default();
        let samples = (0..4 * 3 * 3).map(|i| i as f32 / 35.0).collect();
        let image = RasterBuffer::from_samples(4, 3, 3, samples).unwrap();

        let mut encoded = Vec::new();
        PngCodec.write_raster(&image, &mut encoded, &config).unwrap();
        let first = PngCodec.read_raster(&encoded, &config).unwrap();
        assert_eq!(first.shape(), image.shape());

        let mut reencoded = Vec::new();
        PngCodec.write_raster(&first, &mut reencoded, &config).unwrap();
        let second = PngCodec.read_raster(&reencoded, &config).unwrap();

        for (a, b) in first.samples().iter().zip(second.samples()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn rejects_non_rgb_buffers() {
        let gray = RasterBuffer::zeros(2, 2, 1).unwrap();
        let mut out = Vec::new();
        let err = PngCodec
            .write_raster(&gray, &mut out, &CodecConfig::default())
            .unwrap_err();
        assert!(matches!(err, ProcessingError::UnsupportedFormat(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn garbage_input_is_a_decode_error() {
        let err = PngCodec
            .read_raster(b"definitely not an image", &CodecConfig::default())
            .unwrap_err();
        assert!(matches!(err, ProcessingError::DecodeError(_)));
    }
}
