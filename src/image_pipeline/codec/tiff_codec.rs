use std::io::{Cursor, Write};

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder, colortype};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::codec::reader::RasterReader;
use crate::image_pipeline::codec::types::{CodecConfig, TiffCompression};
use crate::image_pipeline::codec::writer::{RGB_CHANNELS, RasterWriter, quantize_rgb8};
use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::raster::RasterBuffer;

/// TIFF codec: reads 8/16-bit RGB, writes 8-bit RGB.
pub struct TiffCodec;

fn decode_error(e: tiff::TiffError) -> ProcessingError {
    ProcessingError::DecodeError(e.to_string())
}

fn encode_error(e: tiff::TiffError) -> ProcessingError {
    ProcessingError::EncodeError(e.to_string())
}

impl RasterReader for TiffCodec {
    fn read_raster(&self, data: &[u8], config: &CodecConfig) -> Result<RasterBuffer> {
        debug!("Decoding TIFF image, {} bytes", data.len());
        let gamma = config.gamma_curve()?;

        let mut decoder = Decoder::new(Cursor::new(data)).map_err(decode_error)?;
        let (width, height) = decoder.dimensions().map_err(decode_error)?;
        let color_type = decoder.colortype().map_err(decode_error)?;
        debug!("TIFF header: {}x{} ({:?})", width, height, color_type);

        let fractions: Vec<f32> = match (color_type, decoder.read_image().map_err(decode_error)?) {
            (ColorType::RGB(8), DecodingResult::U8(values)) => {
                values.iter().map(|&v| f32::from(v) / 255.0).collect()
            }
            (ColorType::RGB(16), DecodingResult::U16(values)) => {
                values.iter().map(|&v| f32::from(v) / 65535.0).collect()
            }
            (other, _) => {
                return Err(ProcessingError::UnsupportedFormat(format!(
                    "TIFF color type {:?}",
                    other
                )));
            }
        };

        let samples = fractions.into_iter().map(|v| gamma.decode(v)).collect();
        RasterBuffer::from_samples(height as usize, width as usize, RGB_CHANNELS, samples)
    }
}

impl RasterWriter for TiffCodec {
    fn write_raster(
        &self,
        image: &RasterBuffer,
        output: &mut dyn Write,
        config: &CodecConfig,
    ) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", image.width(), image.height());
        let gamma = config.gamma_curve()?;
        let data = quantize_rgb8(image, &gamma)?;

        let mut buffer = Vec::new();

        {
            let compression = match config.compression {
                TiffCompression::None => Compression::Uncompressed,
                TiffCompression::Lzw => Compression::Lzw,
                TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
                TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
                TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
            };

            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
                .map_err(encode_error)?
                .with_compression(compression);

            if let Some(predictor_val) = config.predictor {
                let predictor = match predictor_val {
                    2 => Predictor::Horizontal,
                    _ => Predictor::None,
                };
                encoder = encoder.with_predictor(predictor);
            }

            encoder
                .write_image::<colortype::RGB8>(image.width() as u32, image.height() as u32, &data)
                .map_err(encode_error)?;
        }

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
