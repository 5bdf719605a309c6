use std::io::Write;

use tracing::debug;

use crate::image_pipeline::codec::png_codec::PngCodec;
use crate::image_pipeline::codec::reader::RasterReader;
use crate::image_pipeline::codec::tiff_codec::TiffCodec;
use crate::image_pipeline::codec::types::{CodecConfig, RasterFormat};
use crate::image_pipeline::codec::writer::RasterWriter;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::RasterBuffer;

const TIFF_LE_MAGIC: &[u8] = b"II*\0";
const TIFF_BE_MAGIC: &[u8] = b"MM\0*";

/// Dispatches to the TIFF or PNG codec.
///
/// Reads sniff the TIFF byte-order header; everything else goes through the
/// `image` crate. Writes follow `CodecConfig::format`.
pub struct AutoCodec;

fn is_tiff(data: &[u8]) -> bool {
    data.starts_with(TIFF_LE_MAGIC) || data.starts_with(TIFF_BE_MAGIC)
}

impl RasterReader for AutoCodec {
    fn read_raster(&self, data: &[u8], config: &CodecConfig) -> Result<RasterBuffer> {
        if is_tiff(data) {
            debug!("Detected TIFF input");
            TiffCodec.read_raster(data, config)
        } else {
            PngCodec.read_raster(data, config)
        }
    }
}

impl RasterWriter for AutoCodec {
    fn write_raster(
        &self,
        image: &RasterBuffer,
        output: &mut dyn Write,
        config: &CodecConfig,
    ) -> Result<()> {
        match config.format {
            RasterFormat::Png => PngCodec.write_raster(image, output, config),
            RasterFormat::Tiff => TiffCodec.write_raster(image, output, config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_tiff_headers() {
        assert!(is_tiff(b"II*\0\x08\0\0\0"));
        assert!(is_tiff(b"MM\0*\0\0\0\x08"));
        assert!(!is_tiff(b"\x89PNG\r\n\x1a\n"));
        assert!(!is_tiff(b"II"));
    }

    #[test]
    fn writes_and_reads_both_formats() {
        let image = RasterBuffer::from_samples(2, 2, 3, vec![0.5; 12]).unwrap();
        for format in [RasterFormat::Png, RasterFormat::Tiff] {
            let config = CodecConfig::builder().format(format).build();
            let mut encoded = Vec::new();
            AutoCodec.write_raster(&image, &mut encoded, &config).unwrap();
            assert_eq!(is_tiff(&encoded), format == RasterFormat::Tiff);

            let decoded = AutoCodec.read_raster(&encoded, &config).unwrap();
            assert_eq!(decoded.shape(), image.shape());
            for &v in decoded.samples() {
                assert!((v - 0.5).abs() < 0.01);
            }
        }
    }
}
