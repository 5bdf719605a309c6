//! Codec configuration types

use std::path::Path;

use crate::image_pipeline::codec::gamma::GammaCurve;
use crate::image_pipeline::common::error::{ProcessingError, Result};

/// File format written by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    /// 8-bit RGB PNG
    Png,
    /// 8-bit RGB TIFF
    Tiff,
}

impl RasterFormat {
    /// Pick a format from the file extension (`png`, `tif`, `tiff`).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "png" => Ok(Self::Png),
            "tif" | "tiff" => Ok(Self::Tiff),
            _ => Err(ProcessingError::UnsupportedFormat(format!(
                "cannot infer output format from {}",
                path.display()
            ))),
        }
    }
}

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

/// Configuration shared by the codecs and the processing pipeline
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Gamma exponent: `linear = encoded^gamma` on read, inverse on write
    pub gamma: f32,
    /// Format used when writing
    pub format: RasterFormat,
    /// Compression method for TIFF output
    pub compression: TiffCompression,
    /// Predictor for TIFF compression (2 for horizontal differencing)
    pub predictor: Option<u16>,
    /// Whether to validate image dimensions after decoding
    pub validate_dimensions: bool,
    /// Largest accepted width or height when validating
    pub max_dimension: Option<usize>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            gamma: GammaCurve::DEFAULT_EXPONENT,
            format: RasterFormat::Png,
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
            max_dimension: Some(50000),
        }
    }
}

impl CodecConfig {
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }

    pub fn gamma_curve(&self) -> Result<GammaCurve> {
        GammaCurve::new(self.gamma)
    }
}

/// Builder for CodecConfig
#[derive(Default)]
pub struct CodecConfigBuilder {
    gamma: Option<f32>,
    format: Option<RasterFormat>,
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl CodecConfigBuilder {
    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn format(mut self, format: RasterFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> CodecConfig {
        let default = CodecConfig::default();
        CodecConfig {
            gamma: self.gamma.unwrap_or(default.gamma),
            format: self.format.unwrap_or(default.format),
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}
