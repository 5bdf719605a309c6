//! Image processing pipeline module
//!
//! This module provides a structured approach to raster image processing,
//! with separate modules for the in-memory raster, file codecs, the
//! pointwise/neighborhood operations and pipeline orchestration.

pub mod codec;
pub mod common;
pub mod ops;
pub mod pipeline;
pub mod raster;

pub use common::{ProcessingError, Result};

pub use raster::{RasterBuffer, Shape};

pub use codec::{
    AutoCodec,
    CodecConfig,
    CodecConfigBuilder,
    GammaCurve,
    PngCodec,
    RasterFormat,
    RasterReader,
    RasterWriter,
    TiffCodec,
    TiffCompression,
};

pub use ops::{
    BlurNormalization,
    Kernel,
    Window,
    adjust_contrast,
    apply_kernel,
    box_blur,
    box_blur_with,
    brighten,
    combine_magnitude,
};

pub use pipeline::{
    Operation,
    PipelineTimings,
    ProcessingPipeline,
};
