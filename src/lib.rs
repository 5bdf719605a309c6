//! Gamma-aware raster processing: brightness, contrast, box blur, square
//! kernel correlation and gradient-magnitude combination.

pub mod image_pipeline;
pub mod logger;
