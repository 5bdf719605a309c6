//! Raster buffer module
//!
//! Owned floating-point image storage addressed as `[row][col][channel]`.

pub mod types;

pub use types::{RasterBuffer, Shape};
