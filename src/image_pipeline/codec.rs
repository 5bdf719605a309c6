//! Raster codec module
//!
//! Decoding and encoding between image files and `RasterBuffer`, with the
//! gamma transfer applied at the boundary.

mod auto_codec;
mod png_codec;
mod reader;
mod tiff_codec;
mod writer;
pub mod gamma;
pub mod types;

pub use auto_codec::AutoCodec;
pub use gamma::GammaCurve;
pub use png_codec::PngCodec;
pub use reader::RasterReader;
pub use tiff_codec::TiffCodec;
pub use types::{CodecConfig, CodecConfigBuilder, RasterFormat, TiffCompression};
pub use writer::{RGB_CHANNELS, RasterWriter};
