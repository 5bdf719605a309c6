use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raster::RasterBuffer;

/// Per-sample magnitude `sqrt(a² + b²)` of two equally shaped images, e.g.
/// two directional gradient responses merged into one edge map.
///
/// Returns `ShapeMismatch` if the shapes differ.
pub fn combine_magnitude(a: &RasterBuffer, b: &RasterBuffer) -> Result<RasterBuffer> {
    debug!(shape = %a.shape(), "combine magnitude");
    a.zip_map(b, |x, y| (x * x + y * y).sqrt())
}
