//! Per-sample transforms with no spatial dependency.

use tracing::debug;

use crate::image_pipeline::raster::RasterBuffer;

/// Scale every sample by `factor` (< 1 darkens, > 1 brightens).
pub fn brighten(image: &RasterBuffer, factor: f32) -> RasterBuffer {
    debug!(factor, shape = %image.shape(), "brighten");
    image.map(|v| v * factor)
}

/// Push every sample away from (or toward) `midpoint` by `factor`.
///
/// `factor` in `(0, 1)` flattens contrast, above 1 expands it and a negative
/// factor inverts around the midpoint.
pub fn adjust_contrast(image: &RasterBuffer, factor: f32, midpoint: f32) -> RasterBuffer {
    debug!(factor, midpoint, shape = %image.shape(), "adjust contrast");
    image.map(|v| (v - midpoint) * factor + midpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> RasterBuffer {
        let samples = (0..2 * 3 * 3).map(|i| i as f32 / 17.0).collect();
        RasterBuffer::from_samples(2, 3, 3, samples).unwrap()
    }

    #[test]
    fn brighten_by_one_is_identity() {
        let img = sample_image();
        assert_eq!(brighten(&img, 1.0), img);
    }

    #[test]
    fn brighten_scales_samples() {
        let img = sample_image();
        let out = brighten(&img, 0.3);
        assert_eq!(out.shape(), img.shape());
        for (o, i) in out.samples().iter().zip(img.samples()) {
            assert!((o - i * 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn contrast_factor_one_is_identity() {
        let img = sample_image();
        for midpoint in [0.0, 0.5, 0.9, -3.0] {
            let out = adjust_contrast(&img, 1.0, midpoint);
            for (o, i) in out.samples().iter().zip(img.samples()) {
                assert!((o - i).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn midpoint_is_a_fixed_point() {
        let flat = RasterBuffer::from_samples(3, 3, 3, vec![0.4; 27]).unwrap();
        for factor in [0.0, 0.5, 2.0, -1.0] {
            let out = adjust_contrast(&flat, factor, 0.4);
            assert!(out.samples().iter().all(|&v| (v - 0.4).abs() < 1e-6));
        }
    }

    #[test]
    fn contrast_stretch_leaves_unit_range() {
        let img = RasterBuffer::from_samples(1, 2, 1, vec![0.0, 1.0]).unwrap();
        let out = adjust_contrast(&img, 2.0, 0.5);
        assert_eq!(out.samples(), &[-0.5, 1.5]);

        let inverted = adjust_contrast(&img, -1.0, 0.5);
        assert_eq!(inverted.samples(), &[1.0, 0.0]);
    }
}
