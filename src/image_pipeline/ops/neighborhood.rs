//! Neighborhood operations: box blur and kernel correlation.
//!
//! Both operations share one boundary policy. The window around a pixel is
//! clipped to the image bounds, so pixels near the border see a smaller
//! neighborhood. Nothing is padded, wrapped or mirrored.

use std::ops::Range;

use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::ops::kernel::{Kernel, check_side};
use crate::image_pipeline::raster::RasterBuffer;

/// In-bounds neighbor coordinates around a center pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Contributing rows, half-open
    pub rows: Range<usize>,
    /// Contributing columns, half-open
    pub cols: Range<usize>,
}

impl Window {
    /// Rows `max(0, row - r) ..= min(height - 1, row + r)` and likewise for
    /// columns.
    #[inline]
    pub fn around(row: usize, col: usize, radius: usize, height: usize, width: usize) -> Self {
        debug_assert!(row < height && col < width);
        Self {
            rows: row.saturating_sub(radius)..row.saturating_add(radius).min(height - 1) + 1,
            cols: col.saturating_sub(radius)..col.saturating_add(radius).min(width - 1) + 1,
        }
    }

    /// Number of contributing pixels.
    pub fn len(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    /// True when no pixel contributes. Never the case for a window built by
    /// [`Window::around`], which always contains its center.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> {
        let cols = self.cols.clone();
        self.rows
            .clone()
            .flat_map(move |row| cols.clone().map(move |col| (row, col)))
    }
}

/// Divisor used by the box blur.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlurNormalization {
    /// Divide by the nominal `k²` area. Border pixels come out darker because
    /// their clipped window holds fewer samples.
    #[default]
    NominalArea,
    /// Divide by the number of pixels actually in the clipped window.
    ClippedWindow,
}

/// Box blur with nominal-area normalization.
///
/// `kernel_size` must be a positive odd integer.
pub fn box_blur(image: &RasterBuffer, kernel_size: usize) -> Result<RasterBuffer> {
    box_blur_with(image, kernel_size, BlurNormalization::NominalArea)
}

/// Box blur with an explicit divisor policy.
///
/// Each output sample is the sum of its clipped window. `normalization`
/// picks the divisor: [`BlurNormalization::NominalArea`] divides by
/// `kernel_size²` whatever the window holds, while
/// [`BlurNormalization::ClippedWindow`] divides by the number of in-bounds
/// pixels. `kernel_size` must be a positive odd integer. It may exceed the
/// image in either direction.
pub fn box_blur_with(
    image: &RasterBuffer,
    kernel_size: usize,
    normalization: BlurNormalization,
) -> Result<RasterBuffer> {
    check_side(kernel_size)?;
    let radius = kernel_size / 2;
    let shape = image.shape();
    let channels = shape.channels;
    let nominal = (kernel_size as f32).powi(2);

    debug!(kernel_size, ?normalization, %shape, "box blur");

    Ok(RasterBuffer::from_rows(shape, |row, out| {
        for (col, px) in out.chunks_exact_mut(channels).enumerate() {
            let window = Window::around(row, col, radius, shape.height, shape.width);
            for (r, c) in window.iter() {
                for (acc, &v) in px.iter_mut().zip(image.pixel(r, c)) {
                    *acc += v;
                }
            }
            let divisor = match normalization {
                BlurNormalization::NominalArea => nominal,
                BlurNormalization::ClippedWindow => window.len() as f32,
            };
            for acc in px.iter_mut() {
                *acc /= divisor;
            }
        }
    }))
}

/// Correlate `image` with `kernel` over the clipped window.
///
/// The neighbor at `(r, c)` is weighted by `kernel.at(r + radius - row,
/// c + radius - col)`, i.e. the kernel is not flipped. Results are not
/// normalized or clamped.
pub fn apply_kernel(image: &RasterBuffer, kernel: &Kernel) -> RasterBuffer {
    let radius = kernel.radius();
    let shape = image.shape();
    let channels = shape.channels;

    debug!(side = kernel.side(), %shape, "apply kernel");

    RasterBuffer::from_rows(shape, |row, out| {
        for (col, px) in out.chunks_exact_mut(channels).enumerate() {
            let window = Window::around(row, col, radius, shape.height, shape.width);
            for (r, c) in window.iter() {
                let weight = kernel.at(r + radius - row, c + radius - col);
                for (acc, &v) in px.iter_mut().zip(image.pixel(r, c)) {
                    *acc += v * weight;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::error::ProcessingError;

    fn ramp(height: usize, width: usize, channels: usize) -> RasterBuffer {
        let samples = (0..height * width * channels)
            .map(|i| (i % 17) as f32 / 16.0)
            .collect();
        RasterBuffer::from_samples(height, width, channels, samples).unwrap()
    }

    fn assert_close(a: &RasterBuffer, b: &RasterBuffer) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.samples().iter().zip(b.samples()) {
            assert!((x - y).abs() < 1e-5, "{x} != {y}");
        }
    }

    #[test]
    fn window_is_clipped_at_borders() {
        let corner = Window::around(0, 0, 1, 5, 5);
        assert_eq!(corner.rows, 0..2);
        assert_eq!(corner.cols, 0..2);
        assert_eq!(corner.len(), 4);

        let center = Window::around(2, 2, 1, 5, 5);
        assert_eq!(center.len(), 9);

        let far = Window::around(4, 1, 2, 5, 3);
        assert_eq!(far.rows, 2..5);
        assert_eq!(far.cols, 0..3);

        let coords: Vec<_> = corner.iter().collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn radius_zero_window_is_the_pixel() {
        let w = Window::around(3, 1, 0, 4, 4);
        assert_eq!(w.iter().collect::<Vec<_>>(), vec![(3, 1)]);
    }

    #[test]
    fn box_blur_under_averages_borders() {
        let ones = RasterBuffer::from_samples(3, 3, 1, vec![1.0; 9]).unwrap();
        let out = box_blur(&ones, 3).unwrap();

        assert!((out.get(1, 1, 0) - 1.0).abs() < 1e-6);
        assert!((out.get(0, 0, 0) - 4.0 / 9.0).abs() < 1e-6);
        assert!((out.get(0, 1, 0) - 6.0 / 9.0).abs() < 1e-6);
        assert!((out.get(2, 2, 0) - 4.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn clipped_window_keeps_constant_image_constant() {
        let flat = RasterBuffer::from_samples(4, 5, 3, vec![0.25; 60]).unwrap();
        let out = box_blur_with(&flat, 5, BlurNormalization::ClippedWindow).unwrap();
        assert_close(&out, &flat);
    }

    #[test]
    fn box_blur_rejects_invalid_size() {
        let img = ramp(4, 4, 3);
        assert!(matches!(
            box_blur(&img, 4),
            Err(ProcessingError::InvalidKernelSize(4))
        ));
        assert!(matches!(
            box_blur(&img, 0),
            Err(ProcessingError::InvalidKernelSize(0))
        ));
    }

    #[test]
    fn box_blur_of_size_one_is_identity() {
        let img = ramp(3, 4, 3);
        assert_close(&box_blur(&img, 1).unwrap(), &img);
    }

    #[test]
    fn box_blur_matches_uniform_kernel() {
        let img = ramp(6, 7, 3);
        let blurred = box_blur(&img, 3).unwrap();
        let convolved = apply_kernel(&img, &Kernel::box_filter(3).unwrap());
        assert_close(&blurred, &convolved);
    }

    #[test]
    fn kernel_larger_than_image() {
        let ones = RasterBuffer::from_samples(2, 2, 1, vec![1.0; 4]).unwrap();
        let out = box_blur(&ones, 15).unwrap();
        for &v in out.samples() {
            assert!((v - 4.0 / 225.0).abs() < 1e-6);
        }
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn huge_kernel_size_does_not_overflow() {
        let size = 4_294_967_297;
        let ones = RasterBuffer::from_samples(2, 2, 3, vec![1.0; 12]).unwrap();

        let out = box_blur(&ones, size).unwrap();
        let expected = 4.0 / (size as f32).powi(2);
        assert_eq!(out.shape(), ones.shape());
        for &v in out.samples() {
            assert!(v.is_finite() && v > 0.0);
            assert!((v - expected).abs() <= expected * 1e-5);
        }

        let exact = box_blur_with(&ones, size, BlurNormalization::ClippedWindow).unwrap();
        assert_close(&exact, &ones);
    }

    #[test]
    fn window_radius_past_usize_range_is_clipped() {
        let w = Window::around(2, 1, usize::MAX / 2, 4, 3);
        assert_eq!(w.rows, 0..4);
        assert_eq!(w.cols, 0..3);
        assert!(!w.is_empty());
    }

    #[test]
    fn identity_kernel_reproduces_source() {
        let img = ramp(5, 4, 3);
        let out = apply_kernel(&img, &Kernel::identity(3).unwrap());
        assert_eq!(out, img);
    }

    #[test]
    fn kernel_is_not_flipped() {
        // Only the weight above the center is set, so each output pixel
        // takes the value of the pixel one row up.
        let kernel = Kernel::from_rows([[0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
        let img = ramp(4, 3, 1);
        let out = apply_kernel(&img, &kernel);

        for col in 0..3 {
            assert_eq!(out.get(0, col, 0), 0.0);
            for row in 1..4 {
                assert_eq!(out.get(row, col, 0), img.get(row - 1, col, 0));
            }
        }
    }

    #[test]
    fn sobel_responds_to_vertical_edge() {
        // Left half dark, right half bright.
        let mut img = RasterBuffer::zeros(5, 6, 1).unwrap();
        for row in 0..5 {
            for col in 3..6 {
                img.set(row, col, 0, 1.0);
            }
        }

        let gx = apply_kernel(&img, &Kernel::sobel_x());
        let gy = apply_kernel(&img, &Kernel::sobel_y());

        for row in 1..4 {
            for col in 0..6 {
                assert!(gx.get(row, col, 0).abs() < 1e-6);
            }
            assert!((gy.get(row, 2, 0) + 4.0).abs() < 1e-6);
            assert!((gy.get(row, 3, 0) + 4.0).abs() < 1e-6);
            assert_eq!(gy.get(row, 0, 0), 0.0);
        }
    }

    #[test]
    fn neighborhood_ops_preserve_shape() {
        let img = ramp(3, 8, 3);
        assert_eq!(box_blur(&img, 5).unwrap().shape(), img.shape());
        assert_eq!(apply_kernel(&img, &Kernel::sobel_x()).shape(), img.shape());
    }
}
