//! Raster buffer types

use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::image_pipeline::common::error::{ProcessingError, Result};

/// Dimensions of a raster buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Number of rows
    pub height: usize,
    /// Number of columns
    pub width: usize,
    /// Samples per pixel (3 for RGB)
    pub channels: usize,
}

impl Shape {
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }

    /// Total number of samples in a buffer of this shape.
    ///
    /// Saturates at `usize::MAX`; shapes held by a `RasterBuffer` never do.
    pub fn sample_count(&self) -> usize {
        self.checked_sample_count().unwrap_or(usize::MAX)
    }

    /// Total number of samples, or `None` if it overflows `usize`.
    pub fn checked_sample_count(&self) -> Option<usize> {
        self.height
            .checked_mul(self.width)?
            .checked_mul(self.channels)
    }

    /// Number of samples in one row.
    pub fn row_len(&self) -> usize {
        self.width * self.channels
    }

    /// Reject empty shapes and shapes whose `f32` storage could not be
    /// allocated.
    fn validate(self) -> Result<Self> {
        let max_samples = isize::MAX as usize / std::mem::size_of::<f32>();
        match self.checked_sample_count() {
            Some(count) if count > 0 && count <= max_samples => Ok(self),
            _ => Err(ProcessingError::InvalidDimensions {
                height: self.height,
                width: self.width,
                channels: self.channels,
            }),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.height, self.width, self.channels)
    }
}

/// Dense image of `f32` samples, row-major with interleaved channels.
///
/// Samples are nominally in `[0, 1]` but nothing here enforces it; operations
/// such as contrast stretching or edge kernels may leave that range and the
/// encoder clamps on write.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBuffer {
    shape: Shape,
    samples: Vec<f32>,
}

impl RasterBuffer {
    /// Create a zero-filled buffer.
    ///
    /// Returns `InvalidDimensions` if any dimension is zero or the sample
    /// count overflows.
    pub fn zeros(height: usize, width: usize, channels: usize) -> Result<Self> {
        let shape = Shape::new(height, width, channels).validate()?;
        Ok(Self::zeroed(shape))
    }

    /// Wrap existing samples laid out as `[row][col][channel]`.
    ///
    /// Returns `InvalidDimensions` if any dimension is zero or the sample
    /// count does not match the shape.
    pub fn from_samples(
        height: usize,
        width: usize,
        channels: usize,
        samples: Vec<f32>,
    ) -> Result<Self> {
        let shape = Shape::new(height, width, channels).validate()?;
        if samples.len() != shape.sample_count() {
            return Err(ProcessingError::InvalidDimensions {
                height,
                width,
                channels,
            });
        }
        Ok(Self { shape, samples })
    }

    pub(crate) fn zeroed(shape: Shape) -> Self {
        Self {
            shape,
            samples: vec![0.0; shape.sample_count()],
        }
    }

    /// Allocate a buffer of `shape` and fill it one row at a time.
    ///
    /// `fill` receives the row index and that row's zeroed samples. Each row
    /// is handed out exactly once; with the `parallel` feature rows are
    /// filled on the rayon pool.
    pub(crate) fn from_rows<F>(shape: Shape, fill: F) -> Self
    where
        F: Fn(usize, &mut [f32]) + Send + Sync,
    {
        let mut out = Self::zeroed(shape);
        let row_len = shape.row_len();

        #[cfg(feature = "parallel")]
        out.samples
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(row, samples)| fill(row, samples));

        #[cfg(not(feature = "parallel"))]
        out.samples
            .chunks_mut(row_len)
            .enumerate()
            .for_each(|(row, samples)| fill(row, samples));

        out
    }

    pub fn height(&self) -> usize {
        self.shape.height
    }

    pub fn width(&self) -> usize {
        self.shape.width
    }

    pub fn channels(&self) -> usize {
        self.shape.channels
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    fn idx(&self, row: usize, col: usize, channel: usize) -> usize {
        (row * self.shape.width + col) * self.shape.channels + channel
    }

    /// Sample at `(row, col, channel)`.
    ///
    /// # Panics
    ///
    /// If the coordinates are out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize, channel: usize) -> f32 {
        self.samples[self.idx(row, col, channel)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: f32) {
        let i = self.idx(row, col, channel);
        self.samples[i] = value;
    }

    /// All channels of the pixel at `(row, col)`.
    #[inline]
    pub fn pixel(&self, row: usize, col: usize) -> &[f32] {
        let start = self.idx(row, col, 0);
        &self.samples[start..start + self.shape.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, row: usize, col: usize) -> &mut [f32] {
        let start = self.idx(row, col, 0);
        let end = start + self.shape.channels;
        &mut self.samples[start..end]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f32] {
        let len = self.shape.row_len();
        &self.samples[row * len..(row + 1) * len]
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// New buffer with `f` applied to every sample.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        let samples = self.samples.par_iter().map(|&v| f(v)).collect();
        #[cfg(not(feature = "parallel"))]
        let samples = self.samples.iter().map(|&v| f(v)).collect();

        Self {
            shape: self.shape,
            samples,
        }
    }

    /// New buffer with `f` applied to corresponding samples of `self` and
    /// `other`.
    ///
    /// Returns `ShapeMismatch` if the shapes differ.
    pub fn zip_map<F>(&self, other: &RasterBuffer, f: F) -> Result<Self>
    where
        F: Fn(f32, f32) -> f32 + Send + Sync,
    {
        if self.shape != other.shape {
            return Err(ProcessingError::ShapeMismatch {
                expected: self.shape,
                actual: other.shape,
            });
        }

        #[cfg(feature = "parallel")]
        let samples = self
            .samples
            .par_iter()
            .zip(other.samples.par_iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let samples = self
            .samples
            .iter()
            .zip(other.samples.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();

        Ok(Self {
            shape: self.shape,
            samples,
        })
    }
}
