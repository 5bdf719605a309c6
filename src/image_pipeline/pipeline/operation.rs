//! Named operations that can be chained by the pipeline

use std::fmt::Display;
use std::str::FromStr;

use crate::image_pipeline::common::error::{ProcessingError, Result};
use crate::image_pipeline::ops::kernel::check_side;
use crate::image_pipeline::ops::{
    BlurNormalization, Kernel, adjust_contrast, apply_kernel, box_blur_with, brighten,
    combine_magnitude,
};
use crate::image_pipeline::raster::RasterBuffer;

/// One step of a processing batch
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Brighten {
        factor: f32,
    },
    Contrast {
        factor: f32,
        midpoint: f32,
    },
    BoxBlur {
        size: usize,
        normalization: BlurNormalization,
    },
    Convolve(Kernel),
    /// Apply both kernels to the same input and merge the responses with
    /// `combine_magnitude`.
    EdgeMagnitude {
        horizontal: Kernel,
        vertical: Kernel,
    },
}

impl Operation {
    pub const DEFAULT_MIDPOINT: f32 = 0.5;

    /// Sobel edge map: `sqrt(sobel_x² + sobel_y²)`.
    pub fn sobel_edges() -> Self {
        Self::EdgeMagnitude {
            horizontal: Kernel::sobel_x(),
            vertical: Kernel::sobel_y(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Brighten { .. } => "brighten",
            Self::Contrast { .. } => "contrast",
            Self::BoxBlur { .. } => "box_blur",
            Self::Convolve(_) => "convolve",
            Self::EdgeMagnitude { .. } => "edge_magnitude",
        }
    }

    pub fn apply(&self, image: &RasterBuffer) -> Result<RasterBuffer> {
        match self {
            Self::Brighten { factor } => Ok(brighten(image, *factor)),
            Self::Contrast { factor, midpoint } => Ok(adjust_contrast(image, *factor, *midpoint)),
            Self::BoxBlur {
                size,
                normalization,
            } => box_blur_with(image, *size, *normalization),
            Self::Convolve(kernel) => Ok(apply_kernel(image, kernel)),
            Self::EdgeMagnitude {
                horizontal,
                vertical,
            } => {
                let gx = apply_kernel(image, horizontal);
                let gy = apply_kernel(image, vertical);
                combine_magnitude(&gx, &gy)
            }
        }
    }
}

fn parse_number<T>(operation: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e| {
        ProcessingError::InvalidOperation(format!("{}: {:?}: {}", operation, value.trim(), e))
    })
}

fn required<'a>(operation: &str, args: Option<&'a str>) -> Result<&'a str> {
    args.ok_or_else(|| {
        ProcessingError::InvalidOperation(format!("{} requires an argument", operation))
    })
}

fn no_args(operation: &str, args: Option<&str>) -> Result<()> {
    match args {
        Some(_) => Err(ProcessingError::InvalidOperation(format!(
            "{} takes no argument",
            operation
        ))),
        None => Ok(()),
    }
}

/// Parses `name` or `name=args`:
///
/// `brighten=1.7`, `contrast=2` or `contrast=2,0.5`, `blur=15`,
/// `blur-exact=15`, `sobel-x`, `sobel-y`, `edges`,
/// `kernel=1,2,1;0,0,0;-1,-2,-1`.
impl FromStr for Operation {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, args) = match s.split_once('=') {
            Some((name, args)) => (name.trim(), Some(args)),
            None => (s.trim(), None),
        };

        match name {
            "brighten" => Ok(Self::Brighten {
                factor: parse_number(name, required(name, args)?)?,
            }),
            "contrast" => {
                let args = required(name, args)?;
                let (factor, midpoint) = match args.split_once(',') {
                    Some((f, m)) => (parse_number(name, f)?, parse_number(name, m)?),
                    None => (parse_number(name, args)?, Self::DEFAULT_MIDPOINT),
                };
                Ok(Self::Contrast { factor, midpoint })
            }
            "blur" | "blur-exact" => {
                let size = check_side(parse_number(name, required(name, args)?)?)?;
                let normalization = if name == "blur" {
                    BlurNormalization::NominalArea
                } else {
                    BlurNormalization::ClippedWindow
                };
                Ok(Self::BoxBlur {
                    size,
                    normalization,
                })
            }
            "sobel-x" => no_args(name, args).map(|_| Self::Convolve(Kernel::sobel_x())),
            "sobel-y" => no_args(name, args).map(|_| Self::Convolve(Kernel::sobel_y())),
            "edges" => no_args(name, args).map(|_| Self::sobel_edges()),
            "kernel" => Ok(Self::Convolve(required(name, args)?.parse()?)),
            other => Err(ProcessingError::InvalidOperation(format!(
                "unknown operation {:?}",
                other
            ))),
        }
    }
}
