//! Square correlation kernels

use std::str::FromStr;

use crate::image_pipeline::common::error::{ProcessingError, Result};

/// A square weight matrix with odd side `2r + 1`, stored row-major.
///
/// The engine applies weights as-is; callers that want a normalized response
/// must pre-scale the kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    side: usize,
    weights: Vec<f32>,
}

pub(crate) fn check_side(side: usize) -> Result<usize> {
    if side == 0 || side % 2 == 0 {
        return Err(ProcessingError::InvalidKernelSize(side));
    }
    Ok(side)
}

/// Number of weights in a kernel of `side`, rejecting sides whose weight
/// storage would not fit in memory.
fn checked_area(side: usize) -> Result<usize> {
    check_side(side)?
        .checked_mul(side)
        .filter(|&area| area <= isize::MAX as usize / std::mem::size_of::<f32>())
        .ok_or(ProcessingError::InvalidKernelSize(side))
}

impl Kernel {
    /// Construct a kernel from row-major weights.
    ///
    /// Returns `InvalidKernelSize` if `side` is zero, even or too large to
    /// store, and
    /// `InvalidKernelShape` if `weights` does not hold `side * side` values.
    pub fn new(side: usize, weights: Vec<f32>) -> Result<Self> {
        if weights.len() != checked_area(side)? {
            return Err(ProcessingError::InvalidKernelShape {
                rows: side,
                cols: weights.len() / side,
            });
        }
        Ok(Self { side, weights })
    }

    pub fn from_rows<const N: usize>(rows: [[f32; N]; N]) -> Result<Self> {
        Self::new(N, rows.iter().flatten().copied().collect())
    }

    /// Construct a kernel from nested rows, rejecting ragged or
    /// non-square input.
    pub fn from_nested(rows: Vec<Vec<f32>>) -> Result<Self> {
        let side = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != side) {
            return Err(ProcessingError::InvalidKernelShape {
                rows: side,
                cols: bad.len(),
            });
        }
        Self::new(side, rows.into_iter().flatten().collect())
    }

    /// Kernel with a single unit weight at the center.
    pub fn identity(side: usize) -> Result<Self> {
        let area = checked_area(side)?;
        let mut weights = vec![0.0; area];
        weights[area / 2] = 1.0;
        Ok(Self { side, weights })
    }

    /// Uniform kernel with every weight `1 / side²`.
    pub fn box_filter(side: usize) -> Result<Self> {
        let area = checked_area(side)?;
        let weight = (side as f32).powi(2).recip();
        Ok(Self {
            side,
            weights: vec![weight; area],
        })
    }

    /// Sobel response to horizontal edges (vertical intensity change).
    pub fn sobel_x() -> Self {
        Self {
            side: 3,
            weights: vec![1.0, 2.0, 1.0, 0.0, 0.0, 0.0, -1.0, -2.0, -1.0],
        }
    }

    /// Sobel response to vertical edges (horizontal intensity change).
    pub fn sobel_y() -> Self {
        Self {
            side: 3,
            weights: vec![1.0, 0.0, -1.0, 2.0, 0.0, -2.0, 1.0, 0.0, -1.0],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Neighbor radius, `side / 2`.
    pub fn radius(&self) -> usize {
        self.side / 2
    }

    /// Weight at kernel row `row`, column `col`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.weights[row * self.side + col]
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

/// Parses rows separated by `;` and weights separated by `,`,
/// e.g. `1,2,1;0,0,0;-1,-2,-1`.
impl FromStr for Kernel {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .split(';')
            .map(|row| {
                row.split(',')
                    .map(|w| {
                        w.trim().parse::<f32>().map_err(|e| {
                            ProcessingError::InvalidParameter {
                                name: "kernel".to_string(),
                                reason: format!("{:?}: {}", w.trim(), e),
                            }
                        })
                    })
                    .collect::<Result<Vec<f32>>>()
            })
            .collect::<Result<Vec<Vec<f32>>>>()?;
        Self::from_nested(rows)
    }
}
