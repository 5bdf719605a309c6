//! Gamma transfer between stored and linear sample values

use crate::image_pipeline::common::error::{ProcessingError, Result};

/// Power-law transfer curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaCurve {
    exponent: f32,
}

impl GammaCurve {
    pub const DEFAULT_EXPONENT: f32 = 2.2;

    /// Returns `InvalidParameter` unless `exponent` is finite and positive.
    pub fn new(exponent: f32) -> Result<Self> {
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(ProcessingError::InvalidParameter {
                name: "gamma".to_string(),
                reason: format!("must be a positive finite number, got {}", exponent),
            });
        }
        Ok(Self { exponent })
    }

    pub fn exponent(&self) -> f32 {
        self.exponent
    }

    /// Stored fraction in `[0, 1]` to linear light.
    #[inline]
    pub fn decode(&self, encoded: f32) -> f32 {
        encoded.powf(self.exponent)
    }

    /// Linear value to stored fraction, clamping to `[0, 1]` first.
    #[inline]
    pub fn encode(&self, linear: f32) -> f32 {
        linear.clamp(0.0, 1.0).powf(self.exponent.recip())
    }

    /// Linear value to an 8-bit code value, rounded to nearest.
    #[inline]
    pub fn encode_u8(&self, linear: f32) -> u8 {
        (self.encode(linear) * 255.0).round() as u8
    }
}

impl Default for GammaCurve {
    fn default() -> Self {
        Self {
            exponent: Self::DEFAULT_EXPONENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_exponent() {
        for exponent in [0.0, -2.2, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                GammaCurve::new(exponent),
                Err(ProcessingError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn decode_then_encode_is_identity() {
        let curve = GammaCurve::default();
        for code in 0..=255u8 {
            let linear = curve.decode(f32::from(code) / 255.0);
            assert_eq!(curve.encode_u8(linear), code);
        }
    }

    #[test]
    fn encode_clamps_out_of_range() {
        let curve = GammaCurve::default();
        assert_eq!(curve.encode_u8(-0.7), 0);
        assert_eq!(curve.encode_u8(3.5), 255);
    }

    #[test]
    fn unit_gamma_is_linear() {
        let curve = GammaCurve::new(1.0).unwrap();
        assert_eq!(curve.decode(0.25), 0.25);
        assert_eq!(curve.encode(0.25), 0.25);
    }
}
