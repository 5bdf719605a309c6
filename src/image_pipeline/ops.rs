//! Image operations module
//!
//! Pointwise transforms, neighborhood filters and image combination. Every
//! operation reads its inputs through shared references and returns a newly
//! allocated buffer.

pub mod combine;
pub mod kernel;
pub mod neighborhood;
pub mod pointwise;

pub use combine::combine_magnitude;
pub use kernel::Kernel;
pub use neighborhood::{BlurNormalization, Window, apply_kernel, box_blur, box_blur_with};
pub use pointwise::{adjust_contrast, brighten};
