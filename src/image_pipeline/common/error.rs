use thiserror::Error;

use crate::image_pipeline::raster::Shape;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: height={height}, width={width}, channels={channels}")]
    InvalidDimensions {
        height: usize,
        width: usize,
        channels: usize,
    },

    #[error("Image shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: Shape, actual: Shape },

    #[error("Invalid kernel size {0}: must be a positive odd integer")]
    InvalidKernelSize(usize),

    #[error("Kernel must be square: got {rows} rows, {cols} columns")]
    InvalidKernelShape { rows: usize, cols: usize },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProcessingError>;
