//! Processing pipeline module
//!
//! Orchestrates decode, a batch of operations and encode, with per-step
//! timing.

mod operation;
mod processing_pipeline;
mod timing;


pub use operation::Operation;
pub use processing_pipeline::ProcessingPipeline;
pub use timing::{PipelineTimings, StepTiming, Timer};
