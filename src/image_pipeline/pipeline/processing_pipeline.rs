use std::io::Write;
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    codec::{AutoCodec, CodecConfig, RasterReader, RasterWriter},
    common::error::{ProcessingError, Result},
    pipeline::{Operation, PipelineTimings, Timer},
    raster::RasterBuffer,
};

/// Decode, run a batch of operations, encode.
///
/// Each operation consumes the previous result and allocates a new buffer;
/// the decoded input is never modified.
pub struct ProcessingPipeline<R: RasterReader, W: RasterWriter> {
    reader: R,
    writer: W,
    config: CodecConfig,
}

impl ProcessingPipeline<AutoCodec, AutoCodec> {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            reader: AutoCodec,
            writer: AutoCodec,
            config,
        }
    }
}

impl<R: RasterReader, W: RasterWriter> ProcessingPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: CodecConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, image: &RasterBuffer) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        // RasterBuffer already rules out empty images; only the size cap is
        // configurable.
        if let Some(max) = self.config.max_dimension {
            if image.width() > max || image.height() > max {
                warn!(
                    "Image dimensions {}x{} exceed maximum {}",
                    image.width(),
                    image.height(),
                    max
                );
                return Err(ProcessingError::InvalidDimensions {
                    height: image.height(),
                    width: image.width(),
                    channels: image.channels(),
                });
            }
        }

        Ok(())
    }

    fn apply_timed(
        &self,
        image: &RasterBuffer,
        operations: &[Operation],
        timings: &mut PipelineTimings,
    ) -> Result<RasterBuffer> {
        let mut current: Option<RasterBuffer> = None;

        for operation in operations {
            let _span = tracing::info_span!("operation", name = operation.name()).entered();
            let timer = Timer::start(operation.name());
            let next = operation.apply(current.as_ref().unwrap_or(image))?;
            timings.record(timer);
            current = Some(next);
        }

        Ok(current.unwrap_or_else(|| image.clone()))
    }

    /// Run `operations` in order on an in-memory image.
    #[instrument(skip(self, image, operations), fields(shape = %image.shape(), operations = operations.len()))]
    pub fn apply(&self, image: &RasterBuffer, operations: &[Operation]) -> Result<RasterBuffer> {
        self.apply_timed(image, operations, &mut PipelineTimings::new())
    }

    #[instrument(skip(self, input_data, operations, output), fields(input_size = input_data.len()))]
    pub fn process(
        &self,
        input_data: &[u8],
        operations: &[Operation],
        output: &mut dyn Write,
    ) -> Result<PipelineTimings> {
        let mut timings = PipelineTimings::new();
        info!("Starting processing of {} operation(s)", operations.len());

        let timer = Timer::start("decode");
        let image = {
            let _span = tracing::info_span!("decode").entered();
            self.reader.read_raster(input_data, &self.config)?
        };
        timings.record(timer);

        let timer = Timer::start("validate_dimensions");
        {
            let _span = tracing::info_span!("validate_dimensions",
                width = image.width(),
                height = image.height()
            ).entered();
            self.validate_dimensions(&image)?;
        }
        timings.record(timer);

        let result = self.apply_timed(&image, operations, &mut timings)?;

        let timer = Timer::start("encode");
        {
            let _span = tracing::info_span!("encode", format = ?self.config.format).entered();
            self.writer.write_raster(&result, output, &self.config)?;
        }
        timings.record(timer);

        info!(
            width = result.width(),
            height = result.height(),
            "Processing complete in {:.3}ms",
            timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok(timings)
    }

    /// Read `input_path`, process it and write the encoded result to
    /// `output_path`. Nothing is written if any step fails.
    #[instrument(skip(self, input_path, output_path, operations))]
    pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        operations: &[Operation],
    ) -> Result<PipelineTimings> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Processing file"
        );

        let mut timings = PipelineTimings::new();

        let timer = Timer::start("read_input_file");
        let input_data = std::fs::read(input_path).map_err(|e| {
            ProcessingError::InputReadError(format!("{}: {}", input_path.display(), e))
        })?;
        timings.record(timer);

        let mut encoded = Vec::new();
        let processing_timings = self.process(&input_data, operations, &mut encoded)?;
        for step in processing_timings.steps() {
            timings.add_step(step.name.clone(), step.duration);
        }

        let timer = Timer::start("write_output_file");
        std::fs::write(output_path, &encoded).map_err(|e| {
            ProcessingError::OutputWriteError(format!("{}: {}", output_path.display(), e))
        })?;
        timings.record(timer);

        Ok(timings)
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CodecConfig) {
        self.config = config;
    }
}
