use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use pixelkit_rs::image_pipeline::{
    CodecConfig, Operation, ProcessingPipeline, RasterFormat, TiffCompression,
};
use pixelkit_rs::logger::{self, error, info};

/// Apply brightness, contrast, blur and kernel operations to a PNG or TIFF image.
#[derive(Parser, Debug)]
#[command(name = "pixelkit")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path (PNG, JPEG or RGB TIFF).
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output image path; `.png`, `.tif` or `.tiff`.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Operation to apply, repeatable and applied in order:
    /// brighten=F, contrast=F[,MID], blur=K, blur-exact=K, sobel-x, sobel-y,
    /// edges, kernel=ROW;ROW;...
    #[arg(long = "op", value_name = "OP")]
    operations: Vec<Operation>,

    /// Gamma exponent used to linearize input and re-encode output.
    #[arg(short, long, default_value_t = 2.2, value_name = "FLOAT")]
    gamma: f32,

    /// TIFF output compression.
    #[arg(long, value_enum, default_value = "none")]
    compression: CompressionArg,

    /// Use the horizontal predictor for compressed TIFF output.
    #[arg(long)]
    predictor: bool,

    /// Reject inputs wider or taller than this.
    #[arg(long, default_value_t = 50000, value_name = "PIXELS")]
    max_dimension: usize,

    /// Skip input dimension checks.
    #[arg(long)]
    no_validate: bool,

    /// Log per-step timings when done.
    #[arg(long)]
    timings: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompressionArg {
    None,
    Lzw,
    Deflate,
}

impl From<CompressionArg> for TiffCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::Deflate => TiffCompression::DeflateBalanced,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.verbose);

    info!("Starting pixelkit...");

    if let Err(err) = run(&args) {
        error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    let format = RasterFormat::from_path(&args.output).context("Unsupported output path")?;

    let config = CodecConfig::builder()
        .gamma(args.gamma)
        .format(format)
        .compression(args.compression.into())
        .predictor(args.predictor.then_some(2))
        .validate_dimensions(!args.no_validate)
        .max_dimension(Some(args.max_dimension))
        .build();
    config.gamma_curve().context("Invalid configuration")?;

    let pipeline = ProcessingPipeline::new(config);

    info!("Output format: {:?}", pipeline.config().format);
    info!(
        "Operations: {}",
        if args.operations.is_empty() {
            "none (re-encode only)".to_string()
        } else {
            args.operations
                .iter()
                .map(Operation::name)
                .collect::<Vec<_>>()
                .join(" -> ")
        }
    );

    let timings = pipeline
        .process_file(&args.input, &args.output, &args.operations)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    if args.timings {
        timings.log_summary();
    }

    info!("Wrote {}", args.output.display());
    Ok(())
}
