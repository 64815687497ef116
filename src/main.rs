//! Cartoonize CLI - turn photos into cartoon-style renderings.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cartoonize::{Config, Pipeline};

/// Turn a photo into a cartoon-style rendering with a `CartoonGAN` generator.
#[derive(Parser, Debug)]
#[command(name = "cartoonize")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output image path.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Generator file; defaults to ./models/ then the user cache.
    #[arg(short, long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Output JPEG quality (1-100).
    #[arg(short, long, default_value = "95", value_name = "INT")]
    quality: u8,

    /// Keep the generator's 224x224 output size instead of resizing back.
    #[arg(long)]
    no_resize: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("cartoonize={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    // Validate input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    // Build configuration
    let config = Config {
        model: args.model.clone(),
        output_quality: args.quality,
        restore_dimensions: !args.no_resize,
    };

    // Create and run pipeline
    let mut pipeline = Pipeline::new(config).context("Failed to initialize pipeline")?;

    pipeline
        .process(&args.input, &args.output)
        .context("Failed to stylize image")?;

    println!(
        "Successfully stylized {} -> {}",
        args.input.display(),
        args.output.display()
    );

    Ok(())
}
