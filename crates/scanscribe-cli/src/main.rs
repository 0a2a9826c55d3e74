//! Command-line interface for scanscribe.

use anyhow::Context;
use clap::Parser;
use scanscribe::{
    Dictionary, DenoiseFilter, OcrMode, PipelineConfig, StrictnessProfile, TesseractBackend, ThresholdPolicy,
    run_batch,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Batch-convert a folder of scanned document images into a CSV transcript.
#[derive(Debug, Parser)]
#[command(name = "scanscribe", version, about)]
struct Cli {
    /// Directory of input images (.png, .tiff, .jpg, .jpeg)
    input: PathBuf,

    /// Output directory for the report (created if absent)
    #[arg(short, long, default_value = "out")]
    output: PathBuf,

    /// Name of the CSV report file
    #[arg(long, default_value = "transcriptions.csv")]
    csv: String,

    /// TOML configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// OCR mode: typed, handwritten, or combined
    #[arg(long, value_parser = parse_mode)]
    mode: Option<OcrMode>,

    /// Page segmentation mode hint (0-10, Tesseract numbering)
    #[arg(long)]
    psm: Option<u8>,

    /// Maximum recognition attempts per image
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Use the strict lexical filter profile
    #[arg(long)]
    strict: bool,

    /// Disable the text density gate
    #[arg(long)]
    no_density_gate: bool,

    /// Minimum foreground-pixel fraction for the density gate
    #[arg(long)]
    density_threshold: Option<f64>,

    /// Upscale factor applied before recognition (e.g. 1.1)
    #[arg(long)]
    resize: Option<f32>,

    /// Contrast boost factor applied after grayscale conversion (e.g. 2.0)
    #[arg(long, value_name = "FACTOR")]
    contrast: Option<f32>,

    /// Use a median filter instead of Gaussian blur for denoising
    #[arg(long)]
    median: bool,

    /// Use a fixed binarization threshold instead of Otsu's method
    #[arg(long, value_name = "LEVEL")]
    fixed_threshold: Option<u8>,

    /// Word list file (one word per line); defaults to the bundled
    /// English list
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Tessdata directory; defaults to TESSDATA_PREFIX or well-known
    /// system locations
    #[arg(long)]
    tessdata: Option<PathBuf>,

    /// Prefix the CSV with a UTF-8 byte-order marker for spreadsheet tools
    #[arg(long)]
    bom: bool,

    /// Write the preprocessed form of the first image for visual QA
    #[arg(long)]
    preview: bool,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_mode(s: &str) -> Result<OcrMode, String> {
    s.parse()
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_config(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(mode) = cli.mode {
        config.ocr_mode = mode;
    }
    if let Some(psm) = cli.psm {
        config.psm = psm;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.max_attempts = max_attempts;
    }
    if cli.strict {
        config.strictness = StrictnessProfile::Strict;
    }
    if cli.no_density_gate {
        config.density_gate = false;
    }
    if let Some(threshold) = cli.density_threshold {
        config.density_threshold = threshold;
    }
    if let Some(factor) = cli.resize {
        config.resize_factor = Some(factor);
    }
    if let Some(factor) = cli.contrast {
        config.contrast_factor = Some(factor);
    }
    if cli.median {
        config.denoise = DenoiseFilter::Median;
    }
    if let Some(level) = cli.fixed_threshold {
        config.threshold = ThresholdPolicy::Fixed;
        config.fixed_threshold = level;
    }
    if cli.bom {
        config.write_bom = true;
    }
    if cli.preview {
        config.save_preview = true;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    tracing::debug!(?config, "effective configuration");

    let dictionary = match &cli.dictionary {
        Some(path) => Dictionary::from_file(path)
            .with_context(|| format!("failed to load dictionary {}", path.display()))?,
        None => Dictionary::bundled(),
    };

    let backend = match &cli.tessdata {
        Some(dir) => TesseractBackend::with_tessdata_dir(dir.to_string_lossy()),
        None => TesseractBackend::new(),
    };

    let report = run_batch(&cli.input, &cli.output, &cli.csv, &config, &backend, &dictionary)
        .context("batch run failed")?;

    println!("Saved transcriptions to {}", report.display());
    Ok(())
}
