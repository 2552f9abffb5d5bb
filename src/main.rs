use anyhow::Context;
use clap::{Parser, ValueEnum};
use lookup_ocr::{Recognition, Recognizer, RecognizerConfig, Rect};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "lookup-ocr")]
#[command(about = "Recognize text rendered in known bitmap fonts")]
#[command(version)]
pub struct Args {
    /// Font family directory; repeat to load several, earlier ones win ties
    #[arg(long = "font", required = true)]
    pub fonts: Vec<PathBuf>,

    /// Minimum similarity score in (0, 1]
    #[arg(long, env = "LOOKUP_THRESHOLD", default_value = "0.8")]
    pub threshold: f32,

    /// Number of glyph matching threads
    #[arg(long, env = "LOOKUP_WORKERS", default_value = "1")]
    pub workers: usize,

    /// Ink strength difference (0-255) under which two pixels agree
    #[arg(long, env = "LOOKUP_TOLERANCE", default_value = "64")]
    pub tolerance: u8,

    /// Largest relative width/height ratio difference between a glyph and a
    /// template that is still scored
    #[arg(long, env = "LOOKUP_MAX_ASPECT_DEVIATION", default_value = "0.5")]
    pub max_aspect_deviation: f32,

    /// Only read this rectangle of the image, as X,Y,WIDTH,HEIGHT
    #[arg(long, value_parser = parse_region)]
    pub region: Option<Rect>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Image to recognize
    pub image: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&Args> for RecognizerConfig {
    fn from(args: &Args) -> Self {
        RecognizerConfig::with_threshold(args.threshold)
            .workers(args.workers)
            .tolerance(args.tolerance)
            .max_aspect_deviation(args.max_aspect_deviation)
    }
}

/// JSON output document
#[derive(Serialize)]
struct Report<'a> {
    text: String,
    #[serde(flatten)]
    recognition: &'a Recognition,
    processing_time_ms: u64,
}

fn parse_region(value: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [x, y, width, height] = parts[..] else {
        return Err(format!("expected X,Y,WIDTH,HEIGHT, got {:?}", value));
    };

    let x: i32 = x.parse().map_err(|e| format!("invalid x {:?}: {}", x, e))?;
    let y: i32 = y.parse().map_err(|e| format!("invalid y {:?}: {}", y, e))?;
    let width: u32 = width
        .parse()
        .map_err(|e| format!("invalid width {:?}: {}", width, e))?;
    let height: u32 = height
        .parse()
        .map_err(|e| format!("invalid height {:?}: {}", height, e))?;

    if width == 0 || height == 0 {
        return Err("region width and height must be positive".to_string());
    }
    Ok(Rect::at(x, y).of_size(width, height))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries only the result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting lookup-ocr v{}", env!("CARGO_PKG_VERSION"));

    let mut recognizer = Recognizer::with_config(RecognizerConfig::from(&args))
        .context("Invalid recognizer configuration")?;

    for font in &args.fonts {
        recognizer
            .load_font(font)
            .with_context(|| format!("Failed to load font {}", font.display()))?;
    }

    let image = image::open(&args.image)
        .with_context(|| format!("Failed to decode image {}", args.image.display()))?;

    let start = Instant::now();
    let recognition = recognizer
        .recognize_detailed(&image, args.region)
        .with_context(|| format!("Failed to recognize {}", args.image.display()))?;
    let processing_time_ms = start.elapsed().as_millis() as u64;

    match args.format {
        OutputFormat::Text => println!("{}", recognition.text()),
        OutputFormat::Json => {
            let report = Report {
                text: recognition.text(),
                recognition: &recognition,
                processing_time_ms,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
