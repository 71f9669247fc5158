use anyhow::{Context, anyhow};
use clap::Parser;
use std::path::PathBuf;

use boxsight::{
    ContourLoader, DetectionSettings, DisplaySurface, FitHeight, FixedSurface, ImageDimensions,
    ImageSource, NaturalSize, Orchestrator,
};

#[derive(Parser)]
#[command(name = "boxsight")]
#[command(about = "Detect objects in an image and print overlay boxes in display pixels")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Settings file (TOML); falls back to $BOXSIGHT_CONFIG
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of detections to report
    #[arg(long, value_name = "N")]
    max_results: Option<usize>,

    /// Rendered size of the image, e.g. 640x480
    #[arg(long, value_name = "WxH", value_parser = parse_dimensions, conflicts_with = "fit_height")]
    display: Option<ImageDimensions>,

    /// Render at this height, keeping the aspect ratio
    #[arg(long, value_name = "PIXELS")]
    fit_height: Option<f32>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_dimensions(value: &str) -> Result<ImageDimensions, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width: f32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{width}'"))?;
    let height: f32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{height}'"))?;
    Ok(ImageDimensions::new(width, height))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut settings =
        DetectionSettings::load(args.config.as_deref()).context("failed to load settings")?;
    if let Some(max_results) = args.max_results {
        settings.max_results = max_results;
        settings.validate()?;
    }

    let source = ImageSource::Path(args.image_path.clone());
    match (args.display, args.fit_height) {
        (Some(size), _) => run(FixedSurface(size), settings, source).await,
        (None, Some(height)) if height > 0.0 => run(FitHeight { height }, settings, source).await,
        (None, Some(height)) => Err(anyhow!("--fit-height must be positive, got {height}")),
        (None, None) => run(NaturalSize, settings, source).await,
    }
}

async fn run<S: DisplaySurface>(
    surface: S,
    settings: DetectionSettings,
    source: ImageSource,
) -> anyhow::Result<()> {
    let mut orchestrator = Orchestrator::new(ContourLoader, surface, settings);
    orchestrator.detect_now(source).await;

    let state = orchestrator.state();
    let detections = state.detections();

    println!("[{}]", state.button_label());
    if let Some(size) = orchestrator.display_size() {
        println!("Display size: {:.0}x{:.0}", size.width, size.height);
    }

    if detections.is_empty() {
        println!("No objects detected.");
        return Ok(());
    }

    println!(
        "Detected {} object(s) (limit {}):",
        detections.len(),
        orchestrator.settings().max_results
    );
    for detection in detections {
        let bbox = detection.bbox;
        println!(
            "  {} at ({:.1}, {:.1}) size {:.1}x{:.1}",
            detection.caption(),
            bbox.x,
            bbox.y,
            bbox.width,
            bbox.height
        );
    }

    Ok(())
}
