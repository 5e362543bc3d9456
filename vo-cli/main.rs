use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vo_cli::vo_core::FastVariant;
use vo_cli::vo_fast::{DetectorConfig, KeypointOrder};
use vo_cli::{CliError, CliResult, Frame, FrameManifest, VoFrontend, render_keypoints};

#[derive(Parser)]
#[command(
    name = "vo",
    version,
    about = "FAST keypoint extraction for visual-odometry frames"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect keypoints in a single image.
    Detect {
        /// Path to the input image.
        #[arg(long)]
        image: PathBuf,
        /// Write the frame with keypoint markers to this PNG.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write the keypoints as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
        #[command(flatten)]
        detector: DetectorArgs,
    },

    /// Detect keypoints in every frame of a TUM-style sequence.
    Sequence {
        /// Dataset directory containing rgb.txt.
        #[arg(long)]
        dataset: PathBuf,
        /// Directory for marker images and keypoints.json.
        #[arg(long)]
        out_dir: PathBuf,
        /// Process only the first N frames.
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        detector: DetectorArgs,
    },

    /// Print a configuration preset.
    Config {
        /// default, fast12, dense or sparse.
        #[arg(long, default_value = "default")]
        preset: String,
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConfigFormat {
    Json,
    Toml,
}

#[derive(Debug, Clone, Args)]
struct DetectorArgs {
    /// Detector configuration file (.toml or .json).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Segment-test intensity threshold.
    #[arg(long)]
    threshold: Option<u8>,
    /// Contiguous arc length: 9 or 12.
    #[arg(long, value_parser = parse_arc_length)]
    arc_length: Option<FastVariant>,
    /// Border margin in pixels (at least 3).
    #[arg(long)]
    margin: Option<usize>,
    /// Non-maximum suppression window side (odd).
    #[arg(long)]
    window: Option<usize>,
    /// Keep only the strongest N keypoints.
    #[arg(long)]
    max_keypoints: Option<usize>,
    /// Order keypoints by response instead of scan order.
    #[arg(long)]
    ranked: bool,
    /// Worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

fn parse_arc_length(s: &str) -> Result<FastVariant, String> {
    s.parse::<usize>()
        .ok()
        .and_then(FastVariant::from_arc_length)
        .ok_or_else(|| format!("arc length must be 9 or 12, got '{s}'"))
}

impl DetectorArgs {
    /// Config file (or defaults) with command-line overrides applied
    fn to_config(&self) -> CliResult<DetectorConfig> {
        let mut cfg = match &self.config {
            Some(path) => DetectorConfig::load(path)?,
            None => DetectorConfig::new(),
        };
        if let Some(t) = self.threshold {
            cfg.core.threshold = t;
        }
        if let Some(v) = self.arc_length {
            cfg.core.fast_variant = v;
        }
        if let Some(m) = self.margin {
            cfg.core.border_margin = m;
        }
        if let Some(w) = self.window {
            cfg.core.suppression_window = w;
        }
        if let Some(n) = self.max_keypoints {
            cfg.max_keypoints = Some(n);
        }
        if self.ranked {
            cfg.order = KeypointOrder::ByResponse;
        }
        if let Some(n) = self.threads {
            cfg.core.n_threads = n.max(1);
        }
        Ok(cfg)
    }
}

fn build_frontend(args: &DetectorArgs) -> CliResult<VoFrontend> {
    let cfg = args.to_config()?;
    info!("{}", cfg.summary());
    VoFrontend::new(cfg)
}

fn run_detect(
    image: &Path,
    out: Option<&Path>,
    json: Option<&Path>,
    args: &DetectorArgs,
) -> CliResult<()> {
    let frontend = build_frontend(args)?;
    let frame = Frame::open(image)?;
    let report = frontend.detect_frame(&frame, image, None)?;

    println!("Time taken: {:.2} ms", report.elapsed_ms);
    println!("Detected {} keypoints", report.keypoints.len());

    if let Some(path) = out {
        render_keypoints(&frame, &report.keypoints).save(path)?;
        info!(path = %path.display(), "saved marker image");
    }
    if let Some(path) = json {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!(path = %path.display(), "saved keypoints");
    }
    Ok(())
}

fn run_sequence(
    dataset: &Path,
    out_dir: &Path,
    limit: Option<usize>,
    args: &DetectorArgs,
) -> CliResult<()> {
    let frontend = build_frontend(args)?;
    let manifest = FrameManifest::read(dataset)?;
    info!(frames = manifest.len(), dataset = %dataset.display(), "manifest loaded");
    std::fs::create_dir_all(out_dir)?;

    let summary = frontend.process_sequence(&manifest, limit, |frame, report| {
        let stem = report
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{:.6}", report.timestamp.unwrap_or_default()));
        render_keypoints(frame, &report.keypoints)
            .save(out_dir.join(format!("{stem}.png")))?;
        Ok(())
    })?;

    std::fs::write(
        out_dir.join("keypoints.json"),
        serde_json::to_string_pretty(&summary)?,
    )?;
    println!(
        "Processed {} frames ({} skipped), {} keypoints in {:.2} ms",
        summary.processed, summary.skipped, summary.total_keypoints, summary.elapsed_ms
    );
    Ok(())
}

fn run_config(preset: &str, format: ConfigFormat) -> CliResult<()> {
    let cfg = DetectorConfig::preset(preset)
        .ok_or_else(|| CliError::UnknownPreset(preset.to_string()))?;
    let text = match format {
        ConfigFormat::Json => cfg.to_json()?,
        ConfigFormat::Toml => cfg.to_toml()?,
    };
    println!("{text}");
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Detect {
            image,
            out,
            json,
            detector,
        } => run_detect(image, out.as_deref(), json.as_deref(), detector),
        Commands::Sequence {
            dataset,
            out_dir,
            limit,
            detector,
        } => run_sequence(dataset, out_dir, *limit, detector),
        Commands::Config { preset, format } => run_config(preset, *format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
