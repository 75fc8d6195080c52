//! tape-targets CLI: detect tape targets in frames and range them in stereo.
//!
//! Results go to stdout as wire messages, one per line; logs go to stderr.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use tape_targets::detect::{CornerStrategy, TapeDetector};
use tape_targets::frame::load_rgb;
use tape_targets::io::TapeDetectConfig;
use tape_targets::messages::Message;
use tape_targets::render::render_overlay;
use tape_targets::stereo::{CalibrationConstants, StereoReconstructor};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "tape-targets")]
#[command(about = "Detect retro-reflective tape targets and estimate their distance")]
#[command(version)]
struct Cli {
    /// Log verbosity on stderr; `RUST_LOG` overrides it in `tracing` builds.
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect targets in a single frame.
    Detect(DetectArgs),

    /// Detect targets in a left/right pair and estimate distance.
    Stereo(StereoArgs),

    /// Run a JSON config and write a report.
    Run {
        /// Path to the config file.
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Input image.
    image: PathBuf,

    /// Write the frame with the debug overlay to this path.
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Also print the outer corners of the target set.
    #[arg(long, value_enum)]
    outer: Option<StrategyArg>,
}

#[derive(Debug, Clone, Args)]
struct StereoArgs {
    left: PathBuf,
    right: PathBuf,

    /// Calibration JSON; built-in constants are used when omitted.
    #[arg(long)]
    calibration: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Direct,
    BestFit,
}

impl From<StrategyArg> for CornerStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Direct => CornerStrategy::Direct,
            StrategyArg::BestFit => CornerStrategy::BestFitLines,
        }
    }
}

#[cfg(feature = "tracing")]
fn init_logging(level: LogLevel) {
    // `log` records are forwarded to the subscriber.
    tape_targets::core::init_tracing(false, level.into());
    let _ = tracing_log::LogTracer::init();
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LogLevel) {
    if let Err(err) = tape_targets::core::init_with_level(level.into()) {
        eprintln!("failed to install logger: {err}");
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Stereo(args) => run_stereo(&args),
        Commands::Run { config } => run_config(&config),
    }
}

fn emit(message: &Message) -> CliResult<()> {
    print!("{}", message.encode()?);
    Ok(())
}

// ── detect ─────────────────────────────────────────────────────────────

fn run_detect(args: &DetectArgs) -> CliResult<()> {
    let frame = load_rgb(&args.image)?;
    log::info!(
        "loaded {} ({}x{})",
        args.image.display(),
        frame.width(),
        frame.height()
    );

    let detector = TapeDetector::default();
    let (result, commands) = detector.detect_with_overlay(&frame);
    log::info!(
        "{} target(s), {} unused candidate(s)",
        result.targets.len(),
        result.unused.len()
    );

    if let Some(path) = &args.overlay {
        let mut canvas = frame;
        render_overlay(&mut canvas, &commands);
        canvas.save(path)?;
        log::info!("overlay written to {}", path.display());
    }

    emit(&Message::results(Some(&result), None))?;

    if let Some(strategy) = args.outer {
        match result.outer_corners(strategy.into()) {
            Some(outer) => println!("{}", serde_json::to_string(&outer)?),
            None => log::warn!("no outer corners for {} target(s)", result.targets.len()),
        }
    }
    Ok(())
}

// ── stereo ─────────────────────────────────────────────────────────────

fn run_stereo(args: &StereoArgs) -> CliResult<()> {
    let calibration = match &args.calibration {
        Some(path) => CalibrationConstants::load_json(path)?,
        None => CalibrationConstants::default(),
    };
    let detector = TapeDetector::default();
    let left = detector.detect(&load_rgb(&args.left)?);
    let right = detector.detect(&load_rgb(&args.right)?);

    let stereo = StereoReconstructor::new(calibration);
    match stereo.reconstruct(&left.targets, &right.targets) {
        Ok(estimate) => {
            log::info!(
                "distance {:.2}, lateral offset {:.1}px",
                estimate.distance,
                estimate.lateral_offset
            );
            emit(&Message::results(Some(&left), Some(&estimate)))
        }
        Err(err) => {
            log::warn!("stereo reconstruction failed: {err}");
            emit(&Message::error(err.to_string()))
        }
    }
}

// ── run ────────────────────────────────────────────────────────────────

fn run_config(config_path: &Path) -> CliResult<()> {
    let cfg = TapeDetectConfig::load_json(config_path)?;
    let report = cfg.run(config_path)?;

    let out = cfg.output_path();
    report.write_json(&out)?;
    log::info!("report written to {}", out.display());

    emit(&report.to_message())?;
    if let Some(err) = &report.error {
        emit(&Message::error(err.clone()))?;
    }
    Ok(())
}
