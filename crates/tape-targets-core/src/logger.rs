//! Stderr logging for the CLI and tests.
//!
//! Records from the `tape_targets*` crates are shown at the requested level;
//! everything else (decoders, `imageproc`) only from `warn` up, so a `trace`
//! run stays readable. Lines look like `[  0.012s DEBUG detect::resolver] ...`.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const WORKSPACE_PREFIX: &str = "tape_targets";

struct FrameLogger {
    level: LevelFilter,
    started: Instant,
}

impl FrameLogger {
    fn threshold(&self, target: &str) -> LevelFilter {
        if target.starts_with(WORKSPACE_PREFIX) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        }
    }
}

/// `tape_targets_detect::resolver::secondary` -> `detect::resolver::secondary`.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix(WORKSPACE_PREFIX)
        .map(|rest| rest.trim_start_matches(['_', ':']))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(target)
}

impl Log for FrameLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.threshold(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = match record.level() {
            Level::Error | Level::Warn => writeln!(
                stderr,
                "[{:8.3}s {:>5} {}] {} ({}:{})",
                elapsed,
                record.level(),
                short_target(record.target()),
                record.args(),
                record.file().unwrap_or("?"),
                record.line().unwrap_or(0)
            ),
            _ => writeln!(
                stderr,
                "[{:8.3}s {:>5} {}] {}",
                elapsed,
                record.level(),
                short_target(record.target()),
                record.args()
            ),
        };
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<FrameLogger> = OnceLock::new();

/// Install the stderr logger with `level` for the workspace crates.
///
/// Only the first call installs; later calls return `Ok(())` and keep the
/// first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| FrameLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise the workspace crates log at `level`
/// and dependencies at `warn` or quieter, as with [`init_with_level`]. Span
/// close events carry per-frame timings.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

/// `EnvFilter` directives matching the stderr logger's thresholds.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn default_directives(level: LevelFilter) -> String {
    let workspace = level.as_str().to_ascii_lowercase();
    let others = level.min(LevelFilter::Warn).as_str().to_ascii_lowercase();
    let mut directives = others;
    for krate in [
        "tape_targets",
        "tape_targets_core",
        "tape_targets_detect",
        "tape_targets_stereo",
    ] {
        directives.push_str(&format!(",{krate}={workspace}"));
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_targets_are_shortened() {
        assert_eq!(
            short_target("tape_targets_detect::resolver::secondary"),
            "detect::resolver::secondary"
        );
        assert_eq!(short_target("tape_targets::io"), "io");
        assert_eq!(short_target("tape_targets"), "tape_targets");
        assert_eq!(short_target("imageproc::contours"), "imageproc::contours");
    }

    #[test]
    fn filter_directives_follow_the_requested_level() {
        assert_eq!(
            default_directives(LevelFilter::Debug),
            "warn,tape_targets=debug,tape_targets_core=debug,tape_targets_detect=debug,tape_targets_stereo=debug"
        );
        assert!(default_directives(LevelFilter::Error).starts_with("error,tape_targets=error"));
    }

    #[test]
    fn dependencies_are_capped_at_warn() {
        let logger = FrameLogger {
            level: LevelFilter::Trace,
            started: Instant::now(),
        };
        assert_eq!(logger.threshold("tape_targets_stereo"), LevelFilter::Trace);
        assert_eq!(logger.threshold("png::decoder"), LevelFilter::Warn);

        let quiet = FrameLogger {
            level: LevelFilter::Error,
            started: Instant::now(),
        };
        assert_eq!(quiet.threshold("png::decoder"), LevelFilter::Error);
    }
}
