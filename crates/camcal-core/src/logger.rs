//! Stderr logging for the calibration crates and the `camcal` binary.
//!
//! Lines read `[elapsed LEVEL module] message`, where `module` is the record
//! target with the `camcal_` crate prefix dropped (`solve::stereo`). Records
//! from other crates are only shown at `warn` and above so pool and decoder
//! chatter stays out of calibration logs.

use std::fmt;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::EnvFilter;

const CRATE_PREFIX: &str = "camcal";

#[cfg(feature = "tracing")]
const DEFAULT_DIRECTIVES: &str = "warn,camcal=info,camcal_core=info,camcal_pattern=info,camcal_solve=info";

fn is_own_target(target: &str) -> bool {
    target
        .split("::")
        .next()
        .is_some_and(|root| root == CRATE_PREFIX || root.starts_with("camcal_"))
}

/// `camcal_solve::stereo` -> `solve::stereo`; foreign targets are kept.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix("camcal_")
        .filter(|_| is_own_target(target))
        .unwrap_or(target)
}

fn format_line(elapsed_s: f64, level: Level, target: &str, args: &fmt::Arguments<'_>) -> String {
    format!(
        "[{elapsed_s:7.3}s {level:>5} {}] {args}",
        short_target(target)
    )
}

struct CalibrationLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for CalibrationLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let limit = if is_own_target(metadata.target()) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        };
        metadata.level() <= limit
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<CalibrationLogger> = OnceLock::new();

/// Install the stderr logger; repeated calls keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| CalibrationLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install a `tracing` subscriber. `RUST_LOG` overrides the default of
/// `info` for the calibration crates and `warn` for everything else.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(tracing_subscriber::fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
