//! Logging setup for programs embedding the store.
//!
//! The library itself only emits `tracing` events (source merges at `debug`,
//! cache activity at `trace`, failed loads at `warn`). Binaries and tests that
//! want to see them can install a subscriber with [`init`].
//!
//! The `CFGSTACK_LOG` environment variable, when set, takes precedence over the
//! level passed to [`init`] and accepts full `EnvFilter` directives
//! (e.g. `cfgstack=trace`).

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "CFGSTACK_LOG";

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stdout,
    Stderr,
    /// Append to a file.
    File(PathBuf),
}

impl LogTarget {
    /// `"0"`/`"off"`, `"1"`/`"stdout"`, `"2"`/`"stderr"`; anything else is a
    /// file name.
    pub fn parse(value: &str) -> Self {
        match value {
            "0" | "off" => LogTarget::Off,
            "1" | "stdout" => LogTarget::Stdout,
            "2" | "stderr" => LogTarget::Stderr,
            filename => LogTarget::File(PathBuf::from(filename)),
        }
    }
}

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("cannot open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to set subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Parse a level name (`error`, `warn`, `info`, `debug`, `trace`),
/// case-insensitively.
pub fn parse_level(level: &str) -> Option<Level> {
    level.trim().parse().ok()
}

/// Install a global fmt subscriber writing to `target`.
///
/// Fails if a global subscriber is already set.
pub fn init(level: Level, target: &LogTarget) -> Result<(), LogInitError> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(level).into()));

    match target {
        LogTarget::Off => {}
        LogTarget::Stdout => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::Stderr => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}
