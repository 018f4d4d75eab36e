//! Logging initialization.
//!
//! Structured logs go to stdout and to daily-rotated files under the
//! platform data directory, with old files pruned past the configured
//! retention. The filter comes from the `WILLOW_LOG` environment
//! variable when set, otherwise from the config file.

use crate::{AppError, AppResult, config::{Config, LoggingConfig}};

use std::{panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that overrides the configured log filter.
const LOG_ENV_VAR: &str = "WILLOW_LOG";

/// Install the global subscriber.
///
/// Returns the non-blocking writer guard, which must be kept alive for
/// the process lifetime or buffered log lines are lost, and the log
/// directory for the tray's Open Log action.
#[track_caller]
pub fn init(config: &LoggingConfig) -> AppResult<(WorkerGuard, PathBuf)> {
    let filter = match std::env::var(LOG_ENV_VAR) {
        Ok(directives) => directives,
        Err(_) => config.filter.clone(),
    };

    let env_filter = EnvFilter::try_new(&filter).map_err(|e| AppError::ConfigError {
        reason: format!("Invalid log filter {:?}: {}", filter, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let log_dir = Config::log_dir()?;

    let file_appender = rolling::Builder::new()
        .rotation(rolling::Rotation::DAILY)
        .filename_prefix("willow")
        .filename_suffix("log")
        .max_log_files(config.max_log_files)
        .build(&log_dir)
        .map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create log file appender: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok((guard, log_dir))
}
