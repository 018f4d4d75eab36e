//! Configuration management for willow.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, startup validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        AudioConfig, FormatConfig, GestureConfig, LoggingConfig, PasteConfig, SoundConfig,
        WhisperConfig,
    },
};

use std::{fs, io::Write, panic::Location, path::PathBuf, str::FromStr, time::Duration};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use global_hotkey::hotkey::HotKey;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Main configuration struct, one section per concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Whisper model and worker configuration.
    pub whisper: WhisperConfig,
    /// Audio input device configuration.
    #[serde(default)]
    pub audio: AudioConfig,
    /// Hotkey gesture configuration.
    #[serde(default)]
    pub gesture: GestureConfig,
    /// Transcript formatting configuration.
    #[serde(default)]
    pub format: FormatConfig,
    /// Paste options and application filter.
    #[serde(default)]
    pub paste: PasteConfig,
    /// Indicator sound configuration.
    #[serde(default)]
    pub sound: SoundConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from disk, creating a default file if none
    /// exists.
    ///
    /// Runs before logging is initialized, so nothing here logs; the
    /// caller reports failures and exits.
    #[track_caller]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            Ok(config)
        } else {
            Self::create_default()
        }
    }

    /// Validate every configured value that the rest of the app relies on.
    ///
    /// Called once at startup; any error here is fatal before the event
    /// loop starts.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        let err = |reason: String| AppError::ConfigError {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        HotKey::from_str(&self.gesture.hotkey)
            .map_err(|e| err(format!("Invalid hotkey {:?}: {}", self.gesture.hotkey, e)))?;

        if self.gesture.tap_max_ms == 0 {
            return Err(err("gesture.tap_max_ms must be greater than zero".into()));
        }
        if self.gesture.double_tap_latch && self.gesture.double_tap_window_ms == 0 {
            return Err(err(
                "gesture.double_tap_window_ms must be greater than zero when latching is enabled"
                    .into(),
            ));
        }
        if self.whisper.workers == 0 {
            return Err(err("whisper.workers must be at least 1".into()));
        }
        if self.whisper.timeout_secs == 0 {
            return Err(err("whisper.timeout_secs must be greater than zero".into()));
        }
        if self.logging.max_log_files == 0 {
            return Err(err("logging.max_log_files must be at least 1".into()));
        }

        EnvFilter::try_new(&self.logging.filter)
            .map_err(|e| err(format!("Invalid logging.filter {:?}: {}", self.logging.filter, e)))?;

        for (list, name) in [
            (&self.paste.allow_apps, "paste.allow_apps"),
            (&self.paste.deny_apps, "paste.deny_apps"),
        ] {
            if list.iter().any(|app| app.trim().is_empty()) {
                return Err(err(format!("{} contains an empty entry", name)));
            }
        }

        Ok(())
    }

    /// The minimum captured duration worth transcribing.
    pub fn min_audio(&self) -> Duration {
        Duration::from_millis(self.audio.min_audio_ms)
    }

    /// The bounded wait applied to each transcription.
    pub fn transcribe_timeout(&self) -> Duration {
        Duration::from_secs(self.whisper.timeout_secs)
    }

    /// Save configuration to disk using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent
    /// corruption if the process crashes during the write.
    #[track_caller]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, &config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(())
    }

    /// Directory for log files, created on first use.
    #[track_caller]
    pub fn log_dir() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let log_dir = proj_dirs.data_dir().join("logs");

        if !log_dir.exists() {
            fs::create_dir_all(&log_dir)?;
        }

        Ok(log_dir)
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "willow-dictation", "Willow").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn create_default() -> AppResult<Self> {
        let proj_dirs = Self::project_dirs()?;
        let model_path = proj_dirs
            .data_dir()
            .join("models")
            .join("ggml-base.en.bin");

        let config = Config {
            whisper: WhisperConfig {
                model_path,
                language: None,
                use_gpu: true,
                workers: crate::config::DEFAULT_WORKERS,
                timeout_secs: crate::config::DEFAULT_TRANSCRIBE_TIMEOUT_SECS,
            },
            audio: AudioConfig::default(),
            gesture: GestureConfig::default(),
            format: FormatConfig::default(),
            paste: PasteConfig::default(),
            sound: SoundConfig::default(),
            logging: LoggingConfig::default(),
        };

        config.save()?;

        Ok(config)
    }
}
