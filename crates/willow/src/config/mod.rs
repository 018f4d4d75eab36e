mod audio_config;
#[allow(clippy::module_inception)]
mod config;
mod format_config;
mod gesture_config;
mod logging_config;
mod paste_config;
mod sound_config;
mod whisper_config;

pub(crate) use {
    audio_config::AudioConfig, config::Config, format_config::FormatConfig,
    gesture_config::GestureConfig, logging_config::LoggingConfig, paste_config::PasteConfig,
    sound_config::SoundConfig, whisper_config::WhisperConfig,
};

pub(crate) const DEFAULT_HOTKEY: &str = "Control+Shift+Space";
pub(crate) const DEFAULT_DOUBLE_TAP_WINDOW_MS: u64 = 400;
pub(crate) const DEFAULT_TAP_MAX_MS: u64 = 250;
pub(crate) const DEFAULT_MIN_AUDIO_MS: u64 = 800;
pub(crate) const DEFAULT_WORKERS: usize = 2;
pub(crate) const DEFAULT_TRANSCRIBE_TIMEOUT_SECS: u64 = 60;
pub(crate) const DEFAULT_LOG_FILTER: &str = "willow=debug,willow_core=debug";
pub(crate) const DEFAULT_MAX_LOG_FILES: usize = 7;

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_double_tap_window_ms() -> u64 {
    DEFAULT_DOUBLE_TAP_WINDOW_MS
}

pub(crate) fn default_tap_max_ms() -> u64 {
    DEFAULT_TAP_MAX_MS
}

pub(crate) fn default_min_audio_ms() -> u64 {
    DEFAULT_MIN_AUDIO_MS
}

pub(crate) fn default_workers() -> usize {
    DEFAULT_WORKERS
}

pub(crate) fn default_transcribe_timeout_secs() -> u64 {
    DEFAULT_TRANSCRIBE_TIMEOUT_SECS
}

pub(crate) fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

pub(crate) fn default_max_log_files() -> usize {
    DEFAULT_MAX_LOG_FILES
}
