use crate::config::{default_transcribe_timeout_secs, default_true, default_workers};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whisper model and transcription-worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperConfig {
    /// Path to the Whisper model file (e.g., ggml-base.en.bin).
    pub model_path: PathBuf,

    /// Two-letter language code to lock transcription to.
    /// `None` lets the engine auto-detect per recording.
    #[serde(default)]
    pub language: Option<String>,

    /// Use GPU for inference if a GPU backend was compiled in (Metal/Vulkan).
    #[serde(default = "default_true")]
    pub use_gpu: bool,

    /// Maximum transcriptions running concurrently.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Bounded wait per transcription; a timed-out session is dropped.
    #[serde(default = "default_transcribe_timeout_secs")]
    pub timeout_secs: u64,
}
