use crate::config::default_min_audio_ms;

use serde::{Deserialize, Serialize};

/// Audio input device configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Input device name (None = host default device).
    #[serde(default)]
    pub selected_device: Option<String>,

    /// Recordings shorter than this are discarded without transcription.
    #[serde(default = "default_min_audio_ms")]
    pub min_audio_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            selected_device: None,
            min_audio_ms: default_min_audio_ms(),
        }
    }
}
