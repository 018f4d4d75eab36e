use crate::config::default_true;

use serde::{Deserialize, Serialize};

/// Indicator sound configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Play short tones when recording starts and stops.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
