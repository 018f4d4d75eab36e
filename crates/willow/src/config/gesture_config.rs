use crate::config::{
    DEFAULT_HOTKEY, default_double_tap_window_ms, default_tap_max_ms, default_true,
};

use serde::{Deserialize, Serialize};

/// Hotkey gesture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// The dictation hotkey, e.g. "Control+Shift+Space" or "F9".
    #[serde(default = "default_hotkey")]
    pub hotkey: String,

    /// Whether a double tap latches recording on until a second double tap.
    #[serde(default = "default_true")]
    pub double_tap_latch: bool,

    /// Maximum gap between a release and the next press to count as a
    /// double tap. A gap equal to the window still matches.
    #[serde(default = "default_double_tap_window_ms")]
    pub double_tap_window_ms: u64,

    /// Holds shorter than this count as taps. A hold exactly this long is
    /// a hold, not a tap.
    #[serde(default = "default_tap_max_ms")]
    pub tap_max_ms: u64,
}

fn default_hotkey() -> String {
    DEFAULT_HOTKEY.to_string()
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hotkey: default_hotkey(),
            double_tap_latch: true,
            double_tap_window_ms: default_double_tap_window_ms(),
            tap_max_ms: default_tap_max_ms(),
        }
    }
}
