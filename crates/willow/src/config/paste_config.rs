use crate::config::default_true;

use serde::{Deserialize, Serialize};

/// Paste delivery configuration: text adjustments and the application
/// allow/deny filter.
///
/// When both lists are non-empty the allow list wins and the deny list is
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasteConfig {
    /// Append a newline to the delivered text.
    #[serde(default)]
    pub append_newline: bool,

    /// Append a trailing space so consecutive dictations join cleanly.
    #[serde(default = "default_true")]
    pub append_space: bool,

    /// Strip leading whitespace Whisper tends to emit.
    #[serde(default = "default_true")]
    pub trim_leading_space: bool,

    /// Send a synthetic Enter keystroke after the paste lands.
    #[serde(default)]
    pub press_enter: bool,

    /// Only these applications may receive pastes (empty = no allow list).
    #[serde(default)]
    pub allow_apps: Vec<String>,

    /// These applications never receive pastes (empty = no deny list).
    #[serde(default)]
    pub deny_apps: Vec<String>,
}

impl Default for PasteConfig {
    fn default() -> Self {
        Self {
            append_newline: false,
            append_space: true,
            trim_leading_space: true,
            press_enter: false,
            allow_apps: Vec::new(),
            deny_apps: Vec::new(),
        }
    }
}
