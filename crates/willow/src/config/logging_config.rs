use crate::config::{default_log_filter, default_max_log_files};

use serde::{Deserialize, Serialize};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Tracing filter directive, e.g. "willow=debug,willow_core=info".
    /// The `WILLOW_LOG` environment variable overrides this.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Log transcript text verbatim. When false only lengths are logged.
    #[serde(default)]
    pub log_transcripts: bool,

    /// Daily log files retained before the oldest is pruned.
    #[serde(default = "default_max_log_files")]
    pub max_log_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            log_transcripts: false,
            max_log_files: default_max_log_files(),
        }
    }
}
