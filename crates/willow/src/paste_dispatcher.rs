//! Paste delivery: application filtering, paste options, and injection.
//!
//! One dispatcher instance serves all sessions and is driven from a
//! single queue, so two transcripts' keystrokes can never interleave.
//! The focused application is read at paste time, not recording time;
//! the user may have switched apps while speaking.

use crate::{AppError, AppResult, PasteKeyGuard, config::PasteConfig, focus::FocusProbe};

use std::panic::Location;
use std::time::Duration;

use arboard::Clipboard;
use error_location::ErrorLocation;
use notify_rust::Notification;
use tracing::{debug, error, info, instrument, warn};

/// Delay between clipboard write and paste simulation.
///
/// This gives the OS clipboard manager time to process the write before
/// we simulate the paste chord. Too short and the paste may get stale
/// content; too long and the user perceives lag. 50ms is empirically
/// reliable across Windows, macOS, and Linux desktop environments.
const CLIPBOARD_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Delay between key events in the paste simulation.
///
/// Some applications and input method editors need a small gap between
/// key events to register them correctly. 10ms is the minimum reliable
/// interval.
const KEY_EVENT_DELAY: Duration = Duration::from_millis(10);

/// Which applications may receive pasted text.
///
/// Built once at startup from the configured lists; the allow list wins
/// when both are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppFilter {
    /// Every application may receive pastes.
    None,
    /// Only the listed applications receive pastes.
    Allow(Vec<String>),
    /// Every application except the listed ones receives pastes.
    Deny(Vec<String>),
}

impl AppFilter {
    /// Derive the filter mode from the configured lists. A non-empty
    /// allow list takes precedence over the deny list.
    pub fn from_lists(allow: &[String], deny: &[String]) -> Self {
        let normalize =
            |apps: &[String]| apps.iter().map(|a| a.trim().to_lowercase()).collect();

        if !allow.is_empty() {
            Self::Allow(normalize(allow))
        } else if !deny.is_empty() {
            Self::Deny(normalize(deny))
        } else {
            Self::None
        }
    }

    /// Whether the given focused application may receive a paste.
    ///
    /// An unknown focused app (`None`) passes a deny list but fails an
    /// allow list: an allow list grants nothing it cannot verify.
    pub fn permits(&self, app: Option<&str>) -> bool {
        match self {
            Self::None => true,
            Self::Allow(apps) => {
                app.is_some_and(|name| apps.iter().any(|a| a == &name.to_lowercase()))
            }
            Self::Deny(apps) => {
                !app.is_some_and(|name| apps.iter().any(|a| a == &name.to_lowercase()))
            }
        }
    }
}

/// Apply the configured text adjustments to a formatted transcript.
pub fn apply_paste_options(text: &str, options: &PasteConfig) -> String {
    let mut out = if options.trim_leading_space {
        text.trim_start().to_string()
    } else {
        text.to_string()
    };

    if options.append_space {
        out.push(' ');
    }
    if options.append_newline {
        out.push('\n');
    }

    out
}

/// One-shot latch for the injection-failure notification.
///
/// The usual cause (a missing accessibility permission) repeats on every
/// paste; the user is told once, repeats only reach the log.
#[derive(Debug, Default)]
pub struct NoticeLatch {
    fired: bool,
}

impl NoticeLatch {
    /// `true` exactly once, on the first call.
    pub fn first(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }
}

/// Delivers formatted transcripts to the focused application.
pub struct PasteDispatcher {
    clipboard: Clipboard,
    options: PasteConfig,
    filter: AppFilter,
    probe: Box<dyn FocusProbe>,
    injection_notice: NoticeLatch,
}

impl PasteDispatcher {
    /// Create a dispatcher over the system clipboard.
    #[track_caller]
    #[instrument(skip(options, probe))]
    pub fn new(options: PasteConfig, probe: Box<dyn FocusProbe>) -> AppResult<Self> {
        let clipboard = Clipboard::new().map_err(|e| AppError::ClipboardError {
            reason: format!("Failed to initialize clipboard: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let filter = AppFilter::from_lists(&options.allow_apps, &options.deny_apps);

        info!(filter = ?filter, "PasteDispatcher initialized");

        Ok(Self {
            clipboard,
            options,
            filter,
            probe,
            injection_notice: NoticeLatch::default(),
        })
    }

    /// Deliver one formatted transcript.
    ///
    /// Empty text and filter-suppressed pastes resolve to `Ok` silently
    /// (logged, not delivered); those are policy outcomes, not errors.
    #[instrument(skip(self, text))]
    pub async fn dispatch(&mut self, text: &str) -> AppResult<()> {
        if text.is_empty() {
            debug!("Empty text, nothing to paste");
            return Ok(());
        }

        let focused = self.probe.focused_app();
        if !self.filter.permits(focused.as_deref()) {
            info!(
                focused_app = focused.as_deref().unwrap_or("<unknown>"),
                text_len = text.len(),
                "Paste suppressed by application filter"
            );
            return Ok(());
        }

        let payload = apply_paste_options(text, &self.options);

        self.clipboard
            .set_text(&payload)
            .map_err(|e| AppError::ClipboardError {
                reason: format!("Failed to set clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(text_len = payload.len(), "Text copied to clipboard");

        // Allow the clipboard manager to process the write before pasting.
        tokio::time::sleep(CLIPBOARD_SETTLE_DELAY).await;

        if let Err(e) = self.inject(self.options.press_enter).await {
            if self.injection_notice.first() {
                error!(
                    error = ?e,
                    "Paste injection failed; text is in the clipboard. On macOS, \
                     grant willow accessibility permissions to enable auto-paste"
                );
                notify_injection_failure();
            } else {
                debug!(error = ?e, "Paste injection failed, text left in clipboard");
            }
            return Err(e);
        }

        info!(text_len = payload.len(), "Paste delivered");

        Ok(())
    }

    /// Simulate the paste chord and, optionally, a trailing Enter.
    #[instrument(skip(self))]
    async fn inject(&mut self, press_enter: bool) -> AppResult<()> {
        use enigo::{Direction, Enigo, Key, Keyboard, Settings};

        // The chord runs inside spawn_blocking since enigo operations are
        // synchronous and involve small sleeps for key event timing.
        //
        // NOTE: A new Enigo instance is created inside spawn_blocking because:
        // 1. Enigo is not Send, so it cannot be moved across thread boundaries
        // 2. spawn_blocking requires 'static + Send closure
        // 3. Enigo::new() is cheap (no heavy platform initialization)
        //
        // RAII SAFETY: PasteKeyGuard ensures the modifier is released on drop,
        // even if key operations fail or panic. Without this, a failure after
        // pressing the modifier would leave it stuck, making the keyboard
        // unusable.
        let inject_result = tokio::task::spawn_blocking(move || {
            {
                let mut guard = PasteKeyGuard::new()?;

                std::thread::sleep(KEY_EVENT_DELAY);

                guard
                    .enigo_mut()
                    .key(Key::Unicode('v'), Direction::Click)
                    .map_err(|e| AppError::InjectionFailed {
                        reason: format!("Failed to press V: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    })?;

                std::thread::sleep(KEY_EVENT_DELAY);

                // Guard drops here, releasing the modifier before any
                // further keystrokes.
            }

            if press_enter {
                let mut enigo =
                    Enigo::new(&Settings::default()).map_err(|e| AppError::InjectionFailed {
                        reason: format!("Failed to create Enigo: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    })?;

                std::thread::sleep(KEY_EVENT_DELAY);

                enigo
                    .key(Key::Return, Direction::Click)
                    .map_err(|e| AppError::InjectionFailed {
                        reason: format!("Failed to press Enter: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    })?;
            }

            Ok::<(), AppError>(())
        })
        .await
        .map_err(|e| AppError::InjectionFailed {
            reason: format!("Paste task panicked: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        inject_result?;

        debug!(press_enter = press_enter, "Injection complete");

        Ok(())
    }
}

/// Tell the user, once per run, that auto-paste is not working.
///
/// Best effort: a platform without a notification daemon just gets the
/// log line.
fn notify_injection_failure() {
    let shown = Notification::new()
        .summary("Willow: auto-paste failed")
        .body(
            "Your dictation is in the clipboard; paste it manually. \
             On macOS, grant Willow accessibility permissions to enable auto-paste.",
        )
        .show();

    if let Err(e) = shown {
        warn!(error = %e, "Could not show paste-failure notification");
    }
}

impl std::fmt::Debug for PasteDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasteDispatcher")
            .field("filter", &self.filter)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
