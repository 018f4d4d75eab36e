//! Global dictation hotkey listener.
//!
//! Registers the configured hotkey and forwards raw press/release
//! transitions to the main application. Gesture interpretation (hold vs
//! tap vs double tap) happens in the app loop; this module only
//! timestamps and forwards.

use crate::{AppCommand, AppError, AppResult, gesture::{HotkeyEvent, HotkeyEventKind}};

use std::{panic::Location, str::FromStr, time::{Duration, Instant}};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Listens on the global hotkey event channel and forwards transitions.
pub struct HotkeyHandler {
    hotkey_id: u32,
    command_tx: mpsc::Sender<AppCommand>,
}

impl HotkeyHandler {
    /// Register the configured dictation hotkey.
    ///
    /// Must be called on a thread with a message pump (e.g. the main thread
    /// running a `tao` event loop) so that `WM_HOTKEY` messages are
    /// dispatched on Windows. The returned [`GlobalHotKeyManager`] must be
    /// kept alive on that thread for the hotkey to remain registered.
    #[track_caller]
    #[instrument]
    pub fn register_hotkey(hotkey: &str) -> AppResult<(GlobalHotKeyManager, u32)> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let key = HotKey::from_str(hotkey).map_err(|e| AppError::HotkeyRegistrationFailed {
            reason: format!("Invalid hotkey {:?}: {}", hotkey, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        manager
            .register(key)
            .map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to register {}: {}", hotkey, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(hotkey = hotkey, "Global hotkey registered");

        Ok((manager, key.id()))
    }

    /// Create a handler for a previously registered hotkey.
    ///
    /// The `hotkey_id` should come from [`register_hotkey`](Self::register_hotkey).
    /// This struct is `Send` and can live on any thread; it only listens on
    /// the global [`GlobalHotKeyEvent`] channel.
    pub fn new(hotkey_id: u32, command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self {
            hotkey_id,
            command_tx,
        }
    }

    /// Run the hotkey forwarding loop.
    ///
    /// Blocks until a shutdown signal is received.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // Single persistent blocking task that forwards hotkey events.
        // GlobalHotKeyEvent::receiver() returns a crossbeam_channel::Receiver
        // which has blocking recv() -- zero polling, instant response, one thread.
        //
        // Shutdown: when event_rx is dropped (loop breaks), the next
        // event_tx.blocking_send() fails, breaking the blocking loop.
        // The JoinHandle is awaited with a timeout after the main loop exits.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if event.id == self.hotkey_id {
                        self.forward(event.state).await?;
                    }
                }
            }
        }

        // Drop event_rx to unblock the blocking task's next blocking_send().
        // The task will break out of its loop when blocking_send returns Err.
        drop(event_rx);

        // Best-effort join: the blocking task may be stuck in recv() if no
        // hotkey event arrives after shutdown. Use a timeout to avoid hanging.
        // The task is cleaned up by the runtime on process exit regardless.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// Timestamp and forward one transition of the dictation key.
    ///
    /// Timestamps are taken here, not in the app loop, so channel latency
    /// never skews the tap-vs-hold and double-tap timing decisions.
    async fn forward(&self, state: HotKeyState) -> AppResult<()> {
        let kind = match state {
            HotKeyState::Pressed => HotkeyEventKind::Pressed,
            HotKeyState::Released => HotkeyEventKind::Released,
        };

        let event = HotkeyEvent {
            kind,
            at: Instant::now(),
        };

        self.command_tx
            .send(AppCommand::Hotkey(event))
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send hotkey event: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(kind = ?kind, "Hotkey transition forwarded");

        Ok(())
    }
}
