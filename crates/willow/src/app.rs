use crate::{
    AppCommand, AppResult, IndicatorSounds, TrayCommand, TrayIconState,
    config::Config,
    delivery::{DeliveryQueue, SessionOutcome},
    focus::platform_probe,
    gesture::{GestureStateMachine, HotkeyEvent, SessionCommand},
    paste_dispatcher::PasteDispatcher,
    session::RecordingSession,
};

use std::{path::PathBuf, sync::Arc, time::Instant};

use tao::event_loop::EventLoopProxy;
use tokio::sync::{Semaphore, mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::menu::{MenuEvent, MenuId};
use willow_core::{TextFormatter, Transcriber};

/// Main application state.
///
/// Runs on the async runtime thread. Communicates tray icon updates
/// back to the main thread via `tray_proxy` because `TrayIcon` is `!Send`
/// and must remain on the UI thread.
pub struct App {
    pub(crate) config: Config,
    pub(crate) transcriber: Arc<Transcriber>,
    pub(crate) formatter: Arc<TextFormatter>,
    pub(crate) sounds: IndicatorSounds,
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) open_log_menu_id: MenuId,
    pub(crate) quit_menu_id: MenuId,
    pub(crate) log_dir: PathBuf,

    pub(crate) gesture: GestureStateMachine,
    pub(crate) session: Option<RecordingSession>,
    /// Next delivery slot; assigned at recording stop, never reused.
    pub(crate) next_seq: u64,
    /// Sessions stopped but not yet resolved through the delivery queue.
    pub(crate) in_flight: usize,
    pub(crate) workers: Arc<Semaphore>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Willow starting");

        // Tray event forwarding via single persistent blocking task.
        //
        // MenuEvent::receiver() returns a crossbeam_channel::Receiver which
        // HAS blocking recv() -- zero polling, instant response, one thread.
        //
        // Shutdown: when tray_event_rx is dropped (main loop breaks),
        // tray_event_tx.blocking_send() fails, breaking the blocking loop.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        // Workers resolve sessions here in completion order; the delivery
        // queue restores stop order before anything reaches the dispatcher.
        // Unbounded: the select loop below is the only drain, so a bounded
        // send from that same loop could deadlock it. Backpressure on
        // transcription work comes from the worker semaphore.
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<SessionOutcome>();
        let mut delivery = DeliveryQueue::new(self.next_seq);

        // One dispatcher task serialises all pastes. An mpsc channel
        // preserves send order, so delivery order survives the handoff.
        // Unbounded for the same reason as the result channel.
        let (paste_tx, mut paste_rx) = mpsc::unbounded_channel::<SessionOutcome>();
        let mut dispatcher =
            PasteDispatcher::new(self.config.paste.clone(), platform_probe())?;
        let log_transcripts = self.config.logging.log_transcripts;
        let dispatcher_handle = tokio::spawn(async move {
            while let Some(outcome) = paste_rx.recv().await {
                let Some(text) = outcome.text else {
                    debug!(seq = outcome.seq, "Delivery slot resolved without text");
                    continue;
                };
                if log_transcripts {
                    debug!(seq = outcome.seq, text = %text, "Dispatching transcript");
                }
                if let Err(e) = dispatcher.dispatch(&text).await {
                    debug!(seq = outcome.seq, error = ?e, "Paste not delivered");
                }
            }
        });

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    if let Err(e) = self.handle_tray_event(event).await {
                        error!(error = ?e, "Failed to handle tray event");
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AppCommand::Hotkey(event) => {
                            self.handle_hotkey(event, &result_tx).await;
                        }
                        AppCommand::Shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                Some(outcome) = result_rx.recv() => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    for ready in delivery.push(outcome) {
                        info!(
                            seq = ready.seq,
                            session_id = %ready.session_id,
                            text_len = ready.text.as_deref().map_or(0, str::len),
                            "Delivery slot ready"
                        );
                        if paste_tx.send(ready).is_err() {
                            warn!("Paste dispatcher gone, dropping transcript");
                        }
                    }
                    self.refresh_tray();
                }

                _ = expiry_wait(self.gesture.next_deadline()) => {
                    self.gesture.poll_expiry(Instant::now());
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        if self.session.take().is_some() {
            // Dropping the session stops the capture stream.
            info!("Active recording discarded at shutdown");
        }

        drop(tray_event_rx);
        drop(paste_tx);

        match tokio::time::timeout(std::time::Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        if let Err(e) = dispatcher_handle.await {
            error!(error = ?e, "Paste dispatcher task panicked");
        }

        let _ = self.shutdown_tx.send(true);
        info!("Willow shut down successfully");

        Ok(())
    }

    /// Feed one hotkey transition through the gesture machine and act on
    /// the resulting session command, if any.
    #[instrument(skip(self, result_tx))]
    async fn handle_hotkey(
        &mut self,
        event: HotkeyEvent,
        result_tx: &mpsc::UnboundedSender<SessionOutcome>,
    ) {
        self.gesture.poll_expiry(event.at);

        match self.gesture.handle(event) {
            Some(SessionCommand::StartHold) | Some(SessionCommand::ToggleLatchOn) => {
                self.start_session();
            }
            Some(SessionCommand::StopHold) | Some(SessionCommand::ToggleLatchOff) => {
                self.stop_session(result_tx).await;
            }
            None => {}
        }
    }

    /// Open the input device and begin capturing.
    #[instrument(skip(self))]
    fn start_session(&mut self) {
        if self.session.is_some() {
            warn!("Session already active, ignoring start");
            return;
        }

        match RecordingSession::begin(self.config.audio.selected_device.as_deref()) {
            Ok(session) => {
                self.sounds.play_start();
                self.session = Some(session);
                self.refresh_tray();
            }
            Err(e) => {
                error!(error = ?e, "Failed to start recording session");
                // Without this the gesture machine would believe a
                // recording is active and swallow the next press.
                self.gesture.abort_recording();
            }
        }
    }

    /// Stop the active recording, assign its delivery slot, and hand the
    /// sealed audio to a transcription worker.
    ///
    /// Every assigned slot resolves exactly once: too-short and failed
    /// sessions send a `None` outcome so later sessions are never blocked.
    #[instrument(skip(self, result_tx))]
    async fn stop_session(&mut self, result_tx: &mpsc::UnboundedSender<SessionOutcome>) {
        let Some(session) = self.session.take() else {
            warn!("No active session, ignoring stop");
            return;
        };

        self.sounds.play_stop();

        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight += 1;

        let session_id = session.id();
        let sealed = match session.seal(seq) {
            Ok(sealed) => sealed,
            Err(e) => {
                error!(seq = seq, session_id = %session_id, error = ?e, "Failed to seal recording");
                self.resolve_empty(result_tx, seq, session_id);
                self.refresh_tray();
                return;
            }
        };

        if sealed.duration() < self.config.min_audio() {
            info!(
                seq = seq,
                session_id = %sealed.session_id,
                captured_ms = sealed.duration().as_millis(),
                "Recording below minimum duration, skipping transcription"
            );
            self.resolve_empty(result_tx, seq, sealed.session_id);
            self.refresh_tray();
            return;
        }

        let transcriber = Arc::clone(&self.transcriber);
        let formatter = Arc::clone(&self.formatter);
        let workers = Arc::clone(&self.workers);
        let timeout = self.config.transcribe_timeout();
        let result_tx = result_tx.clone();
        let session_id = sealed.session_id;
        let buffer = sealed.buffer;

        tokio::spawn(async move {
            let _permit = match workers.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return,
            };

            let started = Instant::now();

            // Whisper inference is CPU/GPU bound and synchronous; it runs
            // on the blocking pool so the event loop stays responsive.
            let work = tokio::task::spawn_blocking(move || {
                transcriber
                    .transcribe(buffer)
                    .map(|raw| formatter.format(&raw))
            });

            let text = match tokio::time::timeout(timeout, work).await {
                Ok(Ok(Ok(formatted))) => {
                    info!(
                        seq = seq,
                        session_id = %session_id,
                        duration_ms = started.elapsed().as_millis(),
                        text_len = formatted.len(),
                        "Transcription complete"
                    );
                    (!formatted.is_empty()).then_some(formatted)
                }
                Ok(Ok(Err(e))) => {
                    error!(seq = seq, session_id = %session_id, error = ?e, "Transcription failed");
                    None
                }
                Ok(Err(e)) => {
                    error!(seq = seq, session_id = %session_id, error = ?e, "Transcription task panicked");
                    None
                }
                Err(_) => {
                    // The blocking thread keeps running; its result is
                    // discarded when it eventually finishes.
                    warn!(
                        seq = seq,
                        session_id = %session_id,
                        timeout_ms = timeout.as_millis(),
                        "Transcription timed out"
                    );
                    None
                }
            };

            let _ = result_tx.send(SessionOutcome {
                seq,
                session_id,
                text,
            });
        });
    }

    /// Consume a delivery slot with no text.
    fn resolve_empty(
        &self,
        result_tx: &mpsc::UnboundedSender<SessionOutcome>,
        seq: u64,
        session_id: uuid::Uuid,
    ) {
        let _ = result_tx.send(SessionOutcome {
            seq,
            session_id,
            text: None,
        });
    }

    /// Push the current workflow state to the tray icon.
    ///
    /// Recording wins over Processing: the user cares about the live
    /// microphone first, background transcriptions second.
    fn refresh_tray(&self) {
        let state = if self.session.is_some() {
            TrayIconState::Recording
        } else if self.in_flight > 0 {
            TrayIconState::Processing
        } else {
            TrayIconState::Idle
        };

        if self
            .tray_proxy
            .send_event(TrayCommand::SetState(state))
            .is_err()
        {
            debug!("Tray event loop closed, skipping icon update");
        }
    }

    /// Handle tray menu events.
    #[instrument(skip(self))]
    async fn handle_tray_event(&mut self, event: MenuEvent) -> AppResult<()> {
        let event_id = &event.id;

        if *event_id == self.open_log_menu_id {
            let _ = open::that(&self.log_dir);
            info!(log_dir = %self.log_dir.display(), "Opened log directory");
        } else if *event_id == self.quit_menu_id {
            info!("Quit requested from tray menu");
            let _ = self.tray_proxy.send_event(TrayCommand::Shutdown);
            if let Err(e) = self.command_tx.send(AppCommand::Shutdown).await {
                error!(error = ?e, "Failed to send shutdown command");
            }
        }

        Ok(())
    }
}

/// Sleep until the gesture machine's next expiry deadline, or forever
/// when no tap is pending.
async fn expiry_wait(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }
        None => std::future::pending().await,
    }
}
