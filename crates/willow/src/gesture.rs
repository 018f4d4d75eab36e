//! Hotkey gesture state machine.
//!
//! Interprets raw press/release events from the dictation hotkey into
//! session commands: hold-to-talk (record while held) and double-tap
//! latching (record until a second double tap). A tap always stops the
//! hold recording immediately; only the timing of the release/press pair
//! decides retroactively whether the next press latches.

use std::time::{Duration, Instant};

use tracing::debug;

/// Whether the hotkey went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEventKind {
    /// Key went down.
    Pressed,
    /// Key went up.
    Released,
}

/// One raw hotkey transition, timestamped at arrival.
#[derive(Debug, Clone, Copy)]
pub struct HotkeyEvent {
    /// Press or release.
    pub kind: HotkeyEventKind,
    /// When the transition was observed.
    pub at: Instant,
}

/// Gesture-level recording state.
///
/// Recording is active exactly while the state is `HoldRecording` or
/// `LatchRecording`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    /// No recording in progress.
    Idle,
    /// Recording while the key is physically held.
    HoldRecording {
        /// When the hold began, for the tap-vs-hold decision on release.
        pressed_at: Instant,
    },
    /// Recording latched on by a double tap; key state is irrelevant.
    LatchRecording,
}

/// Session-level command emitted by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Begin a hold-to-talk recording.
    StartHold,
    /// Stop the hold recording.
    StopHold,
    /// Begin a latched recording (double tap detected).
    ToggleLatchOn,
    /// Stop the latched recording (second double tap detected).
    ToggleLatchOff,
}

/// Single-threaded gesture interpreter. Owned by the event loop; consumes
/// one event at a time in timestamp order.
pub struct GestureStateMachine {
    state: GestureState,
    /// Release timestamp of a tap that may combine with the next press
    /// into a latch toggle. Armed only from Idle-bound taps.
    pending_tap: Option<Instant>,
    /// Release timestamp observed while latched; the next press within
    /// the window toggles the latch off.
    latch_tap: Option<Instant>,
    double_tap_latch: bool,
    window: Duration,
    tap_max: Duration,
}

impl GestureStateMachine {
    pub fn new(double_tap_latch: bool, window: Duration, tap_max: Duration) -> Self {
        Self {
            state: GestureState::Idle,
            pending_tap: None,
            latch_tap: None,
            double_tap_latch,
            window,
            tap_max,
        }
    }

    /// Feed one raw hotkey event; returns at most one session command.
    pub fn handle(&mut self, event: HotkeyEvent) -> Option<SessionCommand> {
        match event.kind {
            HotkeyEventKind::Pressed => self.on_pressed(event.at),
            HotkeyEventKind::Released => self.on_released(event.at),
        }
    }

    fn on_pressed(&mut self, now: Instant) -> Option<SessionCommand> {
        match self.state {
            GestureState::Idle => {
                if let Some(released_at) = self.pending_tap.take()
                    && self.double_tap_latch
                    && now.duration_since(released_at) <= self.window
                {
                    debug!("Double tap detected, latching on");
                    self.state = GestureState::LatchRecording;
                    return Some(SessionCommand::ToggleLatchOn);
                }
                self.state = GestureState::HoldRecording { pressed_at: now };
                Some(SessionCommand::StartHold)
            }
            // Key repeat while held; the OS can deliver these.
            GestureState::HoldRecording { .. } => None,
            GestureState::LatchRecording => {
                if let Some(released_at) = self.latch_tap.take()
                    && now.duration_since(released_at) <= self.window
                {
                    debug!("Double tap detected, latching off");
                    self.state = GestureState::Idle;
                    return Some(SessionCommand::ToggleLatchOff);
                }
                // A lone press never interrupts a latched recording; its
                // release re-arms the latch-side tap below.
                None
            }
        }
    }

    fn on_released(&mut self, now: Instant) -> Option<SessionCommand> {
        match self.state {
            // Stray release, e.g. the key was down before startup.
            GestureState::Idle => None,
            GestureState::HoldRecording { pressed_at } => {
                self.state = GestureState::Idle;
                let held = now.duration_since(pressed_at);
                // A hold exactly at the threshold counts as a hold.
                if self.double_tap_latch && held < self.tap_max {
                    self.pending_tap = Some(now);
                }
                Some(SessionCommand::StopHold)
            }
            GestureState::LatchRecording => {
                self.latch_tap = Some(now);
                None
            }
        }
    }

    /// Drop pending taps whose double-tap window has fully elapsed.
    /// Emits nothing; a press after expiry is a fresh gesture.
    pub fn poll_expiry(&mut self, now: Instant) {
        for tap in [&mut self.pending_tap, &mut self.latch_tap] {
            if tap.is_some_and(|t| now.duration_since(t) > self.window) {
                *tap = None;
            }
        }
    }

    /// Next instant at which [`poll_expiry`](Self::poll_expiry) has work,
    /// so the event loop can arm a timer instead of polling.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.pending_tap, self.latch_tap]
            .into_iter()
            .flatten()
            .map(|t| t + self.window)
            .min()
    }

    /// Recording is active exactly in the hold and latch states.
    pub fn is_recording(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    #[cfg(test)]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Force the machine back to Idle after a session failed to start,
    /// so the failed recording cannot leave a phantom hold or latch.
    pub fn abort_recording(&mut self) {
        self.state = GestureState::Idle;
        self.pending_tap = None;
        self.latch_tap = None;
    }
}
