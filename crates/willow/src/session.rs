//! One gesture-triggered recording, from device open to sealed buffer.

use crate::AppResult;

use std::time::{Duration, Instant};

use tracing::{info, instrument};
use uuid::Uuid;
use willow_core::{AudioBuffer, AudioCapturer};

/// An active recording session.
///
/// Owns the capturer (and through it the open [`AudioBuffer`]) for the
/// lifetime of one recording; sealing consumes the session, so a stopped
/// recording can never keep capturing.
pub struct RecordingSession {
    id: Uuid,
    started_at: Instant,
    capturer: AudioCapturer,
}

impl RecordingSession {
    /// Open the configured input device and start capturing.
    ///
    /// Fails fast if the device is unavailable; the caller returns the
    /// gesture to Idle and no session exists.
    #[track_caller]
    #[instrument]
    pub fn begin(device: Option<&str>) -> AppResult<Self> {
        let id = Uuid::new_v4();
        let mut capturer = AudioCapturer::new(device)?;
        capturer.start()?;

        info!(session_id = %id, "Recording session started");

        Ok(Self {
            id,
            started_at: Instant::now(),
            capturer,
        })
    }

    /// Unique session ID for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stop capturing and seal the recording under the given delivery
    /// sequence number.
    #[track_caller]
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn seal(mut self, seq: u64) -> AppResult<SealedRecording> {
        let buffer = self.capturer.stop()?;

        info!(
            session_id = %self.id,
            seq = seq,
            device = buffer.device(),
            held_ms = self.started_at.elapsed().as_millis(),
            captured_ms = buffer.duration().as_millis(),
            "Recording session sealed"
        );

        Ok(SealedRecording {
            seq,
            session_id: self.id,
            buffer,
        })
    }
}

impl std::fmt::Debug for RecordingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSession")
            .field("id", &self.id)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

/// A sealed recording awaiting transcription, tagged with the delivery
/// sequence number assigned at stop time.
pub struct SealedRecording {
    /// Delivery order slot; results dispatch in ascending `seq`.
    pub seq: u64,
    /// The session that produced this recording.
    pub session_id: Uuid,
    /// The captured audio, no longer growing.
    pub buffer: AudioBuffer,
}

impl SealedRecording {
    /// Captured audio duration, for the minimum-audio gate.
    pub fn duration(&self) -> Duration {
        self.buffer.duration()
    }
}
