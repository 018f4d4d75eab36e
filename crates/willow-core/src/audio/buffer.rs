use std::{collections::VecDeque, time::Duration};

/// Maximum samples to buffer (5 minutes at 48kHz mono).
/// Prevents unbounded memory growth during long recordings.
///
/// **Memory footprint at max capacity:**
/// - 48,000 Hz * 60s * 5 min * 4 bytes/f32 = ~58MB
/// - This is a hard upper bound; typical recordings are shorter
pub(crate) const MAX_BUFFER_SAMPLES: usize = 48_000 * 60 * 5;

/// Accumulates interleaved audio frames for one recording session.
///
/// The capture callback appends frames while recording is active; stopping
/// the session takes the buffer by value, so a sealed recording can no
/// longer grow. Oldest samples are dropped once the ring bound is reached.
#[derive(Debug)]
pub struct AudioBuffer {
    samples: VecDeque<f32>,
    sample_rate: u32,
    channels: u16,
    device: String,
}

impl AudioBuffer {
    /// Creates an empty buffer for audio at the given device format,
    /// tagged with the capturing device's identifier.
    pub fn new(sample_rate: u32, channels: u16, device: impl Into<String>) -> Self {
        Self {
            samples: VecDeque::with_capacity(MAX_BUFFER_SAMPLES.min(sample_rate as usize * 30)),
            sample_rate,
            channels,
            device: device.into(),
        }
    }

    /// Appends interleaved samples, dropping the oldest once the ring
    /// bound is exceeded.
    pub fn push_frames(&mut self, data: &[f32]) {
        self.samples.extend(data.iter().copied());
        // Ring buffer: O(1) amortized drop of oldest samples via VecDeque
        while self.samples.len() > MAX_BUFFER_SAMPLES {
            self.samples.pop_front();
        }
    }

    /// Total interleaved sample count.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true` when no frames have been captured.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Device sample rate the frames were captured at.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Interleaved channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Identifier of the input device the frames were captured from.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Captured duration, accounting for channel interleaving.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 || self.channels == 0 {
            return Duration::ZERO;
        }
        let frames = self.samples.len() as u64 / u64::from(self.channels);
        Duration::from_secs_f64(frames as f64 / f64::from(self.sample_rate))
    }

    /// Consumes the buffer, averaging interleaved channels down to mono.
    pub fn into_mono(self) -> Vec<f32> {
        let channels = usize::from(self.channels).max(1);
        if channels == 1 {
            return self.samples.into_iter().collect();
        }
        let samples: Vec<f32> = self.samples.into_iter().collect();
        samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    }
}
